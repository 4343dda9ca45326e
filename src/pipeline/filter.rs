use log::info;

use crate::color::Hsl;
use crate::error::Error;

/// Outcome of the pre-clustering lightness filter.
#[derive(Debug, Clone, Copy)]
pub struct FilterReport {
    pub total: usize,
    pub kept: usize,
}

impl FilterReport {
    pub fn dropped_fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.total - self.kept) as f32 / self.total as f32
        }
    }
}

/// Drop near-black pixels before clustering so letterboxing and flat dark
/// backgrounds do not dominate the centroids.
///
/// An empty input, or an input that filters down to nothing (a monochrome
/// black image), is a fatal input error; NaN centroids must never reach the
/// later stages.
pub fn filter_dark_pixels(
    pixels: &[Hsl],
    threshold: f32,
) -> Result<(Vec<Hsl>, FilterReport), Error> {
    if pixels.is_empty() {
        return Err(Error::EmptyInput);
    }

    let kept: Vec<Hsl> = pixels
        .iter()
        .copied()
        .filter(|p| p.lightness() > threshold)
        .collect();
    let report = FilterReport {
        total: pixels.len(),
        kept: kept.len(),
    };
    info!(
        "filtered out {:.0}% of pixels at or below lightness {}",
        report.dropped_fraction() * 100.0,
        threshold
    );

    if kept.is_empty() {
        return Err(Error::AllPixelsFiltered {
            total: pixels.len(),
            threshold,
        });
    }
    Ok((kept, report))
}
