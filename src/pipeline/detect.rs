use std::collections::BTreeMap;

use log::debug;

use crate::color::{hue_from_circle, hue_to_circle, Hsl};

/// The most frequent dark and light tones of the raw pixel population, used
/// to anchor the background and foreground roles.
///
/// Invariant: `dark.lightness() <= light.lightness()` after detection.
#[derive(Debug, Clone, Copy)]
pub struct Anchors {
    pub dark: Hsl,
    pub light: Hsl,
}

const BINS_PER_CHANNEL: u32 = 20;
const LIGHTNESS_SPLIT: f32 = 0.5;
/// Lightness shift used to synthesize an anchor when every pixel falls on
/// one side of the split.
const FALLBACK_SHIFT: f32 = 0.4;

#[derive(Default)]
struct Bin {
    count: u64,
    cos_sum: f32,
    sin_sum: f32,
    saturation_sum: f32,
    lightness_sum: f32,
}

impl Bin {
    fn add(&mut self, pixel: &Hsl) {
        let (x, y) = hue_to_circle(pixel.hue());
        self.count += 1;
        self.cos_sum += x;
        self.sin_sum += y;
        self.saturation_sum += pixel.saturation();
        self.lightness_sum += pixel.lightness();
    }

    /// Component mean of the binned pixels, with a circular mean for hue.
    fn mean(&self) -> Hsl {
        let n = self.count as f32;
        Hsl::new(
            hue_from_circle(self.cos_sum, self.sin_sum),
            self.saturation_sum / n,
            self.lightness_sum / n,
        )
    }
}

fn bin_index(value: f32) -> u8 {
    ((value * BINS_PER_CHANNEL as f32) as u32).min(BINS_PER_CHANNEL - 1) as u8
}

/// Highest-count bin, ties resolved by key order. BTreeMap iteration keeps
/// this deterministic for a fixed pixel population.
fn densest(bins: &BTreeMap<(u8, u8, u8), Bin>) -> Option<Hsl> {
    let mut best: Option<&Bin> = None;
    for bin in bins.values() {
        if best.map_or(true, |b| bin.count > b.count) {
            best = Some(bin);
        }
    }
    best.map(Bin::mean)
}

/// Find the most frequent dark and light colors by quantized frequency
/// binning over the full (filtered, unclustered) pixel population.
///
/// Both anchors get their saturation capped to `saturation_cap`, then labels
/// are swapped if needed so dark/light is lightness-monotonic. On an exact
/// lightness tie the lower-saturation color takes the dark label.
pub fn find_dominant_anchors(pixels: &[Hsl], saturation_cap: f32) -> Anchors {
    let mut dark_bins: BTreeMap<(u8, u8, u8), Bin> = BTreeMap::new();
    let mut light_bins: BTreeMap<(u8, u8, u8), Bin> = BTreeMap::new();

    for pixel in pixels {
        let key = (
            bin_index(pixel.hue()),
            bin_index(pixel.saturation()),
            bin_index(pixel.lightness()),
        );
        let side = if pixel.lightness() < LIGHTNESS_SPLIT {
            &mut dark_bins
        } else {
            &mut light_bins
        };
        side.entry(key).or_default().add(pixel);
    }

    let (mut dark, mut light) = match (densest(&dark_bins), densest(&light_bins)) {
        (Some(dark), Some(light)) => (dark, light),
        // One side of the split has no pixels at all; synthesize its anchor
        // from the other side at a shifted lightness.
        (Some(dark), None) => {
            let light = dark.with_lightness((dark.lightness() + FALLBACK_SHIFT).min(0.95));
            (dark, light)
        }
        (None, Some(light)) => {
            let dark = light.with_lightness((light.lightness() - FALLBACK_SHIFT).max(0.05));
            (dark, light)
        }
        (None, None) => (Hsl::new(0.0, 0.0, 0.05), Hsl::new(0.0, 0.0, 0.95)),
    };

    if dark.saturation() > saturation_cap {
        dark = dark.with_saturation(saturation_cap);
    }
    if light.saturation() > saturation_cap {
        light = light.with_saturation(saturation_cap);
    }

    if dark.lightness() > light.lightness()
        || (dark.lightness() == light.lightness() && dark.saturation() > light.saturation())
    {
        std::mem::swap(&mut dark, &mut light);
    }

    debug!("dominant anchors: dark {dark} light {light}");
    Anchors { dark, light }
}
