//! The color-analysis pipeline, leaves first: lightness filtering, dual
//! k-means clustering, dominant-anchor detection, contrast-constrained
//! selection, complementary expansion, and role assignment.
//!
//! Data flows strictly forward; each stage owns and fully replaces what it
//! produces. A single run is sequential and shares nothing with other runs,
//! so callers are free to process many images in parallel with one pipeline
//! invocation each.

pub mod assign;
pub mod complement;
pub mod contrast;
pub mod detect;
pub mod extract;
pub mod filter;

use crate::color::Hsl;
use crate::config::Config;
use crate::error::Error;

use assign::Palette;
use contrast::ContrastBounds;

/// Run the full pipeline over RGB pixels with 0-255 integer channels.
pub fn generate(pixels: &[[u8; 3]], config: &Config) -> Result<Palette, Error> {
    config.validate()?;
    let hsl: Vec<Hsl> = pixels.iter().map(|p| Hsl::from_rgb8(*p)).collect();
    run(&hsl, config)
}

/// Run the full pipeline over RGB pixels with pre-normalized 0-1 channels.
pub fn generate_f32(pixels: &[[f32; 3]], config: &Config) -> Result<Palette, Error> {
    config.validate()?;
    let hsl: Vec<Hsl> = pixels.iter().map(|p| Hsl::from_rgb_f32(*p)).collect();
    run(&hsl, config)
}

fn run(pixels: &[Hsl], config: &Config) -> Result<Palette, Error> {
    let (filtered, _report) = filter::filter_dark_pixels(pixels, config.lightness_threshold)?;

    let clusters = extract::cluster(&filtered, config.cluster_count, config.kmeans_seed);
    let anchors = detect::find_dominant_anchors(&filtered, config.saturation_cap);

    let (background, foreground) = assign::resolve_background(&anchors, &config.background);
    let bounds = ContrastBounds::for_background(&background);

    let base = contrast::pick_n_best(
        config.palette_size / 2,
        &clusters.improved,
        &anchors,
        &bounds,
    );
    let base = contrast::clip_between_boundaries(&base, &anchors, &bounds);
    let expanded = complement::generate_complementary(
        &base,
        config.complement_delta_lightness,
        config.complement_delta_saturation,
    );

    Ok(assign::assemble(background, foreground, &expanded))
}
