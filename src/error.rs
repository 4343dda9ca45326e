use thiserror::Error;

/// Errors surfaced by the palette pipeline.
///
/// Only truly empty input is fatal. Clustering degeneracies (duplicate
/// centroids, too few distinct colors) are absorbed by fallback rules in the
/// selection stages and never reach this enum.
#[derive(Debug, Error)]
pub enum Error {
    /// The input pixel array was empty.
    #[error("input contains no pixels")]
    EmptyInput,

    /// Every pixel fell at or below the lightness filter threshold, leaving
    /// nothing to cluster.
    #[error("all {total} pixels are at or below the lightness threshold {threshold}")]
    AllPixelsFiltered { total: usize, threshold: f32 },

    /// A background hex string did not parse as `#rrggbb`.
    #[error("invalid hex color {input:?}: expected #rrggbb")]
    InvalidHex { input: String },

    /// A configuration value was out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
