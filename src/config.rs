use std::str::FromStr;

use crate::color::Hsl;
use crate::error::Error;

/// Which detected anchor becomes the background role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundMode {
    /// Use the dominant dark color as background.
    Auto,
    /// Force the dominant dark color as background.
    Dark,
    /// Force the dominant light color as background.
    Light,
    /// Use an explicit color; the foreground anchor is chosen to oppose it.
    Hex(Hsl),
}

impl FromStr for BackgroundMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "auto" => Ok(Self::Auto),
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ if s.starts_with('#') => Ok(Self::Hex(Hsl::from_hex(s)?)),
            _ => Err(Error::InvalidConfig {
                reason: format!("unknown background mode {s:?}"),
            }),
        }
    }
}

/// Tuning knobs for the whole pipeline, passed explicitly into the entry
/// point. There is no process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub background: BackgroundMode,
    /// Number of k-means centroids per clustering pass.
    pub cluster_count: usize,
    /// Total ANSI palette colors to produce (normal + bright).
    pub palette_size: usize,
    /// Pixels at or below this lightness are dropped before clustering.
    pub lightness_threshold: f32,
    /// Maximum saturation allowed for the background/foreground anchors.
    pub saturation_cap: f32,
    /// Lightness delta applied when synthesizing bright complements.
    pub complement_delta_lightness: f32,
    /// Saturation delta applied when synthesizing bright complements.
    pub complement_delta_saturation: f32,
    /// Seed for the clustering primitive. Runs with the same seed and input
    /// are bit-identical; this is the only source of nondeterminism.
    pub kmeans_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background: BackgroundMode::Auto,
            cluster_count: 32,
            palette_size: 16,
            lightness_threshold: 0.05,
            saturation_cap: 0.2,
            complement_delta_lightness: 0.12,
            complement_delta_saturation: 0.07,
            kmeans_seed: 42,
        }
    }
}

impl Config {
    /// Check all numeric parameters before the pipeline runs.
    pub fn validate(&self) -> Result<(), Error> {
        let unit_range = |name: &str, value: f32| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::InvalidConfig {
                    reason: format!("{name} must be within [0, 1], got {value}"),
                })
            }
        };
        unit_range("lightness_threshold", self.lightness_threshold)?;
        unit_range("saturation_cap", self.saturation_cap)?;
        unit_range("complement_delta_lightness", self.complement_delta_lightness)?;
        unit_range("complement_delta_saturation", self.complement_delta_saturation)?;

        if self.palette_size < 16 || self.palette_size % 2 != 0 {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "palette_size must be an even number of at least 16 to fill \
                     the ANSI slot table, got {}",
                    self.palette_size
                ),
            });
        }
        if self.cluster_count < self.palette_size {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "cluster_count ({}) must be at least palette_size ({})",
                    self.cluster_count, self.palette_size
                ),
            });
        }
        // The clustering primitive indexes clusters with u8.
        if self.cluster_count > 256 {
            return Err(Error::InvalidConfig {
                reason: format!("cluster_count must be at most 256, got {}", self.cluster_count),
            });
        }
        Ok(())
    }
}
