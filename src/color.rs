use std::f32::consts::TAU;

use palette::{IntoColor, Srgb};

use crate::error::Error;

/// Core color type used throughout the pipeline.
///
/// Components are HSL with hue in `[0, 1)`. Hue is circular and wraps modulo
/// 1 (0.99 and 0.01 are neighbors); saturation and lightness are clamped to
/// `[0, 1]` after any arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    h: f32,
    s: f32,
    l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self {
            h: wrap_hue(h),
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
        }
    }

    pub fn hue(self) -> f32 {
        self.h
    }

    pub fn saturation(self) -> f32 {
        self.s
    }

    pub fn lightness(self) -> f32 {
        self.l
    }

    /// Replace saturation, clamping to `[0, 1]`.
    pub fn with_saturation(self, s: f32) -> Self {
        Self::new(self.h, s, self.l)
    }

    /// Replace lightness, clamping to `[0, 1]`.
    pub fn with_lightness(self, l: f32) -> Self {
        Self::new(self.h, self.s, l)
    }

    /// Convert from sRGB with 0-255 integer channels.
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        let srgb: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
        Self::from_rgb_f32([srgb.red, srgb.green, srgb.blue])
    }

    /// Convert from sRGB with pre-normalized 0-1 float channels.
    pub fn from_rgb_f32(rgb: [f32; 3]) -> Self {
        let hsl: palette::Hsl = Srgb::new(rgb[0], rgb[1], rgb[2]).into_color();
        Self::new(
            hsl.hue.into_positive_degrees() / 360.0,
            hsl.saturation,
            hsl.lightness,
        )
    }

    /// Convert to sRGB float channels in `[0, 1]`.
    pub fn to_rgb_f32(self) -> [f32; 3] {
        let hsl: palette::Hsl = palette::Hsl::new(self.h * 360.0, self.s, self.l);
        let rgb: Srgb<f32> = hsl.into_color();
        [rgb.red, rgb.green, rgb.blue]
    }

    /// Convert to sRGB with 0-255 integer channels.
    pub fn to_rgb8(self) -> [u8; 3] {
        let [r, g, b] = self.to_rgb_f32();
        [
            (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Parse a hex color string like `#ff8800` or `#FF8800`.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex {
                input: hex.to_string(),
            });
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| Error::InvalidHex {
                input: hex.to_string(),
            })
        };
        Ok(Self::from_rgb8([channel(0)?, channel(2)?, channel(4)?]))
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let [r, g, b] = self.to_rgb_f32();
        0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
    }

    /// WCAG 2.0 contrast ratio between two colors.
    ///
    /// Returns a value in [1, 21]. Higher means more contrast.
    pub fn contrast_ratio(c1: &Hsl, c2: &Hsl) -> f32 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn wrap_hue(h: f32) -> f32 {
    let wrapped = h.rem_euclid(1.0);
    // rem_euclid(1.0) of values like -1e-9 can round up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Project a hue onto the unit circle as `(cos 2πh, sin 2πh)` so that
/// Euclidean distance respects the wrap at the 0/1 boundary.
pub fn hue_to_circle(h: f32) -> (f32, f32) {
    let angle = h * TAU;
    (angle.cos(), angle.sin())
}

/// Recover a hue in `[0, 1)` from a point near the unit circle. The negative
/// sine half-plane maps to the upper half of the hue range. A degenerate
/// zero vector (an ill-defined cluster center) falls back to hue 0.
pub fn hue_from_circle(x: f32, y: f32) -> f32 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    wrap_hue(y.atan2(x) / TAU)
}
