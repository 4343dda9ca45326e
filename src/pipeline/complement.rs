use crate::color::Hsl;

/// Expand each base color into a (normal, bright) pair.
///
/// A base darker than the list's average lightness gets a brighter,
/// slightly desaturated complement. A base at or above the average is
/// instead darkened and saturated itself, with the untouched original
/// serving as its bright complement.
///
/// The output is interleaved (base0, comp0, base1, comp1, ...) and always
/// exactly twice the input length; role assignment indexes into it
/// positionally, so the interleaving is a hard contract.
pub fn generate_complementary(base: &[Hsl], delta_lightness: f32, delta_saturation: f32) -> Vec<Hsl> {
    if base.is_empty() {
        return Vec::new();
    }
    let average_lightness: f32 =
        base.iter().map(|c| c.lightness()).sum::<f32>() / base.len() as f32;

    let mut expanded = Vec::with_capacity(base.len() * 2);
    for color in base {
        if color.lightness() < average_lightness {
            let complement = color
                .with_lightness(color.lightness() + delta_lightness)
                .with_saturation(color.saturation() - delta_saturation);
            expanded.push(*color);
            expanded.push(complement);
        } else {
            let darkened = color
                .with_lightness(color.lightness() - delta_lightness)
                .with_saturation(color.saturation() + delta_saturation);
            expanded.push(darkened);
            expanded.push(*color);
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELTA_L: f32 = 0.12;
    const DELTA_S: f32 = 0.07;

    #[test]
    fn output_is_twice_input_length() {
        for n in [1, 4, 8] {
            let base: Vec<Hsl> = (0..n).map(|i| Hsl::new(i as f32 / n as f32, 0.5, 0.5)).collect();
            let expanded = generate_complementary(&base, DELTA_L, DELTA_S);
            assert_eq!(expanded.len(), 2 * n);
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(generate_complementary(&[], DELTA_L, DELTA_S).is_empty());
    }

    #[test]
    fn dark_base_keeps_position_and_gains_bright_complement() {
        // First color is below the average lightness of 0.5.
        let base = [Hsl::new(0.1, 0.5, 0.3), Hsl::new(0.5, 0.5, 0.7)];
        let expanded = generate_complementary(&base, DELTA_L, DELTA_S);

        assert_eq!(expanded[0], base[0]);
        assert!((expanded[1].lightness() - 0.42).abs() < 1e-5);
        assert!((expanded[1].saturation() - 0.43).abs() < 1e-5);
    }

    #[test]
    fn light_base_is_darkened_with_original_as_complement() {
        let base = [Hsl::new(0.1, 0.5, 0.3), Hsl::new(0.5, 0.5, 0.7)];
        let expanded = generate_complementary(&base, DELTA_L, DELTA_S);

        assert!((expanded[2].lightness() - 0.58).abs() < 1e-5);
        assert!((expanded[2].saturation() - 0.57).abs() < 1e-5);
        assert_eq!(expanded[3], base[1]);
    }

    #[test]
    fn hue_is_never_touched() {
        let base: Vec<Hsl> = (0..8).map(|i| Hsl::new(i as f32 / 8.0, 0.6, 0.2 + 0.08 * i as f32)).collect();
        let expanded = generate_complementary(&base, DELTA_L, DELTA_S);
        for (pair, original) in expanded.chunks(2).zip(&base) {
            assert!((pair[0].hue() - original.hue()).abs() < 1e-6);
            assert!((pair[1].hue() - original.hue()).abs() < 1e-6);
        }
    }

    #[test]
    fn channels_stay_in_unit_range() {
        let base = [
            Hsl::new(0.0, 0.99, 0.02),
            Hsl::new(0.3, 0.01, 0.97),
            Hsl::new(0.6, 1.0, 0.5),
        ];
        let expanded = generate_complementary(&base, DELTA_L, DELTA_S);
        for color in &expanded {
            assert!((0.0..=1.0).contains(&color.saturation()));
            assert!((0.0..=1.0).contains(&color.lightness()));
            assert!((0.0..1.0).contains(&color.hue()));
        }
    }

    #[test]
    fn uniform_lightness_darkens_every_base() {
        // Everything is exactly at the average, so the at-or-above branch
        // applies across the board.
        let base = vec![Hsl::new(0.2, 0.5, 0.5); 4];
        let expanded = generate_complementary(&base, DELTA_L, DELTA_S);
        for pair in expanded.chunks(2) {
            assert!((pair[0].lightness() - 0.38).abs() < 1e-5);
            assert_eq!(pair[1], base[0]);
        }
    }
}
