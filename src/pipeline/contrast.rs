use log::debug;

use crate::color::Hsl;
use crate::pipeline::detect::Anchors;

/// WCAG 2.0 AAA contrast for normal text.
const STRICT_CONTRAST: f32 = 7.0;
/// Relaxed bound for the anchor the text does not sit on.
const RELAXED_CONTRAST: f32 = 2.5;

/// Keep clipped colors a hair inside the compliant interval so a later
/// contrast check does not fail on rounding.
const EDGE_INSET: f32 = 1e-3;

/// Minimum contrast ratios a palette color must meet against each anchor.
#[derive(Debug, Clone, Copy)]
pub struct ContrastBounds {
    /// Minimum ratio against the dark anchor.
    pub min_dark: f32,
    /// Minimum ratio against the light anchor.
    pub min_light: f32,
}

impl ContrastBounds {
    /// The strict AAA bound applies against whichever anchor serves as the
    /// background; palette colors are read as text on that background, so
    /// their separation from it matters more than from the foreground tone.
    pub fn for_background(background: &Hsl) -> Self {
        if background.lightness() > 0.5 {
            Self {
                min_dark: RELAXED_CONTRAST,
                min_light: STRICT_CONTRAST,
            }
        } else {
            Self {
                min_dark: STRICT_CONTRAST,
                min_light: RELAXED_CONTRAST,
            }
        }
    }
}

/// Closed luminance interval, endpoints inclusive.
#[derive(Debug, Clone, Copy)]
struct Interval {
    lo: f32,
    hi: f32,
}

impl Interval {
    fn contains(&self, value: f32) -> bool {
        value >= self.lo && value <= self.hi
    }
}

/// Luminance ranges at which a color meets `bound` against an anchor of
/// luminance `anchor_lum`: far enough above it, or far enough below.
fn compliant_intervals(anchor_lum: f32, bound: f32) -> Vec<Interval> {
    let mut intervals = Vec::with_capacity(2);
    let above = bound * (anchor_lum + 0.05) - 0.05;
    if above <= 1.0 {
        intervals.push(Interval {
            lo: above.max(0.0),
            hi: 1.0,
        });
    }
    let below = (anchor_lum + 0.05) / bound - 0.05;
    if below >= 0.0 {
        intervals.push(Interval {
            lo: 0.0,
            hi: below.min(1.0),
        });
    }
    intervals
}

/// Luminance ranges satisfying both anchor bounds at once. May be empty when
/// the anchors sit too close together for the requested ratios.
fn feasible_set(anchors: &Anchors, bounds: &ContrastBounds) -> Vec<Interval> {
    let versus_dark = compliant_intervals(anchors.dark.relative_luminance(), bounds.min_dark);
    let versus_light = compliant_intervals(anchors.light.relative_luminance(), bounds.min_light);

    let mut feasible = Vec::new();
    for a in &versus_dark {
        for b in &versus_light {
            let lo = a.lo.max(b.lo);
            let hi = a.hi.min(b.hi);
            if lo <= hi {
                feasible.push(Interval { lo, hi });
            }
        }
    }
    feasible
}

fn set_contains(set: &[Interval], value: f32) -> bool {
    set.iter().any(|interval| interval.contains(value))
}

/// Nearest luminance inside the set, nudged off the exact edge.
fn nearest_point(set: &[Interval], value: f32) -> f32 {
    let mut best = set[0];
    let mut best_distance = f32::MAX;
    for interval in set {
        let distance = if value < interval.lo {
            interval.lo - value
        } else if value > interval.hi {
            value - interval.hi
        } else {
            0.0
        };
        if distance < best_distance {
            best_distance = distance;
            best = *interval;
        }
    }
    if value < best.lo {
        (best.lo + EDGE_INSET).min(best.hi)
    } else {
        (best.hi - EDGE_INSET).max(best.lo)
    }
}

/// When both bounds cannot hold at once, the background-side bound (the
/// strict one) wins, at the boundary closest to satisfying the other.
fn fallback_target(anchors: &Anchors, bounds: &ContrastBounds) -> f32 {
    if bounds.min_dark >= bounds.min_light {
        (bounds.min_dark * (anchors.dark.relative_luminance() + 0.05) - 0.05 + EDGE_INSET)
            .clamp(0.0, 1.0)
    } else {
        ((anchors.light.relative_luminance() + 0.05) / bounds.min_light - 0.05 - EDGE_INSET)
            .clamp(0.0, 1.0)
    }
}

/// Desirability score favoring saturated, vivid colors.
fn vividness(color: &Hsl) -> f32 {
    let lightness = color.lightness();
    // HSV value of the same color
    let value = lightness + color.saturation() * lightness.min(1.0 - lightness);
    color.saturation() + value
}

/// Relative luminance is monotone in HSL lightness for fixed hue and
/// saturation, so a bisection on lightness converges to the target. Hue is
/// never touched.
fn match_luminance(color: Hsl, target: f32) -> Hsl {
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    for _ in 0..24 {
        let mid = (lo + hi) / 2.0;
        if color.with_lightness(mid).relative_luminance() < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    color.with_lightness((lo + hi) / 2.0)
}

/// Rank centroids by vividness, preferring those already meeting both
/// contrast bounds, and take exactly `n`.
///
/// A degenerate centroid pool smaller than `n` is padded cyclically; the
/// caller's cluster count normally guarantees enough centroids.
pub fn pick_n_best(
    n: usize,
    centroids: &[Hsl],
    anchors: &Anchors,
    bounds: &ContrastBounds,
) -> Vec<Hsl> {
    let feasible = feasible_set(anchors, bounds);
    let mut ranked: Vec<(bool, f32, Hsl)> = centroids
        .iter()
        .map(|c| {
            (
                set_contains(&feasible, c.relative_luminance()),
                vividness(c),
                *c,
            )
        })
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.total_cmp(&a.1)));

    let qualifying = ranked.iter().take_while(|r| r.0).count();
    debug!("{qualifying}/{} centroids meet both contrast bounds", centroids.len());

    let mut picked: Vec<Hsl> = ranked.into_iter().take(n).map(|r| r.2).collect();
    let mut index = 0;
    while picked.len() < n && !picked.is_empty() {
        picked.push(picked[index]);
        index += 1;
    }
    picked
}

/// Move each color the shortest luminance distance needed to satisfy both
/// contrast bounds, keeping hue and saturation fixed.
///
/// Colors already inside a compliant luminance range pass through untouched.
/// Coincident centroids (contrast 1.0 against everything) are promoted like
/// any other non-compliant color rather than rejected.
pub fn clip_between_boundaries(
    colors: &[Hsl],
    anchors: &Anchors,
    bounds: &ContrastBounds,
) -> Vec<Hsl> {
    let feasible = feasible_set(anchors, bounds);
    colors
        .iter()
        .map(|color| {
            let luminance = color.relative_luminance();
            if set_contains(&feasible, luminance) {
                return *color;
            }
            let target = if feasible.is_empty() {
                fallback_target(anchors, bounds)
            } else {
                nearest_point(&feasible, luminance)
            };
            match_luminance(*color, target)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mid_anchors() -> Anchors {
        // Far enough apart that both defaults are jointly satisfiable.
        Anchors {
            dark: Hsl::new(0.6, 0.2, 0.1),
            light: Hsl::new(0.1, 0.2, 0.5),
        }
    }

    fn wheel(count: usize) -> Vec<Hsl> {
        (0..count)
            .map(|i| Hsl::new(i as f32 / count as f32, 0.8, 0.5))
            .collect()
    }

    #[test]
    fn dark_background_gets_strict_dark_bound() {
        let bounds = ContrastBounds::for_background(&Hsl::new(0.0, 0.1, 0.1));
        assert_eq!(bounds.min_dark, 7.0);
        assert_eq!(bounds.min_light, 2.5);
    }

    #[test]
    fn light_background_gets_strict_light_bound() {
        let bounds = ContrastBounds::for_background(&Hsl::new(0.0, 0.1, 0.9));
        assert_eq!(bounds.min_dark, 2.5);
        assert_eq!(bounds.min_light, 7.0);
    }

    #[test]
    fn returns_exactly_n() {
        let anchors = mid_anchors();
        let bounds = ContrastBounds::for_background(&anchors.dark);
        let picked = pick_n_best(8, &wheel(32), &anchors, &bounds);
        assert_eq!(picked.len(), 8);
    }

    #[test]
    fn pads_small_centroid_pools() {
        let anchors = mid_anchors();
        let bounds = ContrastBounds::for_background(&anchors.dark);
        let picked = pick_n_best(8, &wheel(3), &anchors, &bounds);
        assert_eq!(picked.len(), 8);
    }

    #[test]
    fn clipped_colors_meet_both_bounds() {
        let anchors = mid_anchors();
        let bounds = ContrastBounds::for_background(&anchors.dark);
        let picked = pick_n_best(8, &wheel(32), &anchors, &bounds);
        let clipped = clip_between_boundaries(&picked, &anchors, &bounds);

        assert_eq!(clipped.len(), 8);
        for color in &clipped {
            let versus_dark = Hsl::contrast_ratio(color, &anchors.dark);
            let versus_light = Hsl::contrast_ratio(color, &anchors.light);
            assert!(
                versus_dark >= bounds.min_dark - 0.05,
                "contrast vs dark anchor {versus_dark} under {}",
                bounds.min_dark
            );
            assert!(
                versus_light >= bounds.min_light - 0.05,
                "contrast vs light anchor {versus_light} under {}",
                bounds.min_light
            );
        }
    }

    #[test]
    fn clipping_preserves_hue() {
        let anchors = mid_anchors();
        let bounds = ContrastBounds::for_background(&anchors.dark);
        let dim = vec![Hsl::new(0.33, 0.9, 0.15)];
        let clipped = clip_between_boundaries(&dim, &anchors, &bounds);
        assert!((clipped[0].hue() - 0.33).abs() < 1e-6);
        assert!((clipped[0].saturation() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn compliant_colors_pass_through_untouched() {
        let anchors = mid_anchors();
        let bounds = ContrastBounds::for_background(&anchors.dark);
        let bright = Hsl::new(0.15, 0.9, 0.85);
        assert!(Hsl::contrast_ratio(&bright, &anchors.dark) >= bounds.min_dark);
        assert!(Hsl::contrast_ratio(&bright, &anchors.light) >= bounds.min_light);

        let clipped = clip_between_boundaries(&[bright], &anchors, &bounds);
        assert_eq!(clipped[0], bright);
    }

    #[test]
    fn coincident_centroids_are_promoted_not_rejected() {
        let anchors = mid_anchors();
        let bounds = ContrastBounds::for_background(&anchors.dark);
        // Every centroid identical to the dark anchor: contrast 1.0 all around.
        let duplicates = vec![anchors.dark; 8];
        let clipped = clip_between_boundaries(&duplicates, &anchors, &bounds);
        for color in &clipped {
            assert!(Hsl::contrast_ratio(color, &anchors.dark) >= bounds.min_dark - 0.05);
        }
    }

    #[test]
    fn qualifying_centroids_are_preferred() {
        let anchors = mid_anchors();
        let bounds = ContrastBounds::for_background(&anchors.dark);
        // One compliant color among many too-dark ones.
        let mut centroids = vec![Hsl::new(0.5, 0.3, 0.12); 10];
        let compliant = Hsl::new(0.15, 0.9, 0.9);
        centroids.push(compliant);

        let picked = pick_n_best(8, &centroids, &anchors, &bounds);
        assert_eq!(picked[0], compliant);
    }

    #[test]
    fn infeasible_anchor_pair_falls_back_to_background_bound() {
        // A midtone anchor pair: nothing is 7:1 above the dark anchor while
        // staying 2.5:1 below the light one.
        let anchors = Anchors {
            dark: Hsl::new(0.0, 0.1, 0.25),
            light: Hsl::new(0.0, 0.1, 0.74),
        };
        let bounds = ContrastBounds::for_background(&anchors.dark);
        let clipped = clip_between_boundaries(&wheel(8), &anchors, &bounds);
        for color in &clipped {
            assert!(
                Hsl::contrast_ratio(color, &anchors.dark) >= bounds.min_dark - 0.05,
                "background-side bound must still hold"
            );
        }
    }
}
