use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::TAU;

use kmeans_colors::{get_kmeans, Calculate};
use log::debug;
use rand::Rng;

use crate::color::{hue_from_circle, hue_to_circle, Hsl};

const MAX_ITER: usize = 20;
const CONVERGE: f32 = 0.0025;

/// Squared distance in the circularized space below which two colors count
/// as duplicates for [`prune_similar`].
pub const PRUNE_DISTANCE_SQ: f32 = 0.0025;

/// Centroids from both clustering passes over the same pixel population.
///
/// `improved` centroids come from the 4-D hue-circularized run and drive all
/// downstream selection. `plain` centroids treat hue as a linear quantity and
/// are kept only as a reference view for external preview collaborators.
#[derive(Debug, Clone)]
pub struct ClusterOutput {
    pub plain: Vec<Hsl>,
    pub improved: Vec<Hsl>,
}

/// HSL triple treated as a plain 3-D Euclidean point.
///
/// Hue is linear here, which mishandles the 0/1 wrap: 0.99 and 0.01 appear
/// maximally distant. See [`HuePoint`] for the corrected representation.
#[derive(Debug, Clone, PartialEq)]
struct HslPoint {
    h: f32,
    s: f32,
    l: f32,
}

impl HslPoint {
    fn from_color(color: &Hsl) -> Self {
        Self {
            h: color.hue(),
            s: color.saturation(),
            l: color.lightness(),
        }
    }

    fn to_color(&self) -> Hsl {
        Hsl::new(self.h, self.s, self.l)
    }
}

/// 4-D point with hue unrolled onto the unit circle so that clustering
/// distance respects hue wraparound without a custom metric.
#[derive(Debug, Clone, PartialEq)]
struct HuePoint {
    x: f32,
    y: f32,
    s: f32,
    l: f32,
}

impl HuePoint {
    fn from_color(color: &Hsl) -> Self {
        let (x, y) = hue_to_circle(color.hue());
        Self {
            x,
            y,
            s: color.saturation(),
            l: color.lightness(),
        }
    }

    /// Decode back to HSL. Averaged cluster centers lie inside the unit
    /// circle; the angle still recovers the hue, and a zero vector falls
    /// back to hue 0.
    fn to_color(&self) -> Hsl {
        Hsl::new(hue_from_circle(self.x, self.y), self.s, self.l)
    }
}

impl Calculate for HslPoint {
    fn get_closest_centroid(points: &[Self], centroids: &[Self], indices: &mut Vec<u8>) {
        for point in points.iter() {
            let mut index = 0;
            let mut min = f32::MAX;
            for (idx, centroid) in centroids.iter().enumerate() {
                let diff = Self::difference(point, centroid);
                if diff < min {
                    min = diff;
                    index = idx;
                }
            }
            indices.push(index as u8);
        }
    }

    fn recalculate_centroids(
        rng: &mut impl Rng,
        points: &[Self],
        centroids: &mut [Self],
        indices: &[u8],
    ) {
        for (idx, centroid) in centroids.iter_mut().enumerate() {
            let mut h = 0.0;
            let mut s = 0.0;
            let mut l = 0.0;
            let mut count: u64 = 0;
            for (&assigned, point) in indices.iter().zip(points) {
                if usize::from(assigned) == idx {
                    h += point.h;
                    s += point.s;
                    l += point.l;
                    count += 1;
                }
            }
            if count > 0 {
                let n = count as f32;
                *centroid = Self {
                    h: h / n,
                    s: s / n,
                    l: l / n,
                };
            } else {
                *centroid = Self::create_random(rng);
            }
        }
    }

    fn check_loop(centroids: &[Self], old_centroids: &[Self]) -> f32 {
        centroids
            .iter()
            .zip(old_centroids)
            .map(|(new, old)| Self::difference(new, old))
            .sum()
    }

    fn create_random(rng: &mut impl Rng) -> Self {
        Self {
            h: rng.gen_range(0.0..1.0),
            s: rng.gen_range(0.0..=1.0),
            l: rng.gen_range(0.0..=1.0),
        }
    }

    fn difference(c1: &Self, c2: &Self) -> f32 {
        (c1.h - c2.h).powi(2) + (c1.s - c2.s).powi(2) + (c1.l - c2.l).powi(2)
    }
}

impl Calculate for HuePoint {
    fn get_closest_centroid(points: &[Self], centroids: &[Self], indices: &mut Vec<u8>) {
        for point in points.iter() {
            let mut index = 0;
            let mut min = f32::MAX;
            for (idx, centroid) in centroids.iter().enumerate() {
                let diff = Self::difference(point, centroid);
                if diff < min {
                    min = diff;
                    index = idx;
                }
            }
            indices.push(index as u8);
        }
    }

    fn recalculate_centroids(
        rng: &mut impl Rng,
        points: &[Self],
        centroids: &mut [Self],
        indices: &[u8],
    ) {
        for (idx, centroid) in centroids.iter_mut().enumerate() {
            let mut x = 0.0;
            let mut y = 0.0;
            let mut s = 0.0;
            let mut l = 0.0;
            let mut count: u64 = 0;
            for (&assigned, point) in indices.iter().zip(points) {
                if usize::from(assigned) == idx {
                    x += point.x;
                    y += point.y;
                    s += point.s;
                    l += point.l;
                    count += 1;
                }
            }
            if count > 0 {
                let n = count as f32;
                *centroid = Self {
                    x: x / n,
                    y: y / n,
                    s: s / n,
                    l: l / n,
                };
            } else {
                *centroid = Self::create_random(rng);
            }
        }
    }

    fn check_loop(centroids: &[Self], old_centroids: &[Self]) -> f32 {
        centroids
            .iter()
            .zip(old_centroids)
            .map(|(new, old)| Self::difference(new, old))
            .sum()
    }

    fn create_random(rng: &mut impl Rng) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        Self {
            x: angle.cos(),
            y: angle.sin(),
            s: rng.gen_range(0.0..=1.0),
            l: rng.gen_range(0.0..=1.0),
        }
    }

    fn difference(c1: &Self, c2: &Self) -> f32 {
        (c1.x - c2.x).powi(2)
            + (c1.y - c2.y).powi(2)
            + (c1.s - c2.s).powi(2)
            + (c1.l - c2.l).powi(2)
    }
}

/// Run k-means twice over the pixel population: once on plain HSL triples
/// and once on the hue-circularized 4-D representation.
///
/// Both runs use the same cluster count and seed; each returns exactly `k`
/// centroids. Empty clusters are re-randomized by the primitive, so
/// coincident or stray centroids are possible on degenerate input and are
/// tolerated by the selection stages.
pub fn cluster(pixels: &[Hsl], k: usize, seed: u64) -> ClusterOutput {
    let plain_points: Vec<HslPoint> = pixels.iter().map(HslPoint::from_color).collect();
    let plain_run = get_kmeans(k, MAX_ITER, CONVERGE, false, &plain_points, seed);

    let hue_points: Vec<HuePoint> = pixels.iter().map(HuePoint::from_color).collect();
    let hue_run = get_kmeans(k, MAX_ITER, CONVERGE, false, &hue_points, seed);

    debug!(
        "clustered {} pixels into {} centroids (scores {:.4} plain / {:.4} improved)",
        pixels.len(),
        k,
        plain_run.score,
        hue_run.score
    );

    ClusterOutput {
        plain: plain_run.centroids.iter().map(HslPoint::to_color).collect(),
        improved: hue_run.centroids.iter().map(HuePoint::to_color).collect(),
    }
}

#[derive(PartialEq)]
struct CentroidPair {
    dist: f32,
    first: usize,
    second: usize,
}

impl Eq for CentroidPair {}

impl Ord for CentroidPair {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then(self.first.cmp(&other.first))
            .then(self.second.cmp(&other.second))
    }
}

impl PartialOrd for CentroidPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Remove colors until no remaining pair is closer than `min_distance_sq`
/// (squared distance in the hue-circularized space).
///
/// Pairs are processed closest-first through a min-heap, so each removal is
/// O(log n) without rescanning all pairs; removals leave the surviving
/// pairwise distances untouched, so stale heap entries are skipped lazily.
/// On equal distances the pair with the lowest indices is processed first
/// and the earlier color of the pair is kept.
pub fn prune_similar(colors: &mut Vec<Hsl>, min_distance_sq: f32) {
    let points: Vec<HuePoint> = colors.iter().map(HuePoint::from_color).collect();
    let mut heap = BinaryHeap::new();
    for first in 0..points.len() {
        for second in first + 1..points.len() {
            let dist = HuePoint::difference(&points[first], &points[second]);
            if dist < min_distance_sq {
                heap.push(std::cmp::Reverse(CentroidPair { dist, first, second }));
            }
        }
    }

    let mut alive = vec![true; colors.len()];
    while let Some(std::cmp::Reverse(pair)) = heap.pop() {
        if alive[pair.first] && alive[pair.second] {
            alive[pair.second] = false;
        }
    }

    let mut index = 0;
    colors.retain(|_| {
        let keep = alive[index];
        index += 1;
        keep
    });
}
