//! Deterministic synthetic point clouds for tests and benchmarks.
//!
//! Every generator is seeded, so the same arguments always produce the same
//! coordinates.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Axis-aligned hypercube blobs around fixed centres.
#[derive(Clone, Debug, PartialEq)]
pub struct BlobSpec<const D: usize> {
    /// Blob centres.
    pub centres: Vec<[f32; D]>,
    /// Points drawn per blob.
    pub points_per_blob: usize,
    /// Half edge length of the cube each blob is drawn from.
    pub half_width: f32,
}

/// Draws the blobs described by `spec`, blob by blob.
///
/// # Examples
/// ```
/// use clue_test_support::datasets::{BlobSpec, blobs};
///
/// let spec = BlobSpec { centres: vec![[0.0, 0.0], [10.0, 10.0]], points_per_blob: 5, half_width: 0.5 };
/// let points = blobs(&spec, 7);
/// assert_eq!(points.len(), 10);
/// assert!(points[..5].iter().all(|p| p[0].abs() <= 0.5 && p[1].abs() <= 0.5));
/// ```
#[must_use]
pub fn blobs<const D: usize>(spec: &BlobSpec<D>, seed: u64) -> Vec<[f32; D]> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(spec.centres.len() * spec.points_per_blob);
    for centre in &spec.centres {
        for _ in 0..spec.points_per_blob {
            points.push(centre.map(|c| c + rng.gen_range(-spec.half_width..=spec.half_width)));
        }
    }
    points
}

/// Scatters `count` points uniformly over `[lo, hi)` in every dimension.
#[must_use]
pub fn uniform<const D: usize>(count: usize, lo: f32, hi: f32, seed: u64) -> Vec<[f32; D]> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| std::array::from_fn(|_| rng.gen_range(lo..hi)))
        .collect()
}

/// `count` points spaced `step` apart along the first axis, all other
/// coordinates zero.
///
/// With a critical distance between `step` and `2 * step` every interior
/// point sees exactly its two neighbours, so the follower chain runs the
/// length of the line.
#[must_use]
pub fn chain<const D: usize>(count: usize, step: f32) -> Vec<[f32; D]> {
    (0..count)
        .map(|i| {
            let mut point = [0.0; D];
            if let Some(first) = point.first_mut() {
                // Test data stays far below 2^24 points.
                *first = i as f32 * step;
            }
            point
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_are_reproducible() {
        let spec = BlobSpec {
            centres: vec![[1.0, 2.0, 3.0]],
            points_per_blob: 20,
            half_width: 1.0,
        };
        assert_eq!(blobs(&spec, 11), blobs(&spec, 11));
        assert_ne!(blobs(&spec, 11), blobs(&spec, 12));
        assert_eq!(uniform::<2>(8, 0.0, 1.0, 3), uniform::<2>(8, 0.0, 1.0, 3));
    }

    #[test]
    fn chain_spaces_points_along_first_axis() {
        let points = chain::<2>(4, 0.5);
        assert_eq!(points, vec![[0.0, 0.0], [0.5, 0.0], [1.0, 0.0], [1.5, 0.0]]);
    }
}
