//! Seeded synthetic point clouds: uniform blobs on a ring plus a fraction of
//! background noise spread over the bounding box.

use std::f32::consts::PI;

use clue_core::PointSet;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::error::BenchSetupError;

/// Errors raised when a [`BlobConfig`] is inconsistent.
#[derive(Debug, Error, PartialEq)]
pub enum SyntheticError {
    /// At least one blob is required.
    #[error("cluster_count must be at least one")]
    ZeroClusters,
    /// More blobs than points were requested.
    #[error("cluster_count ({cluster_count}) exceeds point_count ({point_count})")]
    ClusterCountExceedsPointCount {
        /// Requested blobs.
        cluster_count: usize,
        /// Requested points.
        point_count: usize,
    },
    /// A float parameter was non-finite or out of range.
    #[error("parameter `{parameter}` is out of range")]
    InvalidFloatParameter {
        /// Name of the parameter.
        parameter: &'static str,
    },
}

/// Configuration for [`generate_blobs`].
#[derive(Clone, Debug)]
pub struct BlobConfig {
    /// Total number of points, noise included.
    pub point_count: usize,
    /// Number of blobs.
    pub cluster_count: usize,
    /// Radius of the ring the blob centres sit on.
    pub separation: f32,
    /// Half edge length of the cube each blob is drawn from.
    pub spread: f32,
    /// Share of points drawn uniformly over the bounding box, in `[0, 1)`.
    pub noise_fraction: f32,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl BlobConfig {
    fn validate(&self) -> Result<(), SyntheticError> {
        if self.cluster_count == 0 {
            return Err(SyntheticError::ZeroClusters);
        }
        if self.cluster_count > self.point_count {
            return Err(SyntheticError::ClusterCountExceedsPointCount {
                cluster_count: self.cluster_count,
                point_count: self.point_count,
            });
        }
        if !self.separation.is_finite() || self.separation <= 0.0 {
            return Err(SyntheticError::InvalidFloatParameter {
                parameter: "separation",
            });
        }
        if !self.spread.is_finite() || self.spread <= 0.0 {
            return Err(SyntheticError::InvalidFloatParameter { parameter: "spread" });
        }
        if !(0.0..1.0).contains(&self.noise_fraction) {
            return Err(SyntheticError::InvalidFloatParameter {
                parameter: "noise_fraction",
            });
        }
        Ok(())
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "centre placement uses index-derived angles"
)]
#[expect(
    clippy::float_arithmetic,
    reason = "centre placement uses trigonometric expressions"
)]
fn blob_centres<const D: usize>(config: &BlobConfig, rng: &mut SmallRng) -> Vec<[f32; D]> {
    (0..config.cluster_count)
        .map(|cluster| {
            let angle = (cluster as f32 / config.cluster_count as f32) * (2.0 * PI);
            let mut centre = [0.0_f32; D];
            if let Some(value) = centre.get_mut(0) {
                *value = config.separation * angle.cos();
            }
            if let Some(value) = centre.get_mut(1) {
                *value = config.separation * angle.sin();
            }
            for value in centre.iter_mut().skip(2) {
                *value = rng.gen_range((-0.2 * config.separation)..(0.2 * config.separation));
            }
            centre
        })
        .collect()
}

/// Draws a [`PointSet`] of `config.point_count` points in `D` dimensions.
///
/// Blob points are assigned round-robin, so blob sizes differ by at most one.
///
/// # Errors
/// Returns [`BenchSetupError::Synthetic`] for an inconsistent configuration
/// and [`BenchSetupError::Clue`] when the points fail validation.
///
/// # Examples
/// ```
/// use clue_benches::source::{BlobConfig, generate_blobs};
///
/// let config = BlobConfig {
///     point_count: 64,
///     cluster_count: 4,
///     separation: 20.0,
///     spread: 1.0,
///     noise_fraction: 0.1,
///     seed: 7,
/// };
/// let points = generate_blobs::<2>(&config)?;
/// assert_eq!(points.len(), 64);
/// # Ok::<(), clue_benches::error::BenchSetupError>(())
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "noise share is a small fraction of a benchmark-sized count"
)]
#[expect(clippy::float_arithmetic, reason = "coordinates are offsets from centres")]
pub fn generate_blobs<const D: usize>(config: &BlobConfig) -> Result<PointSet<D>, BenchSetupError> {
    config.validate()?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let centres = blob_centres::<D>(config, &mut rng);
    let noise = (config.point_count as f32 * config.noise_fraction) as usize;
    let extent = config.separation + config.spread;

    let mut coords = Vec::with_capacity(config.point_count);
    for centre in centres.iter().cycle().take(config.point_count - noise) {
        coords.push(centre.map(|c| c + rng.gen_range(-config.spread..=config.spread)));
    }
    for _ in 0..noise {
        coords.push(std::array::from_fn(|_| rng.gen_range(-extent..=extent)));
    }
    Ok(PointSet::try_new(coords)?)
}
