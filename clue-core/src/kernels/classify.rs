use tracing::{Span, field, instrument, warn};

use super::ensure_len;
use crate::{
    ClueError, Result,
    bucket::{BucketError, BucketTable},
    builder::ClueParams,
    exec::Executor,
    points::PointRole,
};

/// Seed and outlier thresholds derived from the run parameters.
///
/// # Examples
/// ```
/// use clue_core::{PointRole, Thresholds};
///
/// let thresholds = Thresholds::new(1.0, 2.0, 2.0);
/// assert_eq!(thresholds.classify(3.0, f32::INFINITY), PointRole::Seed);
/// assert_eq!(thresholds.classify(1.0, 2.5), PointRole::Outlier);
/// assert_eq!(thresholds.classify(1.0, 1.5), PointRole::Follower);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    critical_distance: f32,
    density_threshold: f32,
    outlier_distance: f32,
}

impl Thresholds {
    /// Builds thresholds from `dc`, `rho_c`, and the outlier delta factor.
    #[must_use]
    pub fn new(critical_distance: f32, density_threshold: f32, outlier_delta_factor: f32) -> Self {
        Self {
            critical_distance,
            density_threshold,
            outlier_distance: outlier_delta_factor * critical_distance,
        }
    }

    /// Builds thresholds from validated parameters.
    #[must_use]
    pub fn from_params(params: &ClueParams) -> Self {
        Self::new(
            params.critical_distance(),
            params.density_threshold(),
            params.outlier_delta_factor(),
        )
    }

    /// Classifies a point from its density and delta.
    ///
    /// The seed test requires `rho >= rho_c` and the outlier test requires
    /// `rho < rho_c`, so at most one of them holds. Anything else follows.
    #[must_use]
    pub fn classify(&self, rho: f32, delta: f32) -> PointRole {
        if delta > self.critical_distance && rho >= self.density_threshold {
            PointRole::Seed
        } else if delta > self.outlier_distance && rho < self.density_threshold {
            PointRole::Outlier
        } else {
            PointRole::Follower
        }
    }
}

/// Output of the classification phase.
#[derive(Clone, Debug)]
pub struct Classification {
    roles: Vec<PointRole>,
    seeds: Vec<u32>,
    followers: BucketTable,
}

impl Classification {
    /// Per-point roles.
    #[must_use]
    #[rustfmt::skip]
    pub fn roles(&self) -> &[PointRole] { &self.roles }

    /// Seed points in ascending index order. A seed's position here is its
    /// cluster id.
    #[must_use]
    #[rustfmt::skip]
    pub fn seeds(&self) -> &[u32] { &self.seeds }

    /// Points that chose `point` as their nearest-higher neighbour.
    #[must_use]
    pub fn followers_of(&self, point: u32) -> &[u32] {
        self.followers.get(point as usize)
    }

    /// Number of points classified as followers.
    #[must_use]
    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }

    /// Number of points that pass the outlier test.
    ///
    /// Followers whose chain of nearest-higher links ends at an outlier are
    /// not counted here, although they end up without a cluster. See
    /// [`crate::ClusteringResult::outlier_count`] for the count of unlabelled
    /// points after propagation.
    #[must_use]
    pub fn outlier_count(&self) -> usize {
        self.roles
            .iter()
            .filter(|&&role| role == PointRole::Outlier)
            .count()
    }
}

/// Classifies every point and links each follower under its nearest-higher
/// neighbour.
///
/// # Errors
/// Returns [`ClueError::LengthMismatch`] when `delta` or `nearest_higher`
/// differs in length from `rho`, and [`ClueError::PointOutOfRange`] when a
/// follower links to a point outside the set.
///
/// Returns [`ClueError::MissingNearestHigher`] for the lowest-index point
/// that classifies as a follower but has no nearest-higher neighbour. With
/// `delta` and `nearest_higher` taken from [`crate::nearest_higher`] this
/// cannot happen, since a missing neighbour means an infinite `delta`.
///
/// # Examples
/// ```
/// use clue_core::{Executor, Thresholds, find_clusters};
///
/// let rho = [1.5, 1.5, 1.0];
/// let delta = [0.1, f32::INFINITY, f32::INFINITY];
/// let nearest = [Some(1), None, None];
/// let classification =
///     find_clusters(Executor::Serial, &rho, &delta, &nearest, Thresholds::new(1.0, 1.5, 2.0))?;
/// assert_eq!(classification.seeds(), &[1]);
/// assert_eq!(classification.followers_of(1), &[0]);
/// assert_eq!(classification.outlier_count(), 1);
/// # Ok::<(), clue_core::ClueError>(())
/// ```
#[instrument(
    name = "core.find_clusters",
    skip_all,
    fields(points = rho.len(), seeds = field::Empty, followers = field::Empty),
)]
pub fn find_clusters(
    executor: Executor,
    rho: &[f32],
    delta: &[f32],
    nearest_higher: &[Option<u32>],
    thresholds: Thresholds,
) -> Result<Classification> {
    let n = rho.len();
    ensure_len("delta", n, delta.len())?;
    ensure_len("nearest_higher", n, nearest_higher.len())?;
    let roles = executor.try_map(n, |i| match (rho.get(i), delta.get(i)) {
        (Some(&rho), Some(&delta)) => Ok(thresholds.classify(rho, delta)),
        _ => Err(ClueError::PointOutOfRange { point: i, points: n }),
    })?;

    if let Some(point) = roles
        .iter()
        .zip(nearest_higher)
        .position(|(&role, higher)| role == PointRole::Follower && higher.is_none())
    {
        warn!(point, "follower has no nearest-higher neighbour within the search radius");
        return Err(ClueError::MissingNearestHigher {
            // `n` was bounded by `u32::MAX` when the point set was built.
            point: point as u32,
        });
    }

    let seeds: Vec<u32> = roles
        .iter()
        .enumerate()
        .filter(|&(_, &role)| role == PointRole::Seed)
        .map(|(i, _)| i as u32)
        .collect();

    let followers = BucketTable::build(executor, n, n, None, |i| {
        match (roles.get(i), nearest_higher.get(i)) {
            (Some(PointRole::Follower), Some(&Some(higher))) => Some(higher as usize),
            _ => None,
        }
    })
    .map_err(|err| match err {
        BucketError::KeyOutOfRange { key, key_count, .. } => ClueError::PointOutOfRange {
            point: key,
            points: key_count,
        },
        BucketError::TooManyItems { items } => ClueError::IndexOverflow { points: items },
        BucketError::CapacityExceeded { .. } => ClueError::IndexOverflow { points: n },
    })?;

    let span = Span::current();
    span.record("seeds", seeds.len());
    span.record("followers", followers.len());
    Ok(Classification {
        roles,
        seeds,
        followers,
    })
}
