//! Builder utilities for configuring CLUE runs.
//!
//! Exposes the execution strategy selection surface and the parameter
//! validation performed before constructing [`Clue`] instances.

use std::num::NonZeroUsize;

use crate::{Result, clue::Clue, error::ClueError};

const DEFAULT_CRITICAL_DISTANCE: f32 = 1.0;
const DEFAULT_DENSITY_THRESHOLD: f32 = 1.0;
const DEFAULT_OUTLIER_DELTA_FACTOR: f32 = 2.0;
const DEFAULT_STACK_SIZE: usize = 256;
const DEFAULT_POINTS_PER_TILE: usize = 10;

/// Indicates how [`Clue`] distributes per-point work when [`Clue::run`] is
/// invoked.
///
/// `Auto` resolves deterministically: it selects the Rayon pool when the
/// `parallel` feature is compiled in and falls back to serial iteration
/// otherwise. Both backends produce identical output.
///
/// # Examples
/// ```
/// use clue_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Auto;
/// assert!(matches!(strategy, ExecutionStrategy::Auto));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Allow the library to select an appropriate backend automatically.
    #[default]
    Auto,
    /// Visit every work-item on the calling thread.
    Serial,
    /// Distribute work-items across the Rayon thread pool.
    Parallel,
}

/// Validated numeric parameters consumed by the pipeline phases.
///
/// # Examples
/// ```
/// use clue_core::ClueBuilder;
///
/// let clue = ClueBuilder::new().with_critical_distance(2.0).build()?;
/// assert_eq!(clue.params().critical_distance(), 2.0);
/// assert_eq!(clue.params().search_radius(), 4.0);
/// # Ok::<(), clue_core::ClueError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClueParams {
    critical_distance: f32,
    density_threshold: f32,
    outlier_delta_factor: f32,
    stack_size_per_seed: NonZeroUsize,
    points_per_tile: NonZeroUsize,
    tile_capacity: Option<NonZeroUsize>,
}

impl ClueParams {
    /// Returns `dc`, the density bandwidth.
    #[must_use]
    #[rustfmt::skip]
    pub fn critical_distance(&self) -> f32 { self.critical_distance }

    /// Returns `rho_c`, the minimum density of a seed.
    #[must_use]
    #[rustfmt::skip]
    pub fn density_threshold(&self) -> f32 { self.density_threshold }

    /// Returns the multiplier applied to `dc` for the nearest-higher search
    /// radius and the outlier threshold.
    #[must_use]
    #[rustfmt::skip]
    pub fn outlier_delta_factor(&self) -> f32 { self.outlier_delta_factor }

    /// Returns `dm = outlier_delta_factor * dc`.
    #[must_use]
    pub fn search_radius(&self) -> f32 {
        self.outlier_delta_factor * self.critical_distance
    }

    /// Returns the deepest follower chain a single seed may own.
    #[must_use]
    #[rustfmt::skip]
    pub fn stack_size_per_seed(&self) -> NonZeroUsize { self.stack_size_per_seed }

    /// Returns the target tile occupancy used to size the tile grid.
    #[must_use]
    #[rustfmt::skip]
    pub fn points_per_tile(&self) -> NonZeroUsize { self.points_per_tile }

    /// Returns the fixed per-tile capacity, if one is configured.
    #[must_use]
    #[rustfmt::skip]
    pub fn tile_capacity(&self) -> Option<NonZeroUsize> { self.tile_capacity }
}

/// Configures and constructs [`Clue`] instances.
///
/// # Examples
/// ```
/// use clue_core::{ClueBuilder, ExecutionStrategy};
///
/// let clue = ClueBuilder::new()
///     .with_critical_distance(0.5)
///     .with_density_threshold(3.0)
///     .with_execution_strategy(ExecutionStrategy::Serial)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(clue.params().density_threshold(), 3.0);
/// assert_eq!(clue.execution_strategy(), ExecutionStrategy::Serial);
/// ```
#[derive(Debug, Clone)]
pub struct ClueBuilder {
    critical_distance: f32,
    density_threshold: f32,
    outlier_delta_factor: f32,
    stack_size_per_seed: usize,
    points_per_tile: usize,
    tile_capacity: Option<usize>,
    execution_strategy: ExecutionStrategy,
}

impl Default for ClueBuilder {
    fn default() -> Self {
        Self {
            critical_distance: DEFAULT_CRITICAL_DISTANCE,
            density_threshold: DEFAULT_DENSITY_THRESHOLD,
            outlier_delta_factor: DEFAULT_OUTLIER_DELTA_FACTOR,
            stack_size_per_seed: DEFAULT_STACK_SIZE,
            points_per_tile: DEFAULT_POINTS_PER_TILE,
            tile_capacity: None,
            execution_strategy: ExecutionStrategy::Auto,
        }
    }
}

impl ClueBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use clue_core::{ClueBuilder, ExecutionStrategy};
    ///
    /// let builder = ClueBuilder::new();
    /// assert_eq!(builder.critical_distance(), 1.0);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the critical distance `dc`.
    #[must_use]
    pub fn with_critical_distance(mut self, dc: f32) -> Self {
        self.critical_distance = dc;
        self
    }

    /// Returns the configured critical distance.
    #[must_use]
    pub fn critical_distance(&self) -> f32 {
        self.critical_distance
    }

    /// Overrides the seed density threshold `rho_c`.
    #[must_use]
    pub fn with_density_threshold(mut self, rho_c: f32) -> Self {
        self.density_threshold = rho_c;
        self
    }

    /// Returns the configured density threshold.
    #[must_use]
    pub fn density_threshold(&self) -> f32 {
        self.density_threshold
    }

    /// Overrides the outlier delta factor.
    #[must_use]
    pub fn with_outlier_delta_factor(mut self, factor: f32) -> Self {
        self.outlier_delta_factor = factor;
        self
    }

    /// Returns the configured outlier delta factor.
    #[must_use]
    pub fn outlier_delta_factor(&self) -> f32 {
        self.outlier_delta_factor
    }

    /// Overrides the per-seed traversal stack capacity.
    ///
    /// # Examples
    /// ```
    /// use clue_core::ClueBuilder;
    ///
    /// let builder = ClueBuilder::new().with_local_stack_size_per_seed(32);
    /// assert_eq!(builder.local_stack_size_per_seed(), 32);
    /// ```
    #[must_use]
    pub fn with_local_stack_size_per_seed(mut self, size: usize) -> Self {
        self.stack_size_per_seed = size;
        self
    }

    /// Returns the configured per-seed traversal stack capacity.
    #[must_use]
    pub fn local_stack_size_per_seed(&self) -> usize {
        self.stack_size_per_seed
    }

    /// Overrides the target number of points per tile.
    #[must_use]
    pub fn with_points_per_tile(mut self, points: usize) -> Self {
        self.points_per_tile = points;
        self
    }

    /// Returns the configured target number of points per tile.
    #[must_use]
    pub fn points_per_tile(&self) -> usize {
        self.points_per_tile
    }

    /// Sets a fixed per-tile capacity. `None` leaves tiles unbounded.
    #[must_use]
    pub fn with_tile_capacity(mut self, capacity: Option<usize>) -> Self {
        self.tile_capacity = capacity;
        self
    }

    /// Returns the configured per-tile capacity.
    #[must_use]
    pub fn tile_capacity(&self) -> Option<usize> {
        self.tile_capacity
    }

    /// Sets the execution strategy to use when running the pipeline.
    ///
    /// # Examples
    /// ```
    /// use clue_core::{ClueBuilder, ExecutionStrategy};
    ///
    /// let builder = ClueBuilder::new().with_execution_strategy(ExecutionStrategy::Serial);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Serial);
    /// ```
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the currently configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Validates the configuration and constructs a [`Clue`] instance.
    ///
    /// # Errors
    /// Returns the matching `Invalid*` variant of [`ClueError`] when a
    /// distance, threshold, or factor is non-positive or non-finite, or when
    /// a capacity is zero.
    ///
    /// # Examples
    /// ```
    /// use clue_core::{ClueBuilder, ClueError};
    ///
    /// let err = ClueBuilder::new().with_critical_distance(0.0).build().unwrap_err();
    /// assert!(matches!(err, ClueError::InvalidCriticalDistance { .. }));
    /// ```
    pub fn build(self) -> Result<Clue> {
        let critical_distance = positive_finite(self.critical_distance)
            .ok_or(ClueError::InvalidCriticalDistance {
                got: self.critical_distance,
            })?;
        let density_threshold = positive_finite(self.density_threshold)
            .ok_or(ClueError::InvalidDensityThreshold {
                got: self.density_threshold,
            })?;
        let outlier_delta_factor = positive_finite(self.outlier_delta_factor)
            .ok_or(ClueError::InvalidOutlierDeltaFactor {
                got: self.outlier_delta_factor,
            })?;
        if !(outlier_delta_factor * critical_distance).is_finite() {
            return Err(ClueError::InvalidOutlierDeltaFactor {
                got: outlier_delta_factor,
            });
        }
        let stack_size_per_seed =
            NonZeroUsize::new(self.stack_size_per_seed).ok_or(ClueError::InvalidStackSize {
                got: self.stack_size_per_seed,
            })?;
        let points_per_tile =
            NonZeroUsize::new(self.points_per_tile).ok_or(ClueError::InvalidPointsPerTile {
                got: self.points_per_tile,
            })?;
        let tile_capacity = self
            .tile_capacity
            .map(|capacity| {
                NonZeroUsize::new(capacity).ok_or(ClueError::InvalidTileCapacity { got: capacity })
            })
            .transpose()?;

        let params = ClueParams {
            critical_distance,
            density_threshold,
            outlier_delta_factor,
            stack_size_per_seed,
            points_per_tile,
            tile_capacity,
        };
        Ok(Clue::new(params, self.execution_strategy))
    }
}

fn positive_finite(value: f32) -> Option<f32> {
    (value.is_finite() && value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-1.0)]
    #[case::nan(f32::NAN)]
    #[case::infinite(f32::INFINITY)]
    fn rejects_invalid_critical_distance(#[case] dc: f32) {
        let err = ClueBuilder::new()
            .with_critical_distance(dc)
            .build()
            .expect_err("invalid dc must be rejected");
        assert_eq!(err.code(), crate::ClueErrorCode::InvalidCriticalDistance);
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-0.5)]
    fn rejects_invalid_density_threshold(#[case] rho_c: f32) {
        let err = ClueBuilder::new()
            .with_density_threshold(rho_c)
            .build()
            .expect_err("invalid rho_c must be rejected");
        assert!(matches!(err, ClueError::InvalidDensityThreshold { .. }));
    }

    #[test]
    fn rejects_search_radius_overflow() {
        let err = ClueBuilder::new()
            .with_critical_distance(f32::MAX)
            .with_outlier_delta_factor(4.0)
            .build()
            .expect_err("overflowing dm must be rejected");
        assert!(matches!(err, ClueError::InvalidOutlierDeltaFactor { .. }));
    }

    #[rstest]
    fn rejects_zero_capacities() {
        let stack = ClueBuilder::new()
            .with_local_stack_size_per_seed(0)
            .build()
            .expect_err("zero stack must fail");
        assert!(matches!(stack, ClueError::InvalidStackSize { got: 0 }));

        let tile = ClueBuilder::new()
            .with_tile_capacity(Some(0))
            .build()
            .expect_err("zero tile capacity must fail");
        assert!(matches!(tile, ClueError::InvalidTileCapacity { got: 0 }));

        let per_tile = ClueBuilder::new()
            .with_points_per_tile(0)
            .build()
            .expect_err("zero points per tile must fail");
        assert!(matches!(per_tile, ClueError::InvalidPointsPerTile { got: 0 }));
    }

    #[test]
    fn build_carries_parameters() {
        let clue = ClueBuilder::new()
            .with_critical_distance(1.5)
            .with_density_threshold(2.0)
            .with_outlier_delta_factor(3.0)
            .with_local_stack_size_per_seed(8)
            .with_points_per_tile(4)
            .with_tile_capacity(Some(64))
            .build()
            .expect("parameters are valid");
        let params = clue.params();
        assert_eq!(params.critical_distance(), 1.5);
        assert_eq!(params.density_threshold(), 2.0);
        assert_eq!(params.search_radius(), 4.5);
        assert_eq!(params.stack_size_per_seed().get(), 8);
        assert_eq!(params.points_per_tile().get(), 4);
        assert_eq!(params.tile_capacity().map(NonZeroUsize::get), Some(64));
    }
}
