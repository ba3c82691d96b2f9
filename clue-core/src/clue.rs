//! Pipeline orchestration for the CLUE library.
//!
//! Provides the [`Clue`] runtime entry point, which sequences the five phases
//! over a [`PointSet`] and writes their results back into it.

#[cfg(feature = "metrics")]
use std::time::Instant;

use tracing::{Span, field, info, instrument, warn};

use crate::{
    Result,
    builder::{ClueParams, ExecutionStrategy},
    exec::Executor,
    kernels::{
        Thresholds, assign_clusters, fill_tiles, find_clusters, local_density, nearest_higher,
    },
    points::{Annotations, PointRole, PointSet},
    result::ClusteringResult,
};

/// Entry point for running the clustering pipeline.
///
/// # Examples
/// ```
/// use clue_core::{ClueBuilder, PointSet};
///
/// let clue = ClueBuilder::new()
///     .with_critical_distance(1.0)
///     .with_density_threshold(2.0)
///     .build()?;
/// let mut points = PointSet::<2>::try_new(vec![
///     [0.0, 0.0], [0.2, 0.1], [0.1, 0.3],
///     [8.0, 8.0], [8.3, 8.1], [8.1, 7.8],
///     [30.0, -4.0],
/// ])?;
/// let result = clue.run(&mut points)?;
/// assert_eq!(result.cluster_count(), 2);
/// assert_eq!(result.outlier_count(), 1);
/// assert_eq!(points.cluster_index()[6], None);
/// # Ok::<(), clue_core::ClueError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Clue {
    params: ClueParams,
    execution_strategy: ExecutionStrategy,
}

impl Clue {
    pub(crate) fn new(params: ClueParams, execution_strategy: ExecutionStrategy) -> Self {
        Self {
            params,
            execution_strategy,
        }
    }

    /// Returns the validated parameters of this instance.
    #[must_use]
    pub fn params(&self) -> &ClueParams {
        &self.params
    }

    /// Returns the execution strategy that will be used when running.
    ///
    /// # Examples
    /// ```
    /// use clue_core::{ClueBuilder, ExecutionStrategy};
    ///
    /// let clue = ClueBuilder::new()
    ///     .with_execution_strategy(ExecutionStrategy::Serial)
    ///     .build()
    ///     .expect("builder must apply execution strategy");
    /// assert_eq!(clue.execution_strategy(), ExecutionStrategy::Serial);
    /// ```
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Runs every phase over `points` and annotates them in place.
    ///
    /// On success the density, delta, nearest-higher, seed, and cluster
    /// fields of `points` are populated. On failure they are all reset, so a
    /// partially annotated point set is never observable.
    ///
    /// # Errors
    /// Returns [`crate::ClueError::BackendUnavailable`] when the requested
    /// strategy is not compiled in, [`crate::ClueError::TileCapacityExceeded`]
    /// when a tile overflows its fixed capacity, and
    /// [`crate::ClueError::StackCapacityExceeded`] when a follower chain is
    /// deeper than `local_stack_size_per_seed`.
    #[instrument(
        name = "core.run",
        err,
        skip_all,
        fields(
            points = points.len(),
            dimensions = D,
            dc = self.params.critical_distance(),
            rho_c = self.params.density_threshold(),
            strategy = ?self.execution_strategy,
            clusters = field::Empty,
            outliers = field::Empty,
        ),
    )]
    pub fn run<const D: usize>(&self, points: &mut PointSet<D>) -> Result<ClusteringResult> {
        #[cfg(feature = "metrics")]
        let started = Instant::now();

        points.clear_annotations();
        let outcome = self.run_phases(points);

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("clue_runs_total").increment(1);
            metrics::histogram!("clue_run_seconds").record(started.elapsed().as_secs_f64());
        }

        match outcome {
            Ok(result) => {
                let span = Span::current();
                span.record("clusters", result.cluster_count());
                span.record("outliers", result.outlier_count());
                info!(
                    clusters = result.cluster_count(),
                    outliers = result.outlier_count(),
                    "clustering completed"
                );
                #[cfg(feature = "metrics")]
                {
                    metrics::counter!("clue_seeds_total").increment(result.cluster_count() as u64);
                    metrics::counter!("clue_outliers_total")
                        .increment(result.outlier_count() as u64);
                }
                Ok(result)
            }
            Err(err) => {
                points.clear_annotations();
                warn!(code = %err.code(), "clustering aborted, annotations cleared");
                Err(err)
            }
        }
    }

    fn run_phases<const D: usize>(&self, points: &mut PointSet<D>) -> Result<ClusteringResult> {
        let executor = Executor::resolve(self.execution_strategy)?;
        let params = &self.params;
        let coords = points.coordinates();

        let tiles = fill_tiles(
            executor,
            coords,
            params.points_per_tile(),
            params.tile_capacity(),
        )?;
        let rho = local_density(executor, &tiles, coords, params.critical_distance())?;
        let (delta, nearest) =
            nearest_higher(executor, &tiles, coords, &rho, params.search_radius())?;
        let classification = find_clusters(
            executor,
            &rho,
            &delta,
            &nearest,
            Thresholds::from_params(params),
        )?;
        let labels = assign_clusters(executor, &classification, params.stack_size_per_seed())?;

        let is_seed = classification
            .roles()
            .iter()
            .map(|&role| role == PointRole::Seed)
            .collect();
        let result = ClusteringResult::new(labels.clone(), classification.seeds().to_vec());
        points.annotate(Annotations {
            rho,
            delta,
            nearest_higher: nearest,
            is_seed,
            cluster_index: labels,
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{ClueBuilder, ClueError, test_utils::line};

    #[rstest]
    fn run_annotates_every_point() {
        let clue = ClueBuilder::new()
            .with_critical_distance(1.5)
            .build()
            .expect("valid parameters");
        let mut points = line(6);
        let result = clue.run(&mut points).expect("run must succeed");
        assert!(points.is_annotated());
        assert_eq!(result.cluster_count(), 1);
        assert_eq!(result.seeds(), &[4]);
        assert_eq!(points.rho(), &[1.5, 2.0, 2.0, 2.0, 2.0, 1.5]);
        assert!(points.delta()[4].is_infinite());
        assert_eq!(points.nearest_higher()[5], Some(4));
    }

    #[test]
    fn failed_run_leaves_no_annotations() {
        let clue = ClueBuilder::new()
            .with_critical_distance(1.5)
            .with_local_stack_size_per_seed(2)
            .build()
            .expect("valid parameters");
        let mut points = line(8);
        let err = clue.run(&mut points).expect_err("chain is deeper than two");
        assert!(matches!(err, ClueError::StackCapacityExceeded { seed: 6, .. }));
        assert!(!points.is_annotated());
        assert!(points.rho().iter().all(|&rho| rho == 0.0));
        assert!(points.cluster_index().iter().all(Option::is_none));
    }

    #[test]
    fn rerun_replaces_previous_annotations() {
        let mut points = line(5);
        let loose = ClueBuilder::new()
            .with_critical_distance(1.5)
            .build()
            .expect("valid parameters");
        loose.run(&mut points).expect("run must succeed");
        let tight = ClueBuilder::new()
            .with_critical_distance(0.5)
            .with_density_threshold(1.0)
            .build()
            .expect("valid parameters");
        let result = tight.run(&mut points).expect("run must succeed");
        assert_eq!(result.cluster_count(), 5);
        assert!(points.is_seed().iter().all(|&seed| seed));
    }
}
