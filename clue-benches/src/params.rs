//! Benchmark parameter types.

use std::fmt;

use clue_core::ExecutionStrategy;

/// Parameters for one pipeline benchmark case.
#[derive(Clone, Debug)]
pub struct PipelineBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Average number of points per tile.
    pub points_per_tile: usize,
    /// Backend the phases run on.
    pub strategy: ExecutionStrategy,
}

impl fmt::Display for PipelineBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},ppt={},{:?}",
            self.point_count, self.points_per_tile, self.strategy
        )
    }
}

/// Parameters for a single-phase benchmark case.
#[derive(Clone, Debug)]
pub struct PhaseBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Critical distance.
    pub critical_distance: f32,
}

impl fmt::Display for PhaseBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},dc={}", self.point_count, self.critical_distance)
    }
}
