use clue_core::{Clue, ClueBuilder, ExecutionStrategy, PointSet};

/// Builds a pipeline with the given `dc`, `rho_c`, and strategy, leaving the
/// remaining parameters at their defaults.
#[must_use]
pub fn clue(dc: f32, rho_c: f32, strategy: ExecutionStrategy) -> Clue {
    ClueBuilder::new()
        .with_critical_distance(dc)
        .with_density_threshold(rho_c)
        .with_execution_strategy(strategy)
        .build()
        .expect("test parameters are valid")
}

#[must_use]
pub fn points<const D: usize>(coords: Vec<[f32; D]>) -> PointSet<D> {
    PointSet::try_new(coords).expect("test coordinates are valid")
}

/// Strategies available in this build.
#[must_use]
pub fn strategies() -> Vec<ExecutionStrategy> {
    vec![
        ExecutionStrategy::Serial,
        ExecutionStrategy::Auto,
        #[cfg(feature = "parallel")]
        ExecutionStrategy::Parallel,
    ]
}
