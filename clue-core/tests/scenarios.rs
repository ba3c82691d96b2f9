//! End-to-end clustering scenarios.

mod common;

use std::collections::BTreeSet;

use clue_core::{ClueBuilder, ClueError, ClusterId, ExecutionStrategy, PointRole, PointSet};
use clue_test_support::datasets::{BlobSpec, blobs, chain};
use common::{clue, points, strategies};
use rstest::rstest;

/// `n` points within `radius` of the origin plus one far-away point.
fn tight_cluster_with_outlier(n: usize, radius: f32) -> Vec<[f32; 2]> {
    let mut coords: Vec<[f32; 2]> = (0..n)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / n as f32;
            let r = radius * ((i % 3) as f32 + 1.0) / 3.0;
            [r * angle.cos(), r * angle.sin()]
        })
        .collect();
    coords.push([50.0, 50.0]);
    coords
}

#[rstest]
fn single_tight_cluster_with_outlier(#[values(5, 12, 40)] n: usize) {
    for strategy in strategies() {
        let clue = clue(1.0, 2.0, strategy);
        let mut points = points(tight_cluster_with_outlier(n, 0.45));
        let result = clue.run(&mut points).expect("run must succeed");

        assert_eq!(result.cluster_count(), 1);
        assert_eq!(result.cluster_sizes(), vec![n]);
        assert!(points.cluster_index()[..n]
            .iter()
            .all(|&label| label == Some(ClusterId::new(0))));
        assert_eq!(points.cluster_index()[n], None);
        assert!(!points.is_seed()[n]);
        assert_eq!(points.role(n), Some(PointRole::Outlier));
    }
}

#[rstest]
fn two_separated_clusters(#[values(1, 7, 42)] seed: u64) {
    let spec = BlobSpec {
        centres: vec![[0.0, 0.0, 0.0], [40.0, -40.0, 10.0]],
        points_per_blob: 30,
        half_width: 0.25,
    };
    for strategy in strategies() {
        let clue = clue(1.0, 3.0, strategy);
        let mut points = points(blobs(&spec, seed));
        let result = clue.run(&mut points).expect("run must succeed");

        let labels = points.cluster_index();
        let first: BTreeSet<_> = labels[..30].iter().flatten().collect();
        let second: BTreeSet<_> = labels[30..].iter().flatten().collect();
        assert_eq!(first.len(), 1, "first blob must form one cluster");
        assert_eq!(second.len(), 1, "second blob must form one cluster");
        assert!(first.is_disjoint(&second));
        assert_eq!(result.cluster_count(), 2);
        assert_eq!(result.outlier_count(), 0);

        for (i, higher) in points.nearest_higher().iter().enumerate() {
            if let Some(higher) = higher {
                assert_eq!(i < 30, (*higher as usize) < 30, "point {i} crosses blobs");
            }
        }
    }
}

#[rstest]
#[case::too_shallow(10, 4, false)]
#[case::one_short(10, 7, false)]
#[case::exact(10, 8, true)]
#[case::roomy(10, 10, true)]
fn follower_chain_against_stack_capacity(
    #[case] n: usize,
    #[case] capacity: usize,
    #[case] ok: bool,
) {
    for strategy in strategies() {
        let clue = ClueBuilder::new()
            .with_critical_distance(1.5)
            .with_density_threshold(1.0)
            .with_outlier_delta_factor(2.0)
            .with_local_stack_size_per_seed(capacity)
            .with_execution_strategy(strategy)
            .build()
            .expect("valid parameters");
        let mut points = points(chain::<1>(n, 1.0));
        match clue.run(&mut points) {
            Ok(result) => {
                assert!(ok, "capacity {capacity} should overflow");
                assert_eq!(result.seeds(), &[(n - 2) as u32]);
                assert_eq!(result.cluster_sizes(), vec![n]);
            }
            Err(err) => {
                assert!(!ok, "capacity {capacity} should fit: {err}");
                assert!(matches!(
                    err,
                    ClueError::StackCapacityExceeded { seed, .. } if seed as usize == n - 2
                ));
                assert!(!points.is_annotated());
                assert!(points.cluster_index().iter().all(Option::is_none));
            }
        }
    }
}

#[rstest]
fn repeated_runs_are_identical() {
    let spec = BlobSpec {
        centres: vec![[0.0, 0.0], [3.0, 0.0], [0.0, 3.0], [9.0, 9.0]],
        points_per_blob: 50,
        half_width: 1.2,
    };
    let coords = blobs(&spec, 99);
    let mut baseline: Option<PointSet<2>> = None;
    for strategy in strategies() {
        for _ in 0..3 {
            let clue = clue(0.6, 3.0, strategy);
            let mut points = points(coords.clone());
            clue.run(&mut points).expect("run must succeed");
            match &baseline {
                Some(expected) => assert_eq!(&points, expected, "{strategy:?} diverged"),
                None => baseline = Some(points),
            }
        }
    }
}

#[rstest]
fn duplicate_points_break_ties_by_index() {
    let clue = clue(1.0, 1.0, ExecutionStrategy::Serial);
    let mut points = points(vec![[2.0, 2.0]; 4]);
    let result = clue.run(&mut points).expect("run must succeed");
    assert_eq!(result.seeds(), &[3]);
    assert_eq!(points.nearest_higher(), &[Some(1), Some(2), Some(3), None]);
    assert_eq!(points.delta()[..3], [0.0, 0.0, 0.0]);
}
