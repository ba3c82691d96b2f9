//! Property-based tests comparing the tiled kernels with brute-force
//! oracles.
//!
//! Coordinates are drawn from a coarse lattice so exact density ties and
//! equal distances are common, which is where tiling order and tie-breaking
//! would show up if they leaked into the results.

use std::num::NonZeroUsize;

use proptest::prelude::*;

use super::{fill_tiles, local_density, nearest_higher, squared_distance};
use crate::{exec::Executor, test_utils::suite_proptest_config};

const LATTICE_STEP: f32 = 0.25;

fn lattice_points() -> impl Strategy<Value = Vec<[f32; 2]>> {
    prop::collection::vec((0_i16..40, 0_i16..40), 1..120).prop_map(|cells| {
        cells
            .into_iter()
            .map(|(x, y)| [f32::from(x) * LATTICE_STEP, f32::from(y) * LATTICE_STEP])
            .collect()
    })
}

fn oracle_density(coords: &[[f32; 2]], dc: f32) -> Vec<f32> {
    let dc_squared = dc * dc;
    (0..coords.len())
        .map(|i| {
            (0..coords.len())
                .map(|j| {
                    if i == j {
                        1.0
                    } else if squared_distance(&coords[i], &coords[j]) <= dc_squared {
                        0.5
                    } else {
                        0.0
                    }
                })
                .sum()
        })
        .collect()
}

/// Smallest qualifying squared distance, ignoring which point achieves it.
fn oracle_nearest_squared(coords: &[[f32; 2]], rho: &[f32], dm: f32) -> Vec<Option<f32>> {
    let dm_squared = dm * dm;
    (0..coords.len())
        .map(|i| {
            (0..coords.len())
                .filter(|&j| j != i && (rho[j] > rho[i] || (rho[j] == rho[i] && j > i)))
                .map(|j| squared_distance(&coords[i], &coords[j]))
                .filter(|&d| d <= dm_squared)
                .min_by(f32::total_cmp)
        })
        .collect()
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn tiled_density_matches_oracle(
        coords in lattice_points(),
        dc_steps in 1_u8..8,
        per_tile in 1_usize..16,
    ) {
        let dc = f32::from(dc_steps) * LATTICE_STEP;
        let per_tile = NonZeroUsize::new(per_tile).expect("range starts at one");
        let tiles = fill_tiles(Executor::Serial, &coords, per_tile, None)
            .expect("unbounded tiles accept every point");
        let rho = local_density(Executor::Serial, &tiles, &coords, dc)
            .expect("tiles cover exactly these points");
        prop_assert_eq!(rho, oracle_density(&coords, dc));
    }

    #[test]
    fn pair_contributions_sum_to_whole_units(
        coords in lattice_points(),
        dc_steps in 1_u8..8,
    ) {
        let dc = f32::from(dc_steps) * LATTICE_STEP;
        let tiles = fill_tiles(Executor::Serial, &coords, NonZeroUsize::MIN, None)
            .expect("unbounded tiles accept every point");
        let rho = local_density(Executor::Serial, &tiles, &coords, dc)
            .expect("tiles cover exactly these points");
        let total: f32 = rho.iter().sum();
        let dc_squared = dc * dc;
        let mut pairs = 0_usize;
        for i in 0..coords.len() {
            for j in i + 1..coords.len() {
                if squared_distance(&coords[i], &coords[j]) <= dc_squared {
                    pairs += 1;
                }
            }
        }
        prop_assert_eq!(total, (coords.len() + pairs) as f32);
    }

    #[test]
    fn tiled_nearest_higher_matches_oracle(
        coords in lattice_points(),
        dc_steps in 1_u8..6,
        factor in 1_u8..4,
    ) {
        let dc = f32::from(dc_steps) * LATTICE_STEP;
        let dm = dc * f32::from(factor);
        let tiles = fill_tiles(Executor::Serial, &coords, NonZeroUsize::new(3).expect("non-zero"), None)
            .expect("unbounded tiles accept every point");
        let rho = local_density(Executor::Serial, &tiles, &coords, dc)
            .expect("tiles cover exactly these points");
        let (delta, nearest) = nearest_higher(Executor::Serial, &tiles, &coords, &rho, dm)
            .expect("rho covers every point");
        let expected = oracle_nearest_squared(&coords, &rho, dm);
        for i in 0..coords.len() {
            match (expected[i], nearest[i]) {
                (None, None) => prop_assert!(delta[i].is_infinite()),
                (Some(best), Some(j)) => {
                    let j = j as usize;
                    prop_assert!(rho[j] > rho[i] || (rho[j] == rho[i] && j > i));
                    prop_assert_eq!(squared_distance(&coords[i], &coords[j]), best);
                    prop_assert_eq!(delta[i], best.sqrt());
                }
                (expected, found) => {
                    prop_assert!(false, "point {i}: oracle {expected:?}, tiled {found:?}");
                }
            }
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_kernels_match_serial(coords in lattice_points(), dc_steps in 1_u8..6) {
        let dc = f32::from(dc_steps) * LATTICE_STEP;
        let per_tile = NonZeroUsize::new(4).expect("non-zero");
        let serial_tiles = fill_tiles(Executor::Serial, &coords, per_tile, None)
            .expect("unbounded tiles accept every point");
        let parallel_tiles = fill_tiles(Executor::Parallel, &coords, per_tile, None)
            .expect("unbounded tiles accept every point");
        let serial_rho = local_density(Executor::Serial, &serial_tiles, &coords, dc)
            .expect("tiles cover exactly these points");
        let parallel_rho = local_density(Executor::Parallel, &parallel_tiles, &coords, dc)
            .expect("tiles cover exactly these points");
        prop_assert_eq!(&serial_rho, &parallel_rho);
        prop_assert_eq!(
            nearest_higher(Executor::Serial, &serial_tiles, &coords, &serial_rho, 2.0 * dc),
            nearest_higher(Executor::Parallel, &parallel_tiles, &coords, &parallel_rho, 2.0 * dc)
        );
    }
}
