use std::num::NonZeroUsize;

use tracing::{Span, field, instrument};

use crate::{
    ClueError, Result,
    bucket::{BucketError, BucketTable},
    exec::Executor,
    tiles::{TileGeometry, Tiles},
};

/// Files every point under the tile holding its coordinates.
///
/// The grid is sized from the bounding box of `coords` so tiles hold about
/// `points_per_tile` points each. Points inside one tile are stored in
/// ascending index order.
///
/// # Errors
/// Returns [`ClueError::TileCapacityExceeded`] when `capacity` is set and a
/// tile receives more points than it allows, and
/// [`ClueError::IndexOverflow`] when `coords` has more than `u32::MAX`
/// points.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use clue_core::{Executor, SpatialIndex, fill_tiles};
///
/// let coords = [[0.0_f32], [0.5], [9.0], [10.0]];
/// let per_tile = NonZeroUsize::new(2).expect("non-zero");
/// let tiles = fill_tiles(Executor::Serial, &coords, per_tile, None)?;
/// assert_eq!(tiles.bin_count(), 2);
/// assert_eq!(tiles.bin_contents(0), &[0, 1]);
/// assert_eq!(tiles.bin_contents(1), &[2, 3]);
/// # Ok::<(), clue_core::ClueError>(())
/// ```
#[instrument(
    name = "core.fill_tiles",
    skip_all,
    fields(points = coords.len(), bins = field::Empty, max_occupancy = field::Empty),
)]
pub fn fill_tiles<const D: usize>(
    executor: Executor,
    coords: &[[f32; D]],
    points_per_tile: NonZeroUsize,
    capacity: Option<NonZeroUsize>,
) -> Result<Tiles<D>> {
    let geometry = TileGeometry::for_points(coords, points_per_tile);
    let bins = BucketTable::build(executor, geometry.bin_count(), coords.len(), capacity, |i| {
        Some(geometry.bin_of(&coords[i]))
    })
    .map_err(|err| match err {
        BucketError::CapacityExceeded {
            key,
            count,
            capacity,
        } => ClueError::TileCapacityExceeded {
            bin: key,
            count,
            capacity,
        },
        BucketError::KeyOutOfRange {
            item,
            key,
            key_count,
        } => ClueError::BinOutOfRange {
            point: item,
            bin: key,
            bins: key_count,
        },
        BucketError::TooManyItems { items } => ClueError::IndexOverflow { points: items },
    })?;

    let tiles = Tiles::from_parts(geometry, bins);
    let span = Span::current();
    span.record("bins", tiles.geometry().bin_count());
    span.record("max_occupancy", tiles.max_occupancy());
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::tiles::SpatialIndex;

    fn per_tile(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("non-zero")
    }

    #[test]
    fn every_point_appears_in_exactly_one_bin() {
        let coords: Vec<[f32; 2]> = (0..57)
            .map(|i| [(i * 7 % 13) as f32, (i * 3 % 11) as f32])
            .collect();
        let tiles = fill_tiles(Executor::Serial, &coords, per_tile(3), None).expect("no capacity");
        let mut filed: Vec<u32> = (0..tiles.bin_count())
            .flat_map(|bin| tiles.bin_contents(bin).to_vec())
            .collect();
        filed.sort_unstable();
        assert_eq!(filed, (0..57).collect::<Vec<u32>>());
        for (i, point) in coords.iter().enumerate() {
            let bin = tiles.bin_of(point);
            assert!(tiles.bin_contents(bin).contains(&(i as u32)));
        }
    }

    #[rstest]
    #[case::fits(3, true)]
    #[case::overflows(2, false)]
    fn capacity_is_enforced(#[case] capacity: usize, #[case] ok: bool) {
        let coords = [[0.0_f32], [0.0], [0.0], [10.0]];
        let result = fill_tiles(
            Executor::Serial,
            &coords,
            per_tile(2),
            NonZeroUsize::new(capacity),
        );
        match result {
            Ok(_) => assert!(ok),
            Err(err) => {
                assert!(!ok, "unexpected failure: {err}");
                assert!(matches!(
                    err,
                    ClueError::TileCapacityExceeded {
                        bin: 0,
                        count: 3,
                        ..
                    }
                ));
            }
        }
    }
}
