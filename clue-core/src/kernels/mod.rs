//! The five pipeline phases.
//!
//! Each phase is a per-index kernel plus a driver that launches it over
//! `0..n` on an [`crate::Executor`]. Phases only communicate through the
//! values their drivers return, so the caller sequences them and the return
//! of each driver acts as the barrier before the next.
//!
//! The drivers check that the arrays they are handed agree in length and
//! that the spatial index only refers to points they were given, so a
//! mismatched call fails with an error instead of indexing out of bounds.

mod assign;
mod classify;
mod density;
mod fill;
mod nearest;
#[cfg(test)]
mod property;

pub use assign::{assign_clusters, propagate_from_seed};
pub use classify::{Classification, Thresholds, find_clusters};
pub use density::{local_density, point_density};
pub use fill::fill_tiles;
pub use nearest::{NearestHigher, nearest_higher, nearest_higher_of};

use crate::{
    ClueError, Result,
    tiles::{SearchBox, SpatialIndex},
};

pub(crate) fn squared_distance<const D: usize>(a: &[f32; D], b: &[f32; D]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

pub(crate) fn search_box<const D: usize>(centre: &[f32; D], radius: f32) -> SearchBox<D> {
    centre.map(|coordinate| [coordinate - radius, coordinate + radius])
}

/// Fails with [`ClueError::LengthMismatch`] unless `actual == expected`.
pub(crate) fn ensure_len(array: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(ClueError::LengthMismatch {
            array,
            expected,
            actual,
        })
    }
}

pub(crate) fn coords_of<const D: usize>(coords: &[[f32; D]], point: usize) -> Result<&[f32; D]> {
    coords.get(point).ok_or(ClueError::PointOutOfRange {
        point,
        points: coords.len(),
    })
}

/// Calls `visit` with the index and coordinates of every point filed in a
/// bin overlapping the box of half width `radius` around `centre`. Bins are
/// walked in odometer order and each bin's contents in ascending index order.
///
/// Fails with [`ClueError::PointOutOfRange`] when the index holds a point
/// that `coords` does not.
pub(crate) fn for_each_candidate<const D: usize, I, F>(
    index: &I,
    coords: &[[f32; D]],
    centre: &[f32; D],
    radius: f32,
    mut visit: F,
) -> Result<()>
where
    I: SpatialIndex<D> + ?Sized,
    F: FnMut(usize, &[f32; D]),
{
    let range = index.bin_range_for_box(&search_box(centre, radius));
    for bin in &range {
        for &candidate in index.bin_contents(index.bin_at(&bin)) {
            let candidate = candidate as usize;
            visit(candidate, coords_of(coords, candidate)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_sums_per_axis() {
        assert_eq!(squared_distance(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_distance(&[1.5], &[1.5]), 0.0);
    }

    #[test]
    fn search_box_is_symmetric() {
        assert_eq!(
            search_box(&[1.0, -2.0], 0.5),
            [[0.5, 1.5], [-2.5, -1.5]]
        );
    }

    #[test]
    fn mismatched_lengths_are_named() {
        assert_eq!(ensure_len("rho", 3, 3), Ok(()));
        assert_eq!(
            ensure_len("delta", 3, 1),
            Err(ClueError::LengthMismatch {
                array: "delta",
                expected: 3,
                actual: 1,
            })
        );
    }

    #[test]
    fn missing_point_is_out_of_range() {
        let coords = [[0.0_f32], [1.0]];
        assert_eq!(coords_of(&coords, 1), Ok(&[1.0]));
        assert_eq!(
            coords_of(&coords, 2),
            Err(ClueError::PointOutOfRange { point: 2, points: 2 })
        );
    }
}
