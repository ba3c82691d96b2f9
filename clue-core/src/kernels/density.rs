use tracing::instrument;

use super::{coords_of, for_each_candidate, squared_distance};
use crate::{Result, exec::Executor, tiles::SpatialIndex};

/// Weighted count of the points within `dc` of point `point`.
///
/// The point itself contributes `1.0`. Every other point within `dc`
/// contributes `0.5`, so the pair's full unit is split across both ends.
///
/// # Errors
/// Returns [`crate::ClueError::PointOutOfRange`] when `point`, or a point
/// filed in `index`, has no entry in `coords`.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use clue_core::{Executor, fill_tiles, point_density};
///
/// let coords = [[0.0_f32, 0.0], [0.5, 0.0], [5.0, 5.0]];
/// let tiles = fill_tiles(Executor::Serial, &coords, NonZeroUsize::MIN, None)?;
/// assert_eq!(point_density(&tiles, &coords, 0, 1.0)?, 1.5);
/// assert_eq!(point_density(&tiles, &coords, 2, 1.0)?, 1.0);
/// # Ok::<(), clue_core::ClueError>(())
/// ```
pub fn point_density<const D: usize, I>(
    index: &I,
    coords: &[[f32; D]],
    point: usize,
    dc: f32,
) -> Result<f32>
where
    I: SpatialIndex<D> + ?Sized,
{
    let centre = coords_of(coords, point)?;
    let dc_squared = dc * dc;
    let mut rho = 0.0_f32;
    for_each_candidate(index, coords, centre, dc, |candidate, position| {
        if candidate == point {
            rho += 1.0;
        } else if squared_distance(centre, position) <= dc_squared {
            rho += 0.5;
        }
    })?;
    Ok(rho)
}

/// Computes [`point_density`] for every point.
///
/// # Errors
/// Returns [`crate::ClueError::PointOutOfRange`] when `index` was built over
/// more points than `coords` holds.
#[instrument(name = "core.local_density", skip_all, fields(points = coords.len(), dc = dc))]
pub fn local_density<const D: usize, I>(
    executor: Executor,
    index: &I,
    coords: &[[f32; D]],
    dc: f32,
) -> Result<Vec<f32>>
where
    I: SpatialIndex<D> + Sync + ?Sized,
{
    executor.try_map(coords.len(), |point| point_density(index, coords, point, dc))
}
