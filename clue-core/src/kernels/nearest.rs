use tracing::instrument;

use super::{coords_of, ensure_len, for_each_candidate, squared_distance};
use crate::{ClueError, Result, exec::Executor, tiles::SpatialIndex};

/// Closest point of higher density found for one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestHigher {
    /// Distance to `neighbour`, or `f32::INFINITY` when there is none.
    pub delta: f32,
    /// The closest higher point within the search radius.
    pub neighbour: Option<u32>,
}

impl NearestHigher {
    /// Result for a point with no higher neighbour in range.
    pub const NONE: Self = Self {
        delta: f32::INFINITY,
        neighbour: None,
    };
}

/// `j` outranks `i` when it is denser, or equally dense with a larger index.
#[inline]
fn outranks(rho_j: f32, j: usize, rho_i: f32, i: usize) -> bool {
    rho_j > rho_i || (rho_j == rho_i && j > i)
}

fn density_of(rho: &[f32], point: usize) -> Result<f32> {
    rho.get(point).copied().ok_or(ClueError::PointOutOfRange {
        point,
        points: rho.len(),
    })
}

/// Finds the nearest point within `dm` that outranks `point` by density.
///
/// Ties in distance keep the first candidate met, and candidates are met in
/// a fixed order, so the result does not depend on scheduling.
///
/// # Errors
/// Returns [`ClueError::LengthMismatch`] when `rho` and `coords` differ in
/// length, and [`ClueError::PointOutOfRange`] when `point`, or a point filed
/// in `index`, has no entry in `coords`.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use clue_core::{Executor, fill_tiles, nearest_higher_of};
///
/// let coords = [[0.0_f32], [1.0], [3.0]];
/// let rho = [1.0, 2.0, 1.0];
/// let tiles = fill_tiles(Executor::Serial, &coords, NonZeroUsize::MIN, None)?;
/// let found = nearest_higher_of(&tiles, &coords, &rho, 0, 2.0)?;
/// assert_eq!(found.neighbour, Some(1));
/// assert_eq!(found.delta, 1.0);
/// assert_eq!(nearest_higher_of(&tiles, &coords, &rho, 1, 2.0)?.neighbour, None);
/// # Ok::<(), clue_core::ClueError>(())
/// ```
pub fn nearest_higher_of<const D: usize, I>(
    index: &I,
    coords: &[[f32; D]],
    rho: &[f32],
    point: usize,
    dm: f32,
) -> Result<NearestHigher>
where
    I: SpatialIndex<D> + ?Sized,
{
    ensure_len("rho", coords.len(), rho.len())?;
    let centre = coords_of(coords, point)?;
    let rho_point = density_of(rho, point)?;
    let dm_squared = dm * dm;
    let mut best_squared = f32::INFINITY;
    let mut best = None;
    for_each_candidate(index, coords, centre, dm, |j, position| {
        // `rho` matches `coords` in length and `j` indexes `coords`.
        let Some(&rho_j) = rho.get(j) else {
            return;
        };
        if j == point || !outranks(rho_j, j, rho_point, point) {
            return;
        }
        let distance_squared = squared_distance(centre, position);
        if distance_squared <= dm_squared && distance_squared < best_squared {
            best_squared = distance_squared;
            best = Some(j);
        }
    })?;

    Ok(match best {
        // Candidates come from a `u32` index, so the conversion is lossless.
        Some(neighbour) => NearestHigher {
            delta: best_squared.sqrt(),
            neighbour: Some(neighbour as u32),
        },
        None => NearestHigher::NONE,
    })
}

/// Runs [`nearest_higher_of`] for every point and returns the `delta` and
/// `nearest_higher` arrays.
///
/// # Errors
/// Returns [`ClueError::LengthMismatch`] when `rho` and `coords` differ in
/// length, and [`ClueError::PointOutOfRange`] when `index` was built over
/// more points than `coords` holds.
#[instrument(name = "core.nearest_higher", skip_all, fields(points = coords.len(), dm = dm))]
pub fn nearest_higher<const D: usize, I>(
    executor: Executor,
    index: &I,
    coords: &[[f32; D]],
    rho: &[f32],
    dm: f32,
) -> Result<(Vec<f32>, Vec<Option<u32>>)>
where
    I: SpatialIndex<D> + Sync + ?Sized,
{
    ensure_len("rho", coords.len(), rho.len())?;
    let found = executor.try_map(coords.len(), |point| {
        nearest_higher_of(index, coords, rho, point, dm)
    })?;
    Ok(found
        .into_iter()
        .map(|found| (found.delta, found.neighbour))
        .unzip())
}
