//! Struct-of-arrays point storage annotated in place by the pipeline.

use crate::{ClueError, Result, result::ClusterId};

/// Classification a point receives once the pipeline completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointRole {
    /// A local density maximum that anchors a cluster.
    Seed,
    /// A point inheriting its cluster from its nearest-higher neighbour.
    Follower,
    /// A point belonging to no cluster.
    Outlier,
}

/// Coordinates of `n` points in `D` dimensions plus the per-point fields the
/// pipeline derives from them.
///
/// Coordinates are fixed at construction. The derived fields (`rho`, `delta`,
/// `nearest_higher`, `is_seed`, `cluster_index`) hold their neutral values
/// until [`crate::Clue::run`] succeeds, and are reset when a run fails.
///
/// # Examples
/// ```
/// use clue_core::PointSet;
///
/// let points = PointSet::<2>::try_from_flat(&[0.0, 0.0, 1.0, 0.5])?;
/// assert_eq!(points.len(), 2);
/// assert_eq!(points.coords(1), Some(&[1.0, 0.5]));
/// assert!(!points.is_annotated());
/// # Ok::<(), clue_core::ClueError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet<const D: usize> {
    coords: Vec<[f32; D]>,
    rho: Vec<f32>,
    delta: Vec<f32>,
    nearest_higher: Vec<Option<u32>>,
    is_seed: Vec<bool>,
    cluster_index: Vec<Option<ClusterId>>,
    annotated: bool,
}

impl<const D: usize> PointSet<D> {
    /// Validates `coords` and wraps them in an unannotated point set.
    ///
    /// # Errors
    /// Returns [`ClueError::ZeroDimension`] when `D == 0`,
    /// [`ClueError::EmptyPointSet`] for an empty input,
    /// [`ClueError::IndexOverflow`] when the count does not fit a `u32`
    /// index, and [`ClueError::NonFiniteCoordinate`] for NaN or infinite
    /// coordinates.
    pub fn try_new(coords: Vec<[f32; D]>) -> Result<Self> {
        if D == 0 {
            return Err(ClueError::ZeroDimension);
        }
        if coords.is_empty() {
            return Err(ClueError::EmptyPointSet);
        }
        if u32::try_from(coords.len()).is_err() {
            return Err(ClueError::IndexOverflow {
                points: coords.len(),
            });
        }
        for (point, row) in coords.iter().enumerate() {
            if let Some(dimension) = row.iter().position(|value| !value.is_finite()) {
                return Err(ClueError::NonFiniteCoordinate { point, dimension });
            }
        }

        let n = coords.len();
        Ok(Self {
            coords,
            rho: vec![0.0; n],
            delta: vec![f32::INFINITY; n],
            nearest_higher: vec![None; n],
            is_seed: vec![false; n],
            cluster_index: vec![None; n],
            annotated: false,
        })
    }

    /// Builds a point set from a row-major buffer of `n * D` coordinates.
    ///
    /// # Errors
    /// Returns [`ClueError::DimensionMismatch`] when the buffer length is not
    /// a multiple of `D`, plus everything [`Self::try_new`] rejects.
    pub fn try_from_flat(values: &[f32]) -> Result<Self> {
        if D == 0 {
            return Err(ClueError::ZeroDimension);
        }
        let (rows, remainder) = values.as_chunks::<D>();
        if !remainder.is_empty() {
            return Err(ClueError::DimensionMismatch {
                expected: D,
                actual: remainder.len(),
            });
        }
        Self::try_new(rows.to_vec())
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Returns `true` when the set holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Returns the coordinates of point `index`.
    #[must_use]
    pub fn coords(&self, index: usize) -> Option<&[f32; D]> {
        self.coords.get(index)
    }

    /// Returns every point's coordinates in index order.
    #[must_use]
    #[rustfmt::skip]
    pub fn coordinates(&self) -> &[[f32; D]] { &self.coords }

    /// Local densities.
    #[must_use]
    #[rustfmt::skip]
    pub fn rho(&self) -> &[f32] { &self.rho }

    /// Distances to the nearest-higher neighbour; `f32::INFINITY` when none
    /// lies within the search radius.
    #[must_use]
    #[rustfmt::skip]
    pub fn delta(&self) -> &[f32] { &self.delta }

    /// Nearest-higher neighbours.
    #[must_use]
    #[rustfmt::skip]
    pub fn nearest_higher(&self) -> &[Option<u32>] { &self.nearest_higher }

    /// Seed flags.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_seed(&self) -> &[bool] { &self.is_seed }

    /// Cluster labels; `None` for outliers and before a run.
    #[must_use]
    #[rustfmt::skip]
    pub fn cluster_index(&self) -> &[Option<ClusterId>] { &self.cluster_index }

    /// Returns `true` once a run has populated the derived fields.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_annotated(&self) -> bool { self.annotated }

    /// Returns the role of point `index`, or `None` when the set has not been
    /// annotated or the index is out of range.
    ///
    /// A follower whose chain of nearest-higher links ends at an outlier never
    /// receives a label and is reported as an outlier.
    ///
    /// # Examples
    /// ```
    /// use clue_core::{ClueBuilder, PointRole, PointSet};
    ///
    /// let mut points = PointSet::<1>::try_new(vec![[0.0], [0.1], [50.0]])?;
    /// assert_eq!(points.role(0), None);
    ///
    /// ClueBuilder::new().with_density_threshold(1.5).build()?.run(&mut points)?;
    /// assert_eq!(points.role(1), Some(PointRole::Seed));
    /// assert_eq!(points.role(0), Some(PointRole::Follower));
    /// assert_eq!(points.role(2), Some(PointRole::Outlier));
    /// # Ok::<(), clue_core::ClueError>(())
    /// ```
    #[must_use]
    pub fn role(&self, index: usize) -> Option<PointRole> {
        if !self.annotated {
            return None;
        }
        let is_seed = *self.is_seed.get(index)?;
        Some(match (is_seed, self.cluster_index[index]) {
            (true, _) => PointRole::Seed,
            (false, Some(_)) => PointRole::Follower,
            (false, None) => PointRole::Outlier,
        })
    }

    pub(crate) fn annotate(&mut self, annotations: Annotations) {
        let Annotations {
            rho,
            delta,
            nearest_higher,
            is_seed,
            cluster_index,
        } = annotations;
        debug_assert!(
            [
                rho.len(),
                delta.len(),
                nearest_higher.len(),
                is_seed.len(),
                cluster_index.len()
            ]
            .iter()
            .all(|&len| len == self.coords.len()),
            "every annotation array must cover the point set",
        );
        self.rho = rho;
        self.delta = delta;
        self.nearest_higher = nearest_higher;
        self.is_seed = is_seed;
        self.cluster_index = cluster_index;
        self.annotated = true;
    }

    /// Resets every derived field to its neutral value.
    pub fn clear_annotations(&mut self) {
        self.rho.fill(0.0);
        self.delta.fill(f32::INFINITY);
        self.nearest_higher.fill(None);
        self.is_seed.fill(false);
        self.cluster_index.fill(None);
        self.annotated = false;
    }
}

/// Derived per-point arrays produced by one successful run.
#[derive(Debug)]
pub(crate) struct Annotations {
    pub(crate) rho: Vec<f32>,
    pub(crate) delta: Vec<f32>,
    pub(crate) nearest_higher: Vec<Option<u32>>,
    pub(crate) is_seed: Vec<bool>,
    pub(crate) cluster_index: Vec<Option<ClusterId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn new_point_set_starts_unannotated() {
        let points = PointSet::<3>::try_new(vec![[1.0, 2.0, 3.0]; 4]).expect("valid points");
        assert_eq!(points.len(), 4);
        assert!(points.rho().iter().all(|&rho| rho == 0.0));
        assert!(points.delta().iter().all(|delta| delta.is_infinite()));
        assert!(points.cluster_index().iter().all(Option::is_none));
        assert_eq!(points.role(0), None);
    }

    #[rstest]
    #[case::nan(f32::NAN)]
    #[case::infinite(f32::NEG_INFINITY)]
    fn rejects_non_finite_coordinates(#[case] bad: f32) {
        let err = PointSet::<2>::try_new(vec![[0.0, 0.0], [1.0, bad]])
            .expect_err("non-finite coordinate must fail");
        assert_eq!(
            err,
            ClueError::NonFiniteCoordinate {
                point: 1,
                dimension: 1,
            }
        );
    }

    #[test]
    fn rejects_empty_and_zero_dimensional_sets() {
        assert_eq!(
            PointSet::<2>::try_new(Vec::new()),
            Err(ClueError::EmptyPointSet)
        );
        assert_eq!(
            PointSet::<0>::try_new(vec![[]; 3]),
            Err(ClueError::ZeroDimension)
        );
    }

    #[test]
    fn flat_buffer_must_divide_evenly() {
        let err = PointSet::<3>::try_from_flat(&[0.0; 7]).expect_err("7 is not a multiple of 3");
        assert_eq!(
            err,
            ClueError::DimensionMismatch {
                expected: 3,
                actual: 1,
            }
        );
    }

    #[test]
    fn clearing_resets_annotations() {
        let mut points = PointSet::<1>::try_new(vec![[0.0], [1.0]]).expect("valid points");
        points.annotate(Annotations {
            rho: vec![1.0, 1.0],
            delta: vec![f32::INFINITY, 1.0],
            nearest_higher: vec![None, Some(0)],
            is_seed: vec![true, false],
            cluster_index: vec![Some(ClusterId::new(0)), Some(ClusterId::new(0))],
        });
        assert_eq!(points.role(0), Some(PointRole::Seed));
        assert_eq!(points.role(1), Some(PointRole::Follower));

        points.clear_annotations();
        assert!(!points.is_annotated());
        assert_eq!(points.nearest_higher(), &[None, None]);
        assert_eq!(points.is_seed(), &[false, false]);
    }
}
