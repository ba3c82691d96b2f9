//! Result types for clustering operations.

use std::fmt;

/// Identifier for a cluster: the position of its seed in the seed list.
///
/// # Examples
/// ```
/// use clue_core::ClusterId;
///
/// let id = ClusterId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u32);

impl ClusterId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    #[rustfmt::skip]
    pub const fn new(id: u32) -> Self { Self(id) }

    /// Returns the numeric value of the identifier.
    #[must_use]
    #[rustfmt::skip]
    pub const fn get(self) -> u32 { self.0 }

    /// Returns the identifier as an index into per-cluster arrays.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index(self) -> usize { self.0 as usize }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of a [`crate::Clue::run`] invocation.
///
/// The per-point fields themselves live on the annotated
/// [`crate::PointSet`]; this type keeps the cluster-level view.
///
/// # Examples
/// ```
/// use clue_core::{ClusterId, ClusteringResult};
///
/// let result = ClusteringResult::new(
///     vec![Some(ClusterId::new(0)), None, Some(ClusterId::new(0))],
///     vec![2],
/// );
/// assert_eq!(result.cluster_count(), 1);
/// assert_eq!(result.outlier_count(), 1);
/// assert_eq!(result.cluster_sizes(), vec![2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringResult {
    assignments: Vec<Option<ClusterId>>,
    seeds: Vec<u32>,
}

impl ClusteringResult {
    /// Bundles per-point labels with the seed list they were derived from.
    ///
    /// Cluster `k` is anchored by `seeds[k]`.
    #[must_use]
    pub fn new(assignments: Vec<Option<ClusterId>>, seeds: Vec<u32>) -> Self {
        Self { assignments, seeds }
    }

    /// Returns the per-point labels in point order.
    #[must_use]
    #[rustfmt::skip]
    pub fn assignments(&self) -> &[Option<ClusterId>] { &self.assignments }

    /// Returns the seed point of every cluster, indexed by [`ClusterId`].
    #[must_use]
    #[rustfmt::skip]
    pub fn seeds(&self) -> &[u32] { &self.seeds }

    /// Returns the seed point anchoring `cluster`.
    #[must_use]
    pub fn seed_of(&self, cluster: ClusterId) -> Option<u32> {
        self.seeds.get(cluster.index()).copied()
    }

    /// Returns the number of clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.seeds.len()
    }

    /// Returns the number of points left without a cluster.
    ///
    /// This includes the points that passed the outlier test and any
    /// follower whose chain of nearest-higher links ends at one of them, so
    /// it can exceed [`crate::Classification::outlier_count`] for the same
    /// run.
    #[must_use]
    pub fn outlier_count(&self) -> usize {
        self.assignments.iter().filter(|label| label.is_none()).count()
    }

    /// Returns the number of points in each cluster, indexed by
    /// [`ClusterId`].
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.seeds.len()];
        for id in self.assignments.iter().flatten() {
            if let Some(size) = sizes.get_mut(id.index()) {
                *size += 1;
            }
        }
        sizes
    }
}
