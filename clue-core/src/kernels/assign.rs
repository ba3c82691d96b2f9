use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicU32, Ordering},
};

use tracing::instrument;

use super::{Classification, ensure_len};
use crate::{ClueError, Result, exec::Executor, result::ClusterId};

const UNASSIGNED: u32 = u32::MAX;

fn label_slot(labels: &[AtomicU32], point: u32) -> Result<&AtomicU32> {
    labels.get(point as usize).ok_or(ClueError::PointOutOfRange {
        point: point as usize,
        points: labels.len(),
    })
}

/// Labels the follower tree below seed number `cluster` with its cluster id.
///
/// `stack` is scratch space reused across seeds; it holds `(point, depth)`
/// pairs awaiting expansion. The traversal is iterative, and `capacity`
/// bounds how many links a follower may sit below its seed. It does not
/// bound the number of pending entries: a seed with many direct followers
/// pushes all of them, and `stack` grows past `capacity` to hold them.
///
/// # Errors
/// Returns [`ClueError::UnknownCluster`] when `cluster` is not below the
/// number of seeds, [`ClueError::LengthMismatch`] when `labels` does not
/// hold one slot per classified point, and
/// [`ClueError::StackCapacityExceeded`] when a follower sits deeper than
/// `capacity` links below the seed.
pub fn propagate_from_seed(
    classification: &Classification,
    labels: &[AtomicU32],
    cluster: u32,
    capacity: NonZeroUsize,
    stack: &mut Vec<(u32, usize)>,
) -> Result<()> {
    let seeds = classification.seeds();
    let Some(&seed) = seeds.get(cluster as usize) else {
        return Err(ClueError::UnknownCluster {
            cluster,
            seeds: seeds.len(),
        });
    };
    ensure_len("labels", classification.roles().len(), labels.len())?;
    label_slot(labels, seed)?.store(cluster, Ordering::Relaxed);
    stack.clear();
    stack.push((seed, 0));

    while let Some((point, depth)) = stack.pop() {
        let child_depth = depth + 1;
        for &follower in classification.followers_of(point) {
            if child_depth > capacity.get() {
                stack.clear();
                return Err(ClueError::StackCapacityExceeded {
                    seed,
                    depth: child_depth,
                    capacity,
                });
            }
            label_slot(labels, follower)?.store(cluster, Ordering::Relaxed);
            stack.push((follower, child_depth));
        }
    }
    Ok(())
}

/// Runs [`propagate_from_seed`] once per seed and collects the labels.
///
/// Follower trees of distinct seeds are disjoint, so every label slot is
/// written by at most one work-item.
///
/// # Errors
/// Returns [`ClueError::StackCapacityExceeded`] when any follower chain is
/// deeper than `capacity`.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use clue_core::{ClusterId, Executor, Thresholds, assign_clusters, find_clusters};
///
/// let classification = find_clusters(
///     Executor::Serial,
///     &[3.0, 2.0, 1.0],
///     &[f32::INFINITY, 0.5, 0.5],
///     &[None, Some(0), Some(1)],
///     Thresholds::new(1.0, 1.0, 2.0),
/// )?;
/// let two = NonZeroUsize::MIN.saturating_add(1);
/// let labels = assign_clusters(Executor::Serial, &classification, two)?;
/// assert_eq!(labels, vec![Some(ClusterId::new(0)); 3]);
///
/// let err = assign_clusters(Executor::Serial, &classification, NonZeroUsize::MIN);
/// assert!(err.is_err());
/// # Ok::<(), clue_core::ClueError>(())
/// ```
#[instrument(
    name = "core.assign_clusters",
    skip_all,
    fields(seeds = classification.seeds().len(), capacity = capacity.get()),
)]
pub fn assign_clusters(
    executor: Executor,
    classification: &Classification,
    capacity: NonZeroUsize,
) -> Result<Vec<Option<ClusterId>>> {
    let labels: Vec<AtomicU32> = (0..classification.roles().len())
        .map(|_| AtomicU32::new(UNASSIGNED))
        .collect();

    let init = || Vec::with_capacity(capacity.get());
    executor.try_for_each_init(classification.seeds().len(), init, |stack, cluster| {
        // Seed count is bounded by the point count, which fits in u32.
        propagate_from_seed(classification, &labels, cluster as u32, capacity, stack)
    })?;

    Ok(labels
        .into_iter()
        .map(|label| match label.into_inner() {
            UNASSIGNED => None,
            id => Some(ClusterId::new(id)),
        })
        .collect())
}
