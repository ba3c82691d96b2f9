//! Concurrent append table keyed by small integers.
//!
//! Tiles and the follower table both map a key to the list of point indices
//! appended under it by many concurrent work-items. The table is built with a
//! count-then-fill scheme so no per-key capacity has to be guessed up front:
//!
//! 1. Every work-item increments an atomic counter for its key.
//! 2. An exclusive prefix sum over the counters yields each key's offset.
//! 3. Every work-item reserves a slot with an atomic cursor for its key and
//!    writes its index into that slot.
//!
//! Capacity checks run on the counts, between passes, so an overfull key is
//! reported before anything is written and nothing is dropped silently.

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicU32, AtomicUsize, Ordering},
};

use thiserror::Error;

use crate::exec::Executor;

/// Failures raised while building a [`BucketTable`].
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum BucketError {
    /// More items mapped to one key than the configured capacity allows.
    #[error("key {key} received {count} entries but capacity is {capacity}")]
    CapacityExceeded {
        /// The overfull key.
        key: usize,
        /// Number of items that mapped to it.
        count: usize,
        /// Configured capacity per key.
        capacity: NonZeroUsize,
    },
    /// A key function returned a key outside `0..key_count`.
    #[error("item {item} mapped to key {key} but only {key_count} keys exist")]
    KeyOutOfRange {
        /// Item that produced the key.
        item: usize,
        /// The rejected key.
        key: usize,
        /// Number of keys in the table.
        key_count: usize,
    },
    /// Item indices must fit in 32 bits.
    #[error("{items} items exceed the 32-bit entry space")]
    TooManyItems {
        /// Number of items requested.
        items: usize,
    },
}

/// Read-only key to index-list mapping produced by [`BucketTable::build`].
///
/// Entries under each key are stored in ascending order so readers see the
/// same sequence regardless of how the build was scheduled.
///
/// # Examples
/// ```
/// use clue_core::{BucketTable, Executor};
///
/// // Bucket items 0..6 by parity.
/// let table = BucketTable::build(Executor::Serial, 2, 6, None, |i| Some(i % 2))?;
/// assert_eq!(table.get(0), &[0, 2, 4]);
/// assert_eq!(table.get(1), &[1, 3, 5]);
/// # Ok::<(), clue_core::BucketError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BucketTable {
    offsets: Vec<usize>,
    entries: Vec<u32>,
}

impl BucketTable {
    /// Appends every item `i` in `0..items` under `key_of(i)`, skipping items
    /// for which `key_of` returns `None`.
    ///
    /// # Errors
    /// Returns [`BucketError::CapacityExceeded`] for the lowest key whose
    /// count exceeds `capacity`, [`BucketError::KeyOutOfRange`] when
    /// `key_of` yields a key `>= key_count`, and
    /// [`BucketError::TooManyItems`] when item indices do not fit in `u32`.
    pub fn build<F>(
        executor: Executor,
        key_count: usize,
        items: usize,
        capacity: Option<NonZeroUsize>,
        key_of: F,
    ) -> Result<Self, BucketError>
    where
        F: Fn(usize) -> Option<usize> + Sync + Send,
    {
        if u32::try_from(items).is_err() {
            return Err(BucketError::TooManyItems { items });
        }

        let counts: Vec<AtomicUsize> = (0..key_count).map(|_| AtomicUsize::new(0)).collect();
        executor.try_for_each(items, |item| {
            let Some(key) = key_of(item) else {
                return Ok(());
            };
            let counter = counts.get(key).ok_or(BucketError::KeyOutOfRange {
                item,
                key,
                key_count,
            })?;
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })?;
        let counts: Vec<usize> = counts.into_iter().map(AtomicUsize::into_inner).collect();

        if let Some(capacity) = capacity {
            if let Some((key, &count)) = counts
                .iter()
                .enumerate()
                .find(|&(_, &count)| count > capacity.get())
            {
                return Err(BucketError::CapacityExceeded {
                    key,
                    count,
                    capacity,
                });
            }
        }

        let mut offsets = Vec::with_capacity(key_count.saturating_add(1));
        let mut total = 0_usize;
        offsets.push(total);
        for count in &counts {
            total += count;
            offsets.push(total);
        }

        let cursors: Vec<AtomicUsize> = offsets
            .iter()
            .take(key_count)
            .map(|&offset| AtomicUsize::new(offset))
            .collect();
        let slots: Vec<AtomicU32> = (0..total).map(|_| AtomicU32::new(0)).collect();
        executor.for_each(items, |item| {
            let Some(key) = key_of(item) else {
                return;
            };
            // Keys were range-checked during the counting pass.
            let slot = cursors[key].fetch_add(1, Ordering::Relaxed);
            // `items` fits in u32, so every item index does too.
            slots[slot].store(item as u32, Ordering::Relaxed);
        });

        let mut entries: Vec<u32> = slots.into_iter().map(AtomicU32::into_inner).collect();
        for window in offsets.windows(2) {
            if let [start, end] = *window {
                entries[start..end].sort_unstable();
            }
        }

        Ok(Self { offsets, entries })
    }

    /// Returns the entries appended under `key`, or an empty slice for an
    /// unknown key.
    #[must_use]
    pub fn get(&self, key: usize) -> &[u32] {
        match (self.offsets.get(key), self.offsets.get(key.wrapping_add(1))) {
            (Some(&start), Some(&end)) => &self.entries[start..end],
            _ => &[],
        }
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Returns the total number of entries across all keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries were appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the length of the longest per-key list.
    #[must_use]
    pub fn max_bucket_len(&self) -> usize {
        self.offsets
            .windows(2)
            .map(|window| match *window {
                [start, end] => end - start,
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }
}
