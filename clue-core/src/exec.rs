//! Execution layer for the pipeline phases.
//!
//! Every phase is expressed as "invoke `f(i)` for each `i` in `[0, n)`". The
//! [`Executor`] either walks the range on the calling thread or hands it to
//! Rayon. Returning from a launch is the barrier between phases: every
//! work-item has finished and its writes are visible to the caller.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
use crate::error::ClueError;
use crate::{ExecutionStrategy, Result};

/// Resolved backend used to launch per-index work-items.
///
/// # Examples
/// ```
/// use clue_core::{ExecutionStrategy, Executor};
///
/// let executor = Executor::resolve(ExecutionStrategy::Serial)?;
/// let squares = executor.map(4, |i| i * i);
/// assert_eq!(squares, vec![0, 1, 4, 9]);
/// # Ok::<(), clue_core::ClueError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Executor {
    /// Work-items run in index order on the calling thread.
    Serial,
    /// Work-items run on the global Rayon pool.
    #[cfg(feature = "parallel")]
    #[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
    Parallel,
}

impl Executor {
    /// Maps an [`ExecutionStrategy`] onto a backend compiled into this build.
    ///
    /// # Errors
    /// Returns [`crate::ClueError::BackendUnavailable`] when
    /// [`ExecutionStrategy::Parallel`] is requested without the `parallel`
    /// feature.
    pub fn resolve(strategy: ExecutionStrategy) -> Result<Self> {
        match strategy {
            ExecutionStrategy::Serial => Ok(Self::Serial),
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Auto | ExecutionStrategy::Parallel => Ok(Self::Parallel),
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Auto => Ok(Self::Serial),
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Parallel => Err(ClueError::BackendUnavailable {
                requested: ExecutionStrategy::Parallel,
            }),
        }
    }

    /// Invokes `f(i)` once for every `i` in `0..n`.
    pub fn for_each<F>(self, n: usize, f: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        match self {
            Self::Serial => (0..n).for_each(f),
            #[cfg(feature = "parallel")]
            Self::Parallel => (0..n).into_par_iter().for_each(f),
        }
    }

    /// Invokes `f(i)` for every `i` in `0..n` and collects the outputs in
    /// index order.
    pub fn map<T, F>(self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            Self::Serial => (0..n).map(f).collect(),
            #[cfg(feature = "parallel")]
            Self::Parallel => (0..n).into_par_iter().map(f).collect(),
        }
    }

    /// Fallible [`Self::map`]: collects the outputs in index order, or returns
    /// an error produced by `f`.
    ///
    /// # Errors
    /// Returns an error produced by `f`. The serial backend reports the
    /// lowest failing index.
    pub fn try_map<T, E, F>(self, n: usize, f: F) -> core::result::Result<Vec<T>, E>
    where
        T: Send,
        E: Send,
        F: Fn(usize) -> core::result::Result<T, E> + Sync + Send,
    {
        match self {
            Self::Serial => (0..n).map(f).collect(),
            #[cfg(feature = "parallel")]
            Self::Parallel => (0..n).into_par_iter().map(f).collect(),
        }
    }

    /// Invokes `f(i)` for every `i` in `0..n`, stopping at the first error.
    ///
    /// # Errors
    /// Returns an error produced by `f`. Under the parallel backend the
    /// reported error is whichever work-item failed first in wall-clock order.
    pub fn try_for_each<E, F>(self, n: usize, f: F) -> core::result::Result<(), E>
    where
        E: Send,
        F: Fn(usize) -> core::result::Result<(), E> + Sync + Send,
    {
        match self {
            Self::Serial => (0..n).try_for_each(f),
            #[cfg(feature = "parallel")]
            Self::Parallel => (0..n).into_par_iter().try_for_each(f),
        }
    }

    /// Like [`Self::try_for_each`], but hands every work-item a scratch value
    /// created by `init`. Scratch values are reused across the work-items a
    /// worker processes, so per-item heap allocation is avoided.
    ///
    /// # Errors
    /// Returns an error produced by `f`.
    pub fn try_for_each_init<S, E, I, F>(self, n: usize, init: I, f: F) -> core::result::Result<(), E>
    where
        E: Send,
        I: Fn() -> S + Sync + Send,
        F: Fn(&mut S, usize) -> core::result::Result<(), E> + Sync + Send,
    {
        match self {
            Self::Serial => {
                let mut scratch = init();
                (0..n).try_for_each(|i| f(&mut scratch, i))
            }
            #[cfg(feature = "parallel")]
            Self::Parallel => (0..n).into_par_iter().try_for_each_init(init, f),
        }
    }
}
