//! Common utilities used across the crate.
//!
//! This module provides parallelism configuration and thread pool setup
//! shared by the search engine and the benchmarks.

use std::num::NonZeroUsize;

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Number of threads the hardware can run in parallel.
///
/// Falls back to 1 when the platform cannot report it.
#[inline]
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Worker pool size for a search run.
///
/// The search distributes a fixed number of contiguous work ranges, one per
/// worker, so the variant carries the exact pool size rather than a hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Run on the calling thread.
    #[default]
    Sequential,
    /// Run on a dedicated pool with exactly `n` workers (`n > 1`).
    Parallel(usize),
}

impl Parallelism {
    /// Create from a requested thread count, clamped to the hardware.
    ///
    /// - `None` = all available cores
    /// - `Some(1)` = sequential
    /// - `Some(n)` = `min(n, available_threads())` workers
    #[inline]
    pub fn from_threads(requested: Option<NonZeroUsize>) -> Self {
        Self::from_threads_with_limit(requested, available_threads())
    }

    /// Same as [`from_threads`](Self::from_threads) with an explicit hardware limit.
    #[inline]
    pub fn from_threads_with_limit(requested: Option<NonZeroUsize>, limit: usize) -> Self {
        let limit = limit.max(1);
        let n = requested.map_or(limit, |n| n.get().min(limit));
        if n <= 1 {
            Self::Sequential
        } else {
            Self::Parallel(n)
        }
    }

    /// Number of workers (1 for sequential).
    #[inline]
    pub fn n_threads(self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Parallel(n) => n.max(1),
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Self::Parallel(n) if n > 1)
    }

    #[inline]
    pub fn maybe_par_for_each<T, I, F>(self, iter: I, f: F)
    where
        T: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().for_each(f);
        } else {
            iter.into_iter().for_each(f);
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure inside a pool sized for `parallelism`.
///
/// Sequential runs on the calling thread without building a pool. Parallel
/// builds a fresh pool with exactly `n` threads and blocks until `f` returns.
///
/// # Example
///
/// ```
/// use itrsearch::{Parallelism, run_with_threads};
///
/// let n = run_with_threads(Parallelism::Parallel(2), rayon::current_num_threads).unwrap();
/// assert_eq!(n, 2);
/// ```
#[inline]
pub fn run_with_threads<T: Send>(
    parallelism: Parallelism,
    f: impl FnOnce() -> T + Send,
) -> Result<T, rayon::ThreadPoolBuildError> {
    match parallelism {
        Parallelism::Sequential => Ok(f()),
        Parallelism::Parallel(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| format!("itrsearch-worker-{i}"))
                .build()?;
            Ok(pool.install(f))
        }
    }
}
