//! Search engine: enumerate once, score in parallel, report.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► Constructed ──run()──► Completed ──report()──► (any number of times)
//! ```
//!
//! Construction enumerates every choice and allocates the score table. `run`
//! splits the table into one contiguous block per worker and fills it in a
//! single fork-join pass. The table is read-only afterwards.

use std::time::{Duration, Instant};

use super::choice::ChoiceSet;
use super::config::{ConfigError, Depth, SearchConfig};
use super::kernel::{KernelKind, score_choice};
use super::partition::{partition_ranges, split_by_ranges};
use super::report::{Report, build_report};
use crate::data::DatasetProvider;
use crate::logger::SearchLogger;
use crate::utils::{Parallelism, available_threads, run_with_threads};

// =============================================================================
// Errors
// =============================================================================

/// Errors raised by [`SearchEngine`].
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("search has already been run")]
    AlreadyRun,

    #[error("search has not been run yet")]
    NotRun,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

// =============================================================================
// RunSummary
// =============================================================================

/// Statistics of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub n_choices: usize,
    pub n_scores: usize,
    pub n_threads: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy)]
enum RunState {
    Constructed,
    Completed(RunSummary),
}

// =============================================================================
// SearchEngine
// =============================================================================

/// Exhaustive rule search over a dataset provider.
///
/// # Example
///
/// ```
/// use itrsearch::{SearchConfig, SearchEngine, VariableKind};
/// use itrsearch::testing::random_dataset;
///
/// let data = random_dataset(200, &[VariableKind::Continuous; 4], 7);
/// let config = SearchConfig::builder().depth(2).top_k(5).build().unwrap();
///
/// let mut engine = SearchEngine::new(&data, &config).unwrap();
/// let summary = engine.run().unwrap();
/// assert_eq!(summary.n_scores, engine.scores().len());
///
/// for rule in &engine.report_top().unwrap() {
///     println!("{rule}");
/// }
/// ```
pub struct SearchEngine<'a, D: DatasetProvider + ?Sized> {
    data: &'a D,
    depth: Depth,
    choices: ChoiceSet,
    scores: Vec<f64>,
    parallelism: Parallelism,
    kernel: KernelKind,
    top_k: usize,
    logger: SearchLogger,
    state: RunState,
}

impl<'a, D: DatasetProvider + ?Sized> SearchEngine<'a, D> {
    /// Enumerate the search space and allocate the score table.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid.
    pub fn new(data: &'a D, config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let depth = Depth::new(config.depth)?;
        let logger = SearchLogger::new(config.verbosity);

        let n_cuts: Vec<usize> = (0..data.n_vars()).map(|v| data.n_cuts(v)).collect();
        let choices = ChoiceSet::enumerate(&n_cuts, depth);
        let scores = vec![0.0; choices.table_len()];
        logger.log_enumeration(depth.get(), n_cuts.len(), choices.len(), scores.len());

        let parallelism = Parallelism::from_threads(config.n_threads);
        if let Some(requested) = config.n_threads {
            logger.log_thread_clamp(requested.get(), parallelism.n_threads());
        }
        if choices.is_empty() {
            logger.warn(format!(
                "no choices at depth {} over {} variables",
                depth.get(),
                n_cuts.len()
            ));
        }

        Ok(Self {
            data,
            depth,
            choices,
            scores,
            parallelism,
            kernel: config.kernel,
            top_k: config.top_k,
            logger,
            state: RunState::Constructed,
        })
    }

    /// Score every choice under every direction mask.
    ///
    /// Blocks until all workers finish.
    ///
    /// # Errors
    ///
    /// - [`SearchError::AlreadyRun`] on a second call
    /// - [`SearchError::ThreadPool`] if the worker pool cannot be built
    pub fn run(&mut self) -> Result<RunSummary, SearchError> {
        if let RunState::Completed(_) = self.state {
            return Err(SearchError::AlreadyRun);
        }

        let start = Instant::now();
        let n_threads = self.parallelism.n_threads();
        let stride = self.depth.n_masks();
        let n_buckets = self.depth.n_buckets();

        let ranges = partition_ranges(self.choices.len(), n_threads);
        let tasks = split_by_ranges(&mut self.scores, &ranges, stride);

        let data = self.data;
        let choices = &self.choices;
        let kernel = self.kernel;
        let parallelism = self.parallelism;

        run_with_threads(parallelism, || {
            parallelism.maybe_par_for_each(tasks, |(range, block)| {
                let mut buckets = vec![0.0; n_buckets];
                for (choice, out) in choices.as_slice()[range]
                    .iter()
                    .zip(block.chunks_exact_mut(stride))
                {
                    score_choice(kernel, data, choice, &mut buckets, out);
                }
            });
        })?;

        let summary = RunSummary {
            n_choices: self.choices.len(),
            n_scores: self.scores.len(),
            n_threads,
            elapsed: start.elapsed(),
        };
        self.logger.log_run_complete(summary.elapsed, n_threads);
        self.state = RunState::Completed(summary);
        Ok(summary)
    }

    /// Top `k` rules, best first. `k` is capped to the table length.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NotRun`] before [`run`](Self::run).
    pub fn report(&self, k: usize) -> Result<Report, SearchError> {
        match self.state {
            RunState::Constructed => Err(SearchError::NotRun),
            RunState::Completed(_) => Ok(build_report(self.data, &self.choices, &self.scores, k)),
        }
    }

    /// Top rules using the configured `top_k`.
    pub fn report_top(&self) -> Result<Report, SearchError> {
        self.report(self.top_k)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Raw score table, `choices().len() * 2^depth` entries.
    ///
    /// All zeros until the run completes.
    #[inline]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    #[inline]
    pub fn choices(&self) -> &ChoiceSet {
        &self.choices
    }

    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    #[inline]
    pub fn kernel(&self) -> KernelKind {
        self.kernel
    }

    /// Worker count after clamping to the hardware.
    #[inline]
    pub fn n_threads(&self) -> usize {
        self.parallelism.n_threads()
    }

    /// Upper bound for `n_threads` on this machine.
    #[inline]
    pub fn max_threads() -> usize {
        available_threads()
    }

    /// Summary of the completed run, if any.
    pub fn summary(&self) -> Option<RunSummary> {
        match self.state {
            RunState::Constructed => None,
            RunState::Completed(summary) => Some(summary),
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, RunState::Completed(_))
    }
}
