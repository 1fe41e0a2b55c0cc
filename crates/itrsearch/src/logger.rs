//! Verbosity-gated logging for search runs.
//!
//! Messages are forwarded to the [`log`] facade, so the host application
//! decides where they end up (the `itrsearch` binary installs `env_logger`).
//! [`Verbosity`] is an additional per-run gate: a silent search emits nothing
//! even when a logger is installed.

use std::time::Duration;

/// Verbosity level for search output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Errors and warnings only.
    Warning,
    /// Progress and important information.
    Info,
    /// Detailed debugging information.
    Debug,
}

impl Verbosity {
    /// Map a `-v` count from the command line to a level.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Warning,
            1 => Self::Info,
            _ => Self::Debug,
        }
    }

    /// The matching [`log::LevelFilter`].
    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            Self::Silent => log::LevelFilter::Off,
            Self::Warning => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
        }
    }
}

/// Logger for a single search engine.
#[derive(Clone, Copy, Debug)]
pub struct SearchLogger {
    verbosity: Verbosity,
}

impl SearchLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        if self.enabled(Verbosity::Warning) {
            log::warn!("{}", message.as_ref());
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        if self.enabled(Verbosity::Info) {
            log::info!("{}", message.as_ref());
        }
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        if self.enabled(Verbosity::Debug) {
            log::debug!("{}", message.as_ref());
        }
    }

    /// Log the size of the enumerated search space.
    pub fn log_enumeration(&self, depth: usize, n_vars: usize, n_choices: usize, table_len: usize) {
        self.debug(format!(
            "depth {depth}: {n_choices} choices over {n_vars} variables ({table_len} scores)"
        ));
    }

    /// Log a requested thread count that exceeded the hardware.
    pub fn log_thread_clamp(&self, requested: usize, granted: usize) {
        if requested > granted {
            self.debug(format!(
                "requested {requested} threads, clamped to {granted}"
            ));
        }
    }

    /// Log the end of a run.
    pub fn log_run_complete(&self, elapsed: Duration, n_threads: usize) {
        self.info(format!(
            "completed in {:.6e} seconds using {} threads",
            elapsed.as_secs_f64(),
            n_threads
        ));
    }
}

impl Default for SearchLogger {
    fn default() -> Self {
        Self::new(Verbosity::Silent)
    }
}
