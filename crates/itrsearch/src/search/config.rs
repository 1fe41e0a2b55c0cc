//! Search configuration with builder pattern.
//!
//! [`SearchConfig`] uses the `bon` crate for builder generation and validates
//! at build time.
//!
//! # Example
//!
//! ```
//! use itrsearch::{KernelKind, SearchConfig};
//! use std::num::NonZeroUsize;
//!
//! // All defaults: depth 2, all cores, top 10
//! let config = SearchConfig::builder().build().unwrap();
//!
//! let config = SearchConfig::builder()
//!     .depth(3)
//!     .n_threads(NonZeroUsize::new(4).unwrap())
//!     .top_k(25)
//!     .kernel(KernelKind::Reference)
//!     .build()
//!     .unwrap();
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use super::kernel::KernelKind;
use crate::logger::Verbosity;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Depth must be 1, 2 or 3.
    #[error("unsupported search depth {0} (must be 1, 2 or 3)")]
    UnsupportedDepth(usize),
    /// Top-k must be at least 1.
    #[error("top_k must be at least 1")]
    InvalidTopK,
}

// =============================================================================
// Depth
// =============================================================================

/// Number of covariates combined into one rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Depth(u8);

impl Depth {
    /// Largest supported depth.
    pub const MAX: usize = 3;

    /// Validate a depth.
    pub fn new(depth: usize) -> Result<Self, ConfigError> {
        if (1..=Self::MAX).contains(&depth) {
            Ok(Self(depth as u8))
        } else {
            Err(ConfigError::UnsupportedDepth(depth))
        }
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Direction masks per choice: `2^depth`.
    #[inline]
    pub fn n_masks(self) -> usize {
        1 << self.0
    }

    /// Accumulator buckets per choice: `2^(depth + 1)`.
    #[inline]
    pub fn n_buckets(self) -> usize {
        2 << self.0
    }
}

impl TryFrom<usize> for Depth {
    type Error = ConfigError;

    fn try_from(depth: usize) -> Result<Self, Self::Error> {
        Self::new(depth)
    }
}

// =============================================================================
// SearchConfig
// =============================================================================

/// Configuration for a rule search.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct SearchConfig {
    /// Covariates per rule (1, 2 or 3). Default: 2.
    #[builder(default = 2)]
    pub depth: usize,

    /// Number of worker threads. `None` uses all available cores; larger
    /// requests are clamped to the hardware.
    pub n_threads: Option<NonZeroUsize>,

    /// Rules kept by [`SearchEngine::report_top`](super::SearchEngine::report_top).
    /// Default: 10.
    #[builder(default = 10)]
    pub top_k: usize,

    /// Scoring kernel. Default: [`KernelKind::Packed`].
    #[builder(default)]
    pub kernel: KernelKind,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: search_config_builder::IsComplete> SearchConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `depth` is not 1, 2 or 3, or `top_k == 0`.
    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl SearchConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Depth::new(self.depth)?;
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}
