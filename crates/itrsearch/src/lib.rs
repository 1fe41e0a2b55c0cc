//! itrsearch: exhaustive search for individualized treatment rules.
//!
//! Enumerates every conjunction of up to three binned covariates, scores each
//! conjunction and each choice of cut directions with a bit-packed
//! aggregation kernel, and ranks the resulting rules by estimated
//! treatment-effect contrast.
//!
//! # Key Types
//!
//! - [`SearchEngine`] - Enumerates, scores in parallel and reports rules
//! - [`SearchConfig`] - Configuration builder (depth, threads, top-k)
//! - [`DatasetProvider`] - Query interface the engine consumes
//! - [`ItrDataset`] - In-memory provider with decile/category cuts
//!
//! # Example
//!
//! ```
//! use itrsearch::{ItrDataset, SearchConfig, SearchEngine, VariableKind};
//! use ndarray::array;
//!
//! // One continuous covariate, four samples
//! let covariates = array![[1.0, 2.0, 3.0, 4.0]];
//! let dataset = ItrDataset::builder()
//!     .covariates(covariates)
//!     .kinds(vec![VariableKind::Continuous])
//!     .names(vec!["age".to_string()])
//!     .actions(vec![0, 1, 0, 1])
//!     .responses(vec![1.0, 2.0, 0.5, 3.0])
//!     .build()
//!     .unwrap();
//!
//! let config = SearchConfig::builder().depth(1).build().unwrap();
//! let mut engine = SearchEngine::new(&dataset, &config).unwrap();
//! engine.run().unwrap();
//! let report = engine.report(3).unwrap();
//! assert_eq!(report.len(), 3);
//! ```

pub mod data;
pub mod logger;
pub mod search;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Search engine
pub use search::{
    Choice, ChoiceSet, ConfigError, Depth, KernelKind, RankedRule, Report, RunSummary,
    SearchConfig, SearchEngine, SearchError,
};

// Data types
pub use data::{
    CsvError, CsvOptions, DatasetError, DatasetProvider, ItrDataset, PackedMask, VariableKind,
};

// Logging
pub use logger::{SearchLogger, Verbosity};

// Shared utilities
pub use utils::{Parallelism, available_threads, run_with_threads};
