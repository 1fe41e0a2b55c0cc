//! Exhaustive rule search.
//!
//! - [`choice`]: enumeration of variable/cut combinations
//! - [`partition`]: static split of choices across workers
//! - [`kernel`]: bucket accumulation and contrast scoring
//! - [`report`]: ranking and rule rendering
//! - [`SearchEngine`]: ties the above together

pub mod choice;
mod config;
mod engine;
pub mod kernel;
pub mod partition;
pub mod report;

pub use choice::{Choice, ChoiceSet, count_choices};
pub use config::{ConfigError, Depth, SearchConfig, SearchConfigBuilder};
pub use engine::{RunSummary, SearchEngine, SearchError};
pub use kernel::{KernelKind, UnknownKernel, accumulate_packed, accumulate_reference, contrast};
pub use partition::{partition_ranges, split_by_ranges};
pub use report::{RULE_SEPARATOR, RankedRule, Report, build_report, render_rule, top_indices};
