//! Dataset provider for rule search.
//!
//! # Overview
//!
//! The search engine consumes data only through [`DatasetProvider`]. This
//! module defines that trait and ships one implementation, [`ItrDataset`],
//! which turns raw covariates into cuts and packed membership masks.
//!
//! - [`mask`]: nibble-packed per-sample bits ([`PackedMask`])
//! - [`binning`]: decile/ordinal/nominal cut construction
//! - [`csv`]: header-classified CSV ingestion

pub mod binning;
pub mod csv;
mod dataset;
pub mod mask;
mod provider;

pub use binning::{VariableCuts, VariableKind, decile_thresholds, unique_sorted};
pub use csv::{ColumnRole, CsvError, CsvHeader, CsvOptions, load_csv, read_csv};
pub use dataset::{DatasetError, ItrDataset};
pub use mask::{BITS_PER_SAMPLE, PackedMask, SAMPLES_PER_WORD};
pub use provider::DatasetProvider;
