//! Test utilities.
//!
//! Seeded synthetic datasets shared by unit tests, integration tests and
//! benchmarks.

mod data;

pub use data::{PlantedRule, planted_rule_dataset, random_actions, random_covariates, random_dataset};
