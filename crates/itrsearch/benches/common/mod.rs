//! Dataset shapes shared by the benchmarks.

#![allow(dead_code)]

use std::fmt;

use itrsearch::VariableKind;

#[derive(Debug, Clone, Copy)]
pub struct SearchShape {
    pub name: &'static str,
    pub samples: usize,
    pub vars: usize,
}

impl fmt::Display for SearchShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} samples={} vars={}", self.name, self.samples, self.vars)
    }
}

pub const KERNEL_SHAPES: &[SearchShape] = &[
    SearchShape {
        name: "small",
        samples: 1_000,
        vars: 8,
    },
    SearchShape {
        name: "tall",
        samples: 20_003,
        vars: 8,
    },
];

pub const THREAD_COUNTS: &[usize] = &[1, 2, 4, 8];

/// Continuous, ordinal and nominal covariates in rotation.
pub fn mixed_kinds(n_vars: usize) -> Vec<VariableKind> {
    [
        VariableKind::Continuous,
        VariableKind::Ordinal,
        VariableKind::Nominal,
    ]
    .into_iter()
    .cycle()
    .take(n_vars)
    .collect()
}
