//! Cut construction for covariates.
//!
//! Every covariate is turned into a list of cuts, each of which splits the
//! samples into a "lower" and an "upper" side:
//!
//! | Kind | Cut values | Upper side |
//! |------|------------|------------|
//! | Continuous | deciles of the column (max excluded) | `x > t` |
//! | Ordinal | sorted unique values except the largest | `x > u` |
//! | Nominal | sorted unique values (one if exactly two) | `x == u` |

use ndarray::ArrayView1;

use super::mask::PackedMask;

/// Number of quantile bins used for continuous covariates.
pub const N_QUANTILE_BINS: usize = 10;

/// How a covariate is cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// Real-valued; cut at decile thresholds.
    Continuous,
    /// Ordered discrete values; cut between consecutive unique values.
    Ordinal,
    /// Unordered categories; one-vs-rest per category.
    Nominal,
}

impl VariableKind {
    /// Column-name prefix used in CSV headers.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Continuous => "cont_",
            Self::Ordinal => "ord_",
            Self::Nominal => "nom_",
        }
    }
}

/// Sorted, deduplicated values of a column.
pub fn unique_sorted(column: ArrayView1<'_, f64>) -> Vec<f64> {
    let mut values: Vec<f64> = column.iter().copied().collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

/// Decile thresholds of a column.
///
/// Threshold `k` (for `k` in `1..10`) is the smallest value with at least
/// `k/10` of the samples at or below it. Duplicates and the column maximum
/// are dropped, since a cut there would leave the upper side empty.
pub fn decile_thresholds(column: ArrayView1<'_, f64>) -> Vec<f64> {
    let n = column.len();
    if n == 0 {
        return Vec::new();
    }

    let mut sorted: Vec<f64> = column.iter().copied().collect();
    sorted.sort_by(f64::total_cmp);
    let max = sorted[n - 1];

    let mut thresholds: Vec<f64> = (1..N_QUANTILE_BINS)
        .map(|k| sorted[(k * n).div_ceil(N_QUANTILE_BINS) - 1])
        .filter(|&t| t < max)
        .collect();
    thresholds.dedup();
    thresholds
}

/// Cuts of one covariate, with their membership masks.
#[derive(Debug, Clone)]
pub struct VariableCuts {
    kind: VariableKind,
    values: Vec<f64>,
    masks: Vec<PackedMask>,
}

impl VariableCuts {
    /// Derive the cuts of a column and evaluate their masks.
    pub fn build(kind: VariableKind, column: ArrayView1<'_, f64>) -> Self {
        let values = match kind {
            VariableKind::Continuous => decile_thresholds(column),
            VariableKind::Ordinal => {
                let mut unique = unique_sorted(column);
                unique.pop();
                unique
            }
            VariableKind::Nominal => {
                let mut unique = unique_sorted(column);
                match unique.len() {
                    // A single category splits nothing
                    0 | 1 => Vec::new(),
                    // Both one-vs-rest cuts are the same split
                    2 => {
                        unique.truncate(1);
                        unique
                    }
                    _ => unique,
                }
            }
        };

        let n = column.len();
        let masks = values
            .iter()
            .map(|&t| match kind {
                VariableKind::Continuous | VariableKind::Ordinal => {
                    PackedMask::from_fn(n, |i| column[i] > t)
                }
                VariableKind::Nominal => PackedMask::from_fn(n, |i| column[i] == t),
            })
            .collect();

        Self { kind, values, masks }
    }

    #[inline]
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    #[inline]
    pub fn n_cuts(&self) -> usize {
        self.values.len()
    }

    /// Threshold or category of each cut.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn mask(&self, cut: usize) -> &PackedMask {
        &self.masks[cut]
    }

    /// Describe one side of a cut for covariate `name`.
    pub fn describe(&self, name: &str, cut: usize, upper: bool) -> String {
        let value = self.values[cut];
        match (self.kind, upper) {
            (VariableKind::Continuous | VariableKind::Ordinal, true) => format!("{name} > {value}"),
            (VariableKind::Continuous | VariableKind::Ordinal, false) => format!("{name} <= {value}"),
            (VariableKind::Nominal, true) => format!("{name} = {value}"),
            (VariableKind::Nominal, false) => format!("{name} != {value}"),
        }
    }
}
