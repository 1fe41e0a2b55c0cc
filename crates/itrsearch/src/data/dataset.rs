//! In-memory dataset with precomputed cut masks.
//!
//! This module provides [`ItrDataset`], the default [`DatasetProvider`].

use bon::bon;
use ndarray::{Array2, ArrayView1};

use super::binning::{VariableCuts, VariableKind};
use super::mask::PackedMask;
use super::provider::DatasetProvider;

/// Errors that can occur while building a dataset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset has no samples")]
    Empty,

    #[error("{what} has {got} entries, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("action code {code} at sample {sample} is not binary (expected 0 or 1)")]
    NonBinaryAction { sample: usize, code: u8 },

    #[error("response at sample {sample} is not finite: {value}")]
    NonFiniteResponse { sample: usize, value: f64 },

    #[error("covariate {var} at sample {sample} is not finite: {value}")]
    NonFiniteCovariate {
        var: usize,
        sample: usize,
        value: f64,
    },
}

/// The in-memory dataset for rule search.
///
/// # Storage Layout
///
/// Covariates are stored **feature-major**: `[n_vars, n_samples]`, so each
/// covariate's column is contiguous. Cuts and their packed membership masks
/// are computed once at construction.
///
/// # Baseline
///
/// The baseline is the response sum over samples that received action 0.
/// Adding a rule's raw score to it gives the total response of the samples
/// whose action agrees with the rule's recommendation, so the normalized
/// score is the mean outcome under the rule.
///
/// # Example
///
/// ```
/// use itrsearch::{DatasetProvider, ItrDataset, VariableKind};
/// use ndarray::array;
///
/// // 2 covariates, 4 samples
/// let ds = ItrDataset::builder()
///     .covariates(array![[1.0, 2.0, 3.0, 4.0], [0.0, 1.0, 0.0, 1.0]])
///     .kinds(vec![VariableKind::Continuous, VariableKind::Nominal])
///     .actions(vec![0, 1, 1, 0])
///     .responses(vec![1.0, 2.0, 3.0, 4.0])
///     .build()
///     .unwrap();
///
/// assert_eq!(ds.n_samples(), 4);
/// assert_eq!(ds.n_vars(), 2);
/// assert_eq!(ds.baseline(), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct ItrDataset {
    /// Covariates: `[n_vars, n_samples]`.
    covariates: Array2<f64>,
    names: Vec<String>,
    cuts: Vec<VariableCuts>,
    actions: PackedMask,
    responses: Vec<f64>,
    baseline: f64,
}

#[bon]
impl ItrDataset {
    /// Validate the inputs and compute every cut mask.
    ///
    /// # Arguments
    ///
    /// * `covariates` - Feature-major matrix `[n_vars, n_samples]`
    /// * `kinds` - How each covariate is cut (length = n_vars)
    /// * `names` - Covariate names; defaults to `x0`, `x1`, ...
    /// * `actions` - Binary action code per sample
    /// * `responses` - Response value per sample
    #[builder(finish_fn = build)]
    pub fn new(
        covariates: Array2<f64>,
        kinds: Vec<VariableKind>,
        names: Option<Vec<String>>,
        actions: Vec<u8>,
        responses: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        let n_vars = covariates.nrows();
        let n_samples = covariates.ncols();

        if n_samples == 0 {
            return Err(DatasetError::Empty);
        }
        check_len("kinds", n_vars, kinds.len())?;
        check_len("actions", n_samples, actions.len())?;
        check_len("responses", n_samples, responses.len())?;

        let names = match names {
            Some(names) => {
                check_len("names", n_vars, names.len())?;
                names
            }
            None => (0..n_vars).map(|v| format!("x{v}")).collect(),
        };

        if let Some((sample, &code)) = actions.iter().enumerate().find(|(_, a)| **a > 1) {
            return Err(DatasetError::NonBinaryAction { sample, code });
        }
        if let Some((sample, &value)) = responses.iter().enumerate().find(|(_, y)| !y.is_finite()) {
            return Err(DatasetError::NonFiniteResponse { sample, value });
        }
        for (var, row) in covariates.rows().into_iter().enumerate() {
            if let Some((sample, &value)) = row.iter().enumerate().find(|(_, x)| !x.is_finite()) {
                return Err(DatasetError::NonFiniteCovariate { var, sample, value });
            }
        }

        let cuts = covariates
            .rows()
            .into_iter()
            .zip(&kinds)
            .map(|(row, &kind)| VariableCuts::build(kind, row))
            .collect();

        let baseline: f64 = actions
            .iter()
            .zip(&responses)
            .filter(|(a, _)| **a == 0)
            .map(|(_, y)| y)
            .sum();

        Ok(Self {
            covariates,
            names,
            cuts,
            actions: PackedMask::from_fn(n_samples, |i| actions[i] == 1),
            responses,
            baseline,
        })
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), DatasetError> {
    if expected == got {
        Ok(())
    } else {
        Err(DatasetError::ShapeMismatch { what, expected, got })
    }
}

impl ItrDataset {
    // =========================================================================
    // Accessors
    // =========================================================================

    /// Covariate names.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn kind(&self, var: usize) -> VariableKind {
        self.cuts[var].kind()
    }

    /// Raw values of one covariate.
    #[inline]
    pub fn covariate(&self, var: usize) -> ArrayView1<'_, f64> {
        self.covariates.row(var)
    }

    /// Cut values (thresholds or categories) of one covariate.
    #[inline]
    pub fn cut_values(&self, var: usize) -> &[f64] {
        self.cuts[var].values()
    }

    /// Cuts of one covariate.
    #[inline]
    pub fn cuts(&self, var: usize) -> &VariableCuts {
        &self.cuts[var]
    }
}

impl DatasetProvider for ItrDataset {
    #[inline]
    fn n_samples(&self) -> usize {
        self.covariates.ncols()
    }

    #[inline]
    fn n_vars(&self) -> usize {
        self.covariates.nrows()
    }

    #[inline]
    fn n_cuts(&self, var: usize) -> usize {
        self.cuts[var].n_cuts()
    }

    #[inline]
    fn cut_mask(&self, var: usize, cut: usize) -> &PackedMask {
        self.cuts[var].mask(cut)
    }

    #[inline]
    fn action_mask(&self) -> &PackedMask {
        &self.actions
    }

    #[inline]
    fn responses(&self) -> &[f64] {
        &self.responses
    }

    #[inline]
    fn baseline(&self) -> f64 {
        self.baseline
    }

    fn cut_description(&self, var: usize, cut: usize, upper: bool) -> String {
        self.cuts[var].describe(&self.names[var], cut, upper)
    }
}
