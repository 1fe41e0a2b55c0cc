//! Query interface between a dataset and the search engine.

use super::mask::PackedMask;

/// Read-only view of a binned dataset, as consumed by the search engine.
///
/// Implementations must be immutable for the duration of a search run; the
/// engine shares one reference across all workers without locking.
///
/// # Contract
///
/// - `cut_mask(v, c)` is defined for `v < n_vars()` and `c < n_cuts(v)`, and
///   covers exactly `n_samples()` samples.
/// - Action codes are binary: every bit of `action_mask()` is the action of
///   one sample, and `action()` returns 0 or 1.
/// - `responses().len() == n_samples()`.
pub trait DatasetProvider: Sync {
    /// Number of samples.
    fn n_samples(&self) -> usize;

    /// Number of covariates.
    fn n_vars(&self) -> usize;

    /// Number of cuts of covariate `var`.
    fn n_cuts(&self, var: usize) -> usize;

    /// Membership mask of one cut (set = upper side of the cut).
    fn cut_mask(&self, var: usize, cut: usize) -> &PackedMask;

    /// Membership bit of one sample for one cut.
    #[inline]
    fn membership(&self, var: usize, cut: usize, sample: usize) -> bool {
        self.cut_mask(var, cut).get(sample)
    }

    /// Packed action codes.
    fn action_mask(&self) -> &PackedMask;

    /// Action code of one sample (0 or 1).
    #[inline]
    fn action(&self, sample: usize) -> u8 {
        self.action_mask().get(sample) as u8
    }

    /// Response values, one per sample.
    fn responses(&self) -> &[f64];

    #[inline]
    fn response(&self, sample: usize) -> f64 {
        self.responses()[sample]
    }

    /// Reference aggregate added to every raw score before normalization.
    fn baseline(&self) -> f64;

    /// Human-readable description of one side of a cut.
    ///
    /// `upper` selects the side whose membership bit is set.
    fn cut_description(&self, var: usize, cut: usize, upper: bool) -> String;
}
