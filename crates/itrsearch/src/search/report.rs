//! Ranking and rendering of scored rules.

use std::cmp::Ordering;
use std::fmt;

use super::choice::{Choice, ChoiceSet};
use crate::data::DatasetProvider;

/// Joins the cut fragments of a composite rule.
pub const RULE_SEPARATOR: &str = ", ";

// =============================================================================
// RankedRule
// =============================================================================

/// One entry of a ranked report.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRule {
    /// 0-based position in the report.
    pub rank: usize,
    /// Choice id in enumeration order.
    pub choice_id: usize,
    /// Direction mask (bit `depth - 1 - d` selects the upper side of dimension `d`).
    pub mask: usize,
    /// Raw contrast from the score table.
    pub raw_score: f64,
    /// `(baseline + raw_score) / n_samples`.
    pub score: f64,
    /// Cut descriptions joined by [`RULE_SEPARATOR`].
    pub rule: String,
}

impl fmt::Display for RankedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score = {:.6e}, Rule = {}", self.score, self.rule)
    }
}

// =============================================================================
// Report
// =============================================================================

/// Top rules of a search, best first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    rules: Vec<RankedRule>,
}

impl Report {
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[inline]
    pub fn rules(&self) -> &[RankedRule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedRule> {
        self.rules.iter()
    }

    /// Best rule, if any.
    pub fn best(&self) -> Option<&RankedRule> {
        self.rules.first()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a RankedRule;
    type IntoIter = std::slice::Iter<'a, RankedRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

// =============================================================================
// Ranking
// =============================================================================

/// Higher score first, lower index first among equal scores.
#[inline]
fn rank_order(scores: &[f64], a: usize, b: usize) -> Ordering {
    scores[b].total_cmp(&scores[a]).then(a.cmp(&b))
}

/// Indices of the `k` largest scores, best first.
///
/// `k` is capped to `scores.len()`. Only the top `k` are fully sorted.
///
/// # Example
///
/// ```
/// use itrsearch::search::top_indices;
///
/// assert_eq!(top_indices(&[0.5, 2.0, -1.0, 2.0], 3), vec![1, 3, 0]);
/// ```
pub fn top_indices(scores: &[f64], k: usize) -> Vec<usize> {
    let k = k.min(scores.len());
    if k == 0 {
        return Vec::new();
    }

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    if k < indices.len() {
        indices.select_nth_unstable_by(k - 1, |&a, &b| rank_order(scores, a, b));
        indices.truncate(k);
    }
    indices.sort_unstable_by(|&a, &b| rank_order(scores, a, b));
    indices
}

/// Description of one choice under one direction mask.
pub fn render_rule<D: DatasetProvider + ?Sized>(data: &D, choice: &Choice, mask: usize) -> String {
    let depth = choice.depth();
    let fragments: Vec<String> = choice
        .dims()
        .enumerate()
        .map(|(d, (var, cut))| {
            let upper = mask & (1 << (depth - 1 - d)) != 0;
            data.cut_description(var, cut, upper)
        })
        .collect();
    fragments.join(RULE_SEPARATOR)
}

/// Rank a completed score table and render its top `k` entries.
pub fn build_report<D: DatasetProvider + ?Sized>(
    data: &D,
    choices: &ChoiceSet,
    scores: &[f64],
    k: usize,
) -> Report {
    assert_eq!(
        scores.len(),
        choices.table_len(),
        "score table does not match the enumerated choices"
    );

    let baseline = data.baseline();
    let n_samples = data.n_samples().max(1) as f64;

    let rules = top_indices(scores, k)
        .into_iter()
        .enumerate()
        .map(|(rank, index)| {
            let (choice_id, mask) = choices.decode(index);
            let raw_score = scores[index];
            RankedRule {
                rank,
                choice_id,
                mask,
                raw_score,
                score: (baseline + raw_score) / n_samples,
                rule: render_rule(data, choices.get(choice_id), mask),
            }
        })
        .collect();

    Report { rules }
}
