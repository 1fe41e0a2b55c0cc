use ndarray::Array2;
use rand::prelude::*;

use crate::data::{ItrDataset, VariableCuts, VariableKind};
use crate::search::Choice;

/// Number of distinct values drawn for ordinal covariates.
const ORDINAL_LEVELS: u32 = 5;
/// Number of categories drawn for nominal covariates.
const NOMINAL_LEVELS: u32 = 4;

/// Generate a feature-major covariate matrix `[kinds.len(), n_samples]`.
///
/// Continuous values are uniform in `[0, 100)`, ordinal values are integers
/// in `1..=5`, nominal values are category codes in `0..4`.
pub fn random_covariates(n_samples: usize, kinds: &[VariableKind], rng: &mut impl Rng) -> Array2<f64> {
    let mut covariates = Array2::zeros((kinds.len(), n_samples));
    for (mut row, &kind) in covariates.rows_mut().into_iter().zip(kinds) {
        for x in row.iter_mut() {
            *x = match kind {
                VariableKind::Continuous => rng.r#gen::<f64>() * 100.0,
                VariableKind::Ordinal => f64::from(rng.gen_range(1..=ORDINAL_LEVELS)),
                VariableKind::Nominal => f64::from(rng.gen_range(0..NOMINAL_LEVELS)),
            };
        }
    }
    covariates
}

/// Fair coin-flip action codes.
pub fn random_actions(n_samples: usize, rng: &mut impl Rng) -> Vec<u8> {
    (0..n_samples).map(|_| u8::from(rng.gen_bool(0.5))).collect()
}

/// Random dataset with responses uniform in `[-1, 1)`.
pub fn random_dataset(n_samples: usize, kinds: &[VariableKind], seed: u64) -> ItrDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let covariates = random_covariates(n_samples, kinds, &mut rng);
    let actions = random_actions(n_samples, &mut rng);
    let responses = (0..n_samples)
        .map(|_| rng.r#gen::<f64>() * 2.0 - 1.0)
        .collect();

    ItrDataset::builder()
        .covariates(covariates)
        .kinds(kinds.to_vec())
        .actions(actions)
        .responses(responses)
        .build()
        .expect("synthetic dataset is valid")
}

/// A dataset whose best rule is known in advance.
#[derive(Debug, Clone)]
pub struct PlantedRule {
    pub dataset: ItrDataset,
    /// The planted variable/cut combination.
    pub choice: Choice,
    /// The planted direction mask.
    pub mask: usize,
    /// Brute-force normalized score of the planted rule.
    pub expected_score: f64,
    /// Samples inside the planted region.
    pub region_size: usize,
}

/// Plant a rule on continuous covariates.
///
/// Inside the rule's region the response is `+1` under action 1 and `-1`
/// under action 0; outside it is the other way round. The contrast of any
/// region `R'` is then `|R' ∩ R| - |R' \ R|`, so the planted region is the
/// unique maximizer among choices of its depth.
///
/// # Panics
///
/// Panics if `choice` refers to a variable outside `0..n_vars` or a cut the
/// generated covariate does not have.
pub fn planted_rule_dataset(
    n_samples: usize,
    n_vars: usize,
    choice: Choice,
    mask: usize,
    seed: u64,
) -> PlantedRule {
    let mut rng = StdRng::seed_from_u64(seed);
    let kinds = vec![VariableKind::Continuous; n_vars];
    let covariates = random_covariates(n_samples, &kinds, &mut rng);
    let actions = random_actions(n_samples, &mut rng);

    let depth = choice.depth();
    let sides: Vec<(VariableCuts, usize, bool)> = choice
        .dims()
        .enumerate()
        .map(|(d, (var, cut))| {
            let cuts = VariableCuts::build(VariableKind::Continuous, covariates.row(var));
            assert!(cut < cuts.n_cuts(), "variable {var} has no cut {cut}");
            let upper = mask & (1 << (depth - 1 - d)) != 0;
            (cuts, cut, upper)
        })
        .collect();

    let in_region: Vec<bool> = (0..n_samples)
        .map(|i| sides.iter().all(|(cuts, cut, upper)| cuts.mask(*cut).get(i) == *upper))
        .collect();

    let responses: Vec<f64> = in_region
        .iter()
        .zip(&actions)
        .map(|(&inside, &a)| if inside == (a == 1) { 1.0 } else { -1.0 })
        .collect();

    // Outcome of treating exactly the region
    let value: f64 = in_region
        .iter()
        .zip(&actions)
        .zip(&responses)
        .filter(|((inside, a), _)| **inside == (**a == 1))
        .map(|(_, y)| y)
        .sum();

    let dataset = ItrDataset::builder()
        .covariates(covariates)
        .kinds(kinds)
        .actions(actions)
        .responses(responses)
        .build()
        .expect("synthetic dataset is valid");

    PlantedRule {
        dataset,
        choice,
        mask,
        expected_score: value / n_samples as f64,
        region_size: in_region.iter().filter(|&&inside| inside).count(),
    }
}
