//! End-to-end search behavior on synthetic data.

use std::num::NonZeroUsize;

use approx::assert_relative_eq;
use rstest::rstest;

use itrsearch::search::RULE_SEPARATOR;
use itrsearch::testing::{planted_rule_dataset, random_dataset};
use itrsearch::{
    Choice, ConfigError, DatasetProvider, ItrDataset, SearchConfig, SearchEngine, SearchError,
    VariableKind,
};

const MIXED: [VariableKind; 5] = [
    VariableKind::Continuous,
    VariableKind::Ordinal,
    VariableKind::Nominal,
    VariableKind::Continuous,
    VariableKind::Nominal,
];

fn config(depth: usize, threads: usize) -> SearchConfig {
    SearchConfig::builder()
        .depth(depth)
        .maybe_n_threads(NonZeroUsize::new(threads))
        .build()
        .unwrap()
}

fn run_scores(data: &ItrDataset, depth: usize, threads: usize) -> Vec<f64> {
    let mut engine = SearchEngine::new(data, &config(depth, threads)).unwrap();
    engine.run().unwrap();
    engine.scores().to_vec()
}

// =============================================================================
// Separability
// =============================================================================

#[rstest]
#[case(Choice::new(&[1], &[4]), 0b1)]
#[case(Choice::new(&[1], &[2]), 0b0)]
#[case(Choice::new(&[0, 2], &[3, 6]), 0b10)]
#[case(Choice::new(&[0, 1, 3], &[4, 2, 5]), 0b101)]
fn planted_rule_ranks_first(#[case] planted: Choice, #[case] mask: usize) {
    let planted = planted_rule_dataset(1000, 4, planted, mask, 17);
    let depth = planted.choice.depth();

    let mut engine = SearchEngine::new(&planted.dataset, &config(depth, 0)).unwrap();
    engine.run().unwrap();
    let report = engine.report(5).unwrap();
    let best = report.best().unwrap();

    assert_eq!(engine.choices().get(best.choice_id), &planted.choice);
    assert_eq!(best.mask, planted.mask);
    assert_relative_eq!(best.score, planted.expected_score, epsilon = 1e-12);
    // The raw contrast of the planted region is its size
    assert_relative_eq!(best.raw_score, planted.region_size as f64);
}

// =============================================================================
// Thread Invariance
// =============================================================================

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn thread_count_does_not_change_scores(#[case] depth: usize) {
    let data = random_dataset(333, &MIXED, 42);
    let sequential = run_scores(&data, depth, 1);
    assert_eq!(run_scores(&data, depth, 2), sequential);
    assert_eq!(run_scores(&data, depth, 0), sequential);
    assert_eq!(run_scores(&data, depth, 64), sequential);
}

#[test]
fn thread_count_does_not_change_report() {
    let data = random_dataset(250, &MIXED, 9);
    let report = |threads| {
        let mut engine = SearchEngine::new(&data, &config(2, threads)).unwrap();
        engine.run().unwrap();
        engine.report(20).unwrap().to_string()
    };
    assert_eq!(report(1), report(4));
}

// =============================================================================
// Scores Against Brute Force
// =============================================================================

#[test]
fn depth_one_scores_match_brute_force() {
    let data = random_dataset(97, &MIXED, 5);
    let scores = run_scores(&data, 1, 1);

    let mut index = 0;
    for var in 0..data.n_vars() {
        for cut in 0..data.n_cuts(var) {
            for mask in 0..2 {
                let upper = mask == 1;
                let expected: f64 = (0..data.n_samples())
                    .filter(|&i| data.membership(var, cut, i) == upper)
                    .map(|i| {
                        let y = data.response(i);
                        if data.action(i) == 1 { y } else { -y }
                    })
                    .sum();
                assert_relative_eq!(scores[index], expected, epsilon = 1e-9);
                index += 1;
            }
        }
    }
    assert_eq!(index, scores.len());
}

#[test]
fn mask_scores_sum_to_total_contrast() {
    // Every sample lands in exactly one mask region of a choice
    let data = random_dataset(120, &MIXED, 23);
    let total: f64 = (0..data.n_samples())
        .map(|i| if data.action(i) == 1 { data.response(i) } else { -data.response(i) })
        .sum();

    for depth in 1..=3 {
        let scores = run_scores(&data, depth, 2);
        for block in scores.chunks_exact(1 << depth) {
            assert_relative_eq!(block.iter().sum::<f64>(), total, epsilon = 1e-9);
        }
    }
}

// =============================================================================
// Reporting
// =============================================================================

#[test]
fn depth_two_rendering() {
    let data = random_dataset(200, &MIXED, 1);
    let mut engine = SearchEngine::new(&data, &config(2, 1)).unwrap();
    engine.run().unwrap();

    let report = engine.report(engine.scores().len()).unwrap();
    assert_eq!(report.len(), engine.scores().len());
    for rule in &report {
        assert_eq!(rule.rule.matches(RULE_SEPARATOR).count(), 1, "{}", rule.rule);
        assert!(!rule.rule.ends_with(RULE_SEPARATOR));
        assert!(rule.to_string().starts_with("Score = "));
    }

    // Best first
    let scores: Vec<f64> = report.iter().map(|r| r.raw_score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn normalized_score_uses_baseline() {
    let data = random_dataset(150, &MIXED, 8);
    let mut engine = SearchEngine::new(&data, &config(1, 1)).unwrap();
    engine.run().unwrap();

    for rule in &engine.report(10).unwrap() {
        let expected = (data.baseline() + rule.raw_score) / data.n_samples() as f64;
        assert_relative_eq!(rule.score, expected);
    }
}

#[test]
fn top_k_is_capped_to_table() {
    let data = random_dataset(40, &[VariableKind::Ordinal], 2);
    let mut engine = SearchEngine::new(&data, &config(1, 1)).unwrap();
    engine.run().unwrap();
    let report = engine.report(1000).unwrap();
    assert_eq!(report.len(), engine.scores().len());
}

// =============================================================================
// Lifecycle And Degenerate Inputs
// =============================================================================

#[test]
fn report_requires_run() {
    let data = random_dataset(30, &MIXED, 3);
    let engine = SearchEngine::new(&data, &config(2, 1)).unwrap();
    assert!(matches!(engine.report(1), Err(SearchError::NotRun)));
    assert!(matches!(engine.report_top(), Err(SearchError::NotRun)));
}

#[test]
fn second_run_is_rejected() {
    let data = random_dataset(30, &MIXED, 3);
    let mut engine = SearchEngine::new(&data, &config(1, 2)).unwrap();
    let first = engine.run().unwrap();
    assert!(matches!(engine.run(), Err(SearchError::AlreadyRun)));
    assert_eq!(engine.summary(), Some(first));
}

#[rstest]
#[case(0)]
#[case(4)]
fn unsupported_depth_is_rejected(#[case] depth: usize) {
    assert_eq!(
        SearchConfig::builder().depth(depth).build().unwrap_err(),
        ConfigError::UnsupportedDepth(depth)
    );
}

#[test]
fn fewer_variables_than_depth_gives_empty_report() {
    let data = random_dataset(50, &[VariableKind::Continuous, VariableKind::Nominal], 4);
    let mut engine = SearchEngine::new(&data, &config(3, 2)).unwrap();
    let summary = engine.run().unwrap();

    assert_eq!(summary.n_choices, 0);
    assert!(engine.scores().is_empty());
    assert!(engine.report(10).unwrap().is_empty());
}

#[test]
fn constant_covariates_have_no_cuts() {
    let data = ItrDataset::builder()
        .covariates(ndarray::array![[1.0, 1.0, 1.0], [2.0, 2.0, 2.0]])
        .kinds(vec![VariableKind::Continuous, VariableKind::Nominal])
        .actions(vec![0, 1, 0])
        .responses(vec![1.0, 2.0, 3.0])
        .build()
        .unwrap();
    let mut engine = SearchEngine::new(&data, &config(1, 1)).unwrap();
    engine.run().unwrap();
    assert!(engine.report(5).unwrap().is_empty());
}
