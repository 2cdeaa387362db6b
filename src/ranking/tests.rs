// Scenario tests for configuration ranking
//
// Each test builds the runs of one evaluation-budget scenario and checks
// the comparison table, win tally and best set together.

use super::*;
use crate::dataset::{Configuration, Observation};

const STRONG: [f64; 7] = [0.9, 0.8, 0.95, 0.7, 0.85, 0.6, 0.75];
const WEAK: [f64; 7] = [0.8, 0.6, 0.65, 0.3, 0.35, 0.0, 0.05];

fn problems(n: u32) -> Vec<u32> {
    (0..n).collect()
}

/// One run per problem with optimum 1.0, so normalized fitness == value
fn runs(cp: f64, mp: f64, values: &[f64]) -> Vec<Observation> {
    values
        .iter()
        .enumerate()
        .map(|(problem, &value)| Observation {
            budget: 1000,
            problem: problem as u32,
            crossover: cp,
            mutation: mp,
            fitness: value,
            optimal_value: 1.0,
            execution_time: None,
        })
        .collect()
}

/// Identical performance vectors: nothing is significant, everyone ties
#[test]
fn test_two_identical_configurations() {
    let mut observations = runs(0.5, 0.1, &[1.0, 1.0, 1.0]);
    observations.extend(runs(0.9, 0.1, &[1.0, 1.0, 1.0]));

    let ranking =
        rank_configurations(&observations, &problems(3), &RankingConfig::default()).unwrap();

    assert_eq!(ranking.comparisons.len(), 1);
    assert_eq!(ranking.comparisons[0].pvalue, 1.0);
    assert_eq!(ranking.comparisons[0].outcome, None);
    assert!(ranking.wins.iter().all(|w| w.wins == 0));
    assert_eq!(
        ranking.best,
        vec![Configuration::new(0.5, 0.1), Configuration::new(0.9, 0.1)]
    );
}

/// Three problems cannot reach p < 0.05; the mean tie-break still picks A
#[test]
fn test_small_sample_falls_back_to_mean() {
    let a = Configuration::new(0.9, 0.01);
    let b = Configuration::new(0.5, 0.1);
    let c = Configuration::new(0.7, 0.1);

    let mut observations = runs(a.crossover, a.mutation, &[0.9, 0.8, 0.95]);
    observations.extend(runs(b.crossover, b.mutation, &[0.5, 0.4, 0.45]));
    observations.extend(runs(c.crossover, c.mutation, &[0.5, 0.4, 0.45]));

    let ranking =
        rank_configurations(&observations, &problems(3), &RankingConfig::default()).unwrap();

    assert_eq!(ranking.comparisons.len(), 3);
    let b_vs_c = ranking
        .comparisons
        .iter()
        .find(|cmp| cmp.involves(&b) && cmp.involves(&c))
        .unwrap();
    assert_eq!(b_vs_c.pvalue, 1.0);
    assert_eq!(b_vs_c.statistic, None);

    assert_eq!(ranking.best, vec![a]);
}

/// A dominates two data-identical configurations on seven problems
#[test]
fn test_dominant_configuration_wins_every_pair() {
    let a = Configuration::new(0.9, 0.01);
    let b = Configuration::new(0.5, 0.1);
    let c = Configuration::new(0.7, 0.1);

    let mut observations = runs(a.crossover, a.mutation, &STRONG);
    observations.extend(runs(b.crossover, b.mutation, &WEAK));
    observations.extend(runs(c.crossover, c.mutation, &WEAK));

    let ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::default()).unwrap();

    assert_eq!(ranking.wins_of(&a), Some(2));
    assert_eq!(ranking.wins_of(&b), Some(0));
    assert_eq!(ranking.wins_of(&c), Some(0));
    assert_eq!(ranking.best, vec![a]);
    assert_eq!(ranking.significant_count(), 2);

    for comparison in ranking.comparisons.iter().filter(|cmp| cmp.involves(&a)) {
        let outcome = comparison.outcome.unwrap();
        assert_eq!(outcome.winner, a);
    }
}

/// A configuration missing problem 4 never reaches the comparison table
#[test]
fn test_partial_coverage_is_excluded() {
    let a = Configuration::new(0.9, 0.01);
    let b = Configuration::new(0.5, 0.1);
    let partial = Configuration::new(0.7, 0.1);

    let mut observations = runs(a.crossover, a.mutation, &STRONG);
    observations.extend(runs(b.crossover, b.mutation, &WEAK));
    observations.extend(
        runs(partial.crossover, partial.mutation, &STRONG)
            .into_iter()
            .filter(|o| o.problem != 4),
    );

    let ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::default()).unwrap();

    assert_eq!(ranking.comparisons.len(), 1);
    assert!(ranking.comparisons.iter().all(|cmp| !cmp.involves(&partial)));
    assert_eq!(ranking.wins_of(&partial), None);
    assert_eq!(ranking.excluded.len(), 1);
    assert_eq!(ranking.excluded[0].configuration, partial);
    assert_eq!(
        ranking.excluded[0].reason,
        ExclusionReason::MissingProblems(vec![4])
    );
}

/// Repeated runs are averaged before comparison
#[test]
fn test_repeated_runs_are_averaged() {
    let a = Configuration::new(0.9, 0.01);
    let b = Configuration::new(0.5, 0.1);

    // Two runs per problem whose mean equals STRONG / WEAK
    let mut observations = Vec::new();
    for (offset, sign) in [(0.01, 1.0), (0.01, -1.0)] {
        let shifted_strong: Vec<f64> = STRONG.iter().map(|v| v + sign * offset).collect();
        let shifted_weak: Vec<f64> = WEAK.iter().map(|v| v + 0.5 + sign * offset).collect();
        observations.extend(runs(a.crossover, a.mutation, &shifted_strong));
        observations.extend(runs(b.crossover, b.mutation, &shifted_weak));
    }

    let table = build_performance_vectors(&observations, &problems(7));
    assert_eq!(table.vectors.len(), 2);
    let strong = table
        .vectors
        .iter()
        .find(|v| v.configuration == a)
        .unwrap();
    for (mean, expected) in strong.values.iter().zip(STRONG) {
        assert!((mean - expected).abs() < 1e-12);
    }
}

/// Fewer than two comparable configurations: empty outputs, no error
#[test]
fn test_single_configuration_has_empty_outputs() {
    let observations = runs(0.9, 0.01, &STRONG);
    let ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::default()).unwrap();

    assert!(ranking.comparisons.is_empty());
    assert!(ranking.wins.is_empty());
    assert!(ranking.best.is_empty());
}

#[test]
fn test_empty_scenario() {
    let ranking = rank_configurations(&[], &problems(7), &RankingConfig::default()).unwrap();
    assert!(ranking.comparisons.is_empty());
    assert!(ranking.wins.is_empty());
    assert!(ranking.best.is_empty());
    assert!(ranking.excluded.is_empty());
}

#[test]
fn test_no_configuration_with_full_coverage() {
    let mut observations = runs(0.9, 0.01, &STRONG[..3]);
    observations.extend(runs(0.5, 0.1, &WEAK[..5]));
    let ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::default()).unwrap();

    assert!(ranking.comparisons.is_empty());
    assert!(ranking.best.is_empty());
    assert_eq!(ranking.excluded.len(), 2);
}

/// Every configuration identical: all tied-best
#[test]
fn test_all_identical_configurations_are_tied_best() {
    let configurations = [
        Configuration::new(0.5, 0.01),
        Configuration::new(0.5, 0.1),
        Configuration::new(0.9, 0.01),
        Configuration::new(0.9, 0.1),
    ];
    let observations: Vec<Observation> = configurations
        .iter()
        .flat_map(|c| runs(c.crossover, c.mutation, &STRONG))
        .collect();

    let ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::default()).unwrap();

    assert_eq!(ranking.comparisons.len(), 6);
    assert!(ranking.comparisons.iter().all(|cmp| cmp.pvalue == 1.0));
    assert!(ranking.wins.iter().all(|w| w.wins == 0));
    assert_eq!(ranking.best, configurations.to_vec());
}

/// Identical configurations near f64::MAX are still tied-best
#[test]
fn test_identical_huge_fitness_is_tied_best() {
    let x = Configuration::new(0.5, 0.1);
    let y = Configuration::new(0.9, 0.1);
    let huge = [1e308; 7];

    let mut observations = runs(x.crossover, x.mutation, &huge);
    observations.extend(runs(y.crossover, y.mutation, &huge));

    let ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::default()).unwrap();

    assert!(ranking.excluded.is_empty());
    assert_eq!(ranking.comparisons[0].pvalue, 1.0);
    assert_eq!(ranking.means.get(&x), Some(&1e308));
    assert_eq!(ranking.best, vec![x, y]);
}

/// Equal wins and equal global mean: both stay in the best set
#[test]
fn test_equal_wins_and_mean_keep_both() {
    let x = Configuration::new(0.5, 0.1);
    let y = Configuration::new(0.9, 0.1);

    let mut observations = runs(x.crossover, x.mutation, &[0.9, 0.5, 0.7]);
    observations.extend(runs(y.crossover, y.mutation, &[0.5, 0.9, 0.7]));

    let ranking =
        rank_configurations(&observations, &problems(3), &RankingConfig::default()).unwrap();

    assert_eq!(ranking.comparisons[0].outcome, None);
    assert_eq!(ranking.best, vec![x, y]);
}

/// Wins are declared only for significant comparisons
#[test]
fn test_win_tally_matches_significant_comparisons() {
    let mut observations = runs(0.9, 0.01, &STRONG);
    observations.extend(runs(0.5, 0.1, &WEAK));
    observations.extend(runs(0.7, 0.05, &[0.85, 0.75, 0.9, 0.65, 0.8, 0.55, 0.7]));

    let ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::default()).unwrap();

    let total_wins: usize = ranking.wins.iter().map(|w| w.wins).sum();
    assert_eq!(total_wins, ranking.significant_count());
    assert_eq!(ranking.best, vec![Configuration::new(0.9, 0.01)]);
}

/// Comparison rows follow configuration order (i < j)
#[test]
fn test_comparison_order() {
    let mut observations = runs(0.9, 0.1, &STRONG);
    observations.extend(runs(0.1, 0.1, &WEAK));
    observations.extend(runs(0.5, 0.1, &WEAK));

    let ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::default()).unwrap();

    let pairs: Vec<(f64, f64)> = ranking
        .comparisons
        .iter()
        .map(|cmp| (cmp.first.crossover, cmp.second.crossover))
        .collect();
    assert_eq!(pairs, vec![(0.1, 0.5), (0.1, 0.9), (0.5, 0.9)]);
}

/// Strict alpha can turn a win into a non-result
#[test]
fn test_strict_config_declares_fewer_wins() {
    let mut observations = runs(0.9, 0.01, &STRONG);
    observations.extend(runs(0.5, 0.1, &WEAK));

    let default_ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::default()).unwrap();
    let strict_ranking =
        rank_configurations(&observations, &problems(7), &RankingConfig::strict()).unwrap();

    // p = 1/64 lies between 0.01 and 0.05
    assert_eq!(default_ranking.significant_count(), 1);
    assert_eq!(strict_ranking.significant_count(), 0);
    // The mean tie-break still prefers the strong configuration
    assert_eq!(strict_ranking.best, vec![Configuration::new(0.9, 0.01)]);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = RankingConfig {
        significance_level: 2.0,
        ..RankingConfig::default()
    };
    assert!(rank_configurations(&[], &problems(7), &config).is_err());
}
