// All-pairs tournament between parameter configurations
//
// This module integrates:
// - Performance vectors (normalization + coverage filter)
// - Paired signed-rank tests with a near-equality pre-check
// - Win tallying and best-configuration selection with a mean tie-break
//
// to produce the ranking of one evaluation-budget scenario.

use crate::dataset::{Configuration, Observation};
use crate::ranking::config::RankingConfig;
use crate::ranking::performance::{build_performance_vectors, Exclusion, PerformanceVector};
use crate::ranking::wilcoxon::wilcoxon_signed_rank;
use anyhow::{Context, Result};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Winner and loser of a significant pairwise comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Configuration,
    pub loser: Configuration,
}

/// One row of the pairwise comparison table
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseComparison {
    pub first: Configuration,
    pub second: Configuration,

    /// Test statistic; `None` when identical vectors skipped the test
    pub statistic: Option<f64>,

    pub pvalue: f64,

    /// `None` when the difference is not significant
    pub outcome: Option<Outcome>,
}

impl PairwiseComparison {
    pub fn involves(&self, configuration: &Configuration) -> bool {
        self.first == *configuration || self.second == *configuration
    }
}

/// Number of pairwise comparisons won by a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinCount {
    pub configuration: Configuration,
    pub wins: usize,
}

/// Ranking of the configurations of one scenario
#[derive(Debug, Clone)]
pub struct Ranking {
    /// Pairs (i < j) in configuration order
    pub comparisons: Vec<PairwiseComparison>,

    /// Every compared configuration, zeros included, in configuration order
    pub wins: Vec<WinCount>,

    /// Configurations with the most wins, tie-broken by global mean
    pub best: Vec<Configuration>,

    /// Configurations dropped by the coverage filter
    pub excluded: Vec<Exclusion>,

    /// Global mean normalized fitness of every compared configuration
    pub means: BTreeMap<Configuration, f64>,

    /// Configuration used for the ranking
    pub config: RankingConfig,
}

impl Ranking {
    pub fn wins_of(&self, configuration: &Configuration) -> Option<usize> {
        self.wins
            .iter()
            .find(|w| w.configuration == *configuration)
            .map(|w| w.wins)
    }

    pub fn significant_count(&self) -> usize {
        self.comparisons
            .iter()
            .filter(|c| c.pvalue < self.config.significance_level)
            .count()
    }

    /// One-line summary of the best configuration(s)
    pub fn best_line(&self, budget: i64) -> String {
        if self.best.is_empty() {
            return format!(
                "For evaluations={}, no best combination (fewer than two comparable configurations)",
                budget
            );
        }
        let best = self
            .best
            .iter()
            .map(|c| {
                format!(
                    "{} wins={} mean={:.4}",
                    c,
                    self.wins_of(c).unwrap_or(0),
                    self.means.get(c).copied().unwrap_or(f64::NAN)
                )
            })
            .join(", ");
        format!(
            "For evaluations={}, best combination(s) based on wins: {}",
            budget, best
        )
    }

    /// Generate human-readable report
    pub fn to_report_string(&self, budget: i64) -> String {
        let mut report = String::new();

        report.push_str(&format!("=== Evaluations: {} ===\n", budget));
        report.push_str(&format!(
            "Configurations compared: {} (excluded: {})\n",
            self.wins.len(),
            self.excluded.len()
        ));
        report.push_str(&format!(
            "Pairwise tests: {} ({} significant at alpha={})\n",
            self.comparisons.len(),
            self.significant_count(),
            self.config.significance_level
        ));

        if !self.excluded.is_empty() {
            report.push_str("\nExcluded configurations:\n");
            for exclusion in &self.excluded {
                report.push_str(&format!(
                    "  - {}: {}\n",
                    exclusion.configuration, exclusion.reason
                ));
            }
        }

        if !self.wins.is_empty() {
            report.push_str("\nWins:\n");
            let mut by_wins = self.wins.clone();
            by_wins.sort_by(|a, b| b.wins.cmp(&a.wins).then(a.configuration.cmp(&b.configuration)));
            for count in by_wins {
                report.push_str(&format!("  {} {}\n", count.configuration, count.wins));
            }
        }

        report.push('\n');
        report.push_str(&self.best_line(budget));
        report.push('\n');
        report
    }
}

/// Compare two performance vectors
///
/// Vectors equal within `config.tolerance` skip the test and get p = 1.0
/// with no statistic. A winner is declared only when p < alpha and the
/// global means differ; the better mean (per `config.direction`) wins.
pub fn compare_pair(
    first: &PerformanceVector,
    second: &PerformanceVector,
    config: &RankingConfig,
) -> Result<PairwiseComparison> {
    if first.approx_eq(second, config.tolerance) {
        tracing::trace!(
            "{} and {} are identical within {}",
            first.configuration,
            second.configuration,
            config.tolerance
        );
        return Ok(PairwiseComparison {
            first: first.configuration,
            second: second.configuration,
            statistic: None,
            pvalue: 1.0,
            outcome: None,
        });
    }

    let test = wilcoxon_signed_rank(&first.values, &second.values).with_context(|| {
        format!(
            "Signed-rank test failed for {} vs {}",
            first.configuration, second.configuration
        )
    })?;

    let (first_mean, second_mean) = (first.mean(), second.mean());
    let outcome = if test.pvalue < config.significance_level {
        if config.direction.is_better(first_mean, second_mean) {
            Some(Outcome {
                winner: first.configuration,
                loser: second.configuration,
            })
        } else if config.direction.is_better(second_mean, first_mean) {
            Some(Outcome {
                winner: second.configuration,
                loser: first.configuration,
            })
        } else {
            None
        }
    } else {
        None
    };

    Ok(PairwiseComparison {
        first: first.configuration,
        second: second.configuration,
        statistic: Some(test.statistic),
        pvalue: test.pvalue,
        outcome,
    })
}

/// Rank the configurations of one evaluation-budget scenario
///
/// # Arguments
/// * `observations` - Runs of a single scenario
/// * `problems` - Canonical problem set every configuration must cover
/// * `config` - Significance level, tolerance and direction
///
/// # Example
/// ```
/// use sweeprank::dataset::Observation;
/// use sweeprank::ranking::{rank_configurations, RankingConfig};
///
/// let runs: Vec<Observation> = (0..3)
///     .flat_map(|problem| {
///         [0.5, 0.9].into_iter().map(move |cp| Observation {
///             budget: 1000,
///             problem,
///             crossover: cp,
///             mutation: 0.01,
///             fitness: 10.0,
///             optimal_value: 10.0,
///             execution_time: None,
///         })
///     })
///     .collect();
///
/// let ranking = rank_configurations(&runs, &[0, 1, 2], &RankingConfig::default()).unwrap();
/// assert_eq!(ranking.comparisons[0].pvalue, 1.0);
/// assert_eq!(ranking.best.len(), 2);
/// ```
pub fn rank_configurations(
    observations: &[Observation],
    problems: &[u32],
    config: &RankingConfig,
) -> Result<Ranking> {
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let table = build_performance_vectors(observations, problems);
    let vectors = table.vectors;

    let mut comparisons = Vec::new();
    for (first, second) in vectors.iter().tuple_combinations() {
        comparisons.push(compare_pair(first, second, config)?);
    }

    let means: BTreeMap<Configuration, f64> = vectors
        .iter()
        .map(|v| (v.configuration, v.mean()))
        .collect();

    let wins = tally_wins(&vectors, &comparisons);
    let best = select_best(&wins, &means, config);

    Ok(Ranking {
        comparisons,
        wins,
        best,
        excluded: table.excluded,
        means,
        config: config.clone(),
    })
}

/// Count wins per configuration; empty when fewer than two were compared
fn tally_wins(vectors: &[PerformanceVector], comparisons: &[PairwiseComparison]) -> Vec<WinCount> {
    if vectors.len() < 2 {
        return Vec::new();
    }

    let mut tally: BTreeMap<Configuration, usize> =
        vectors.iter().map(|v| (v.configuration, 0)).collect();
    for outcome in comparisons.iter().filter_map(|c| c.outcome) {
        *tally.entry(outcome.winner).or_insert(0) += 1;
    }

    tally
        .into_iter()
        .map(|(configuration, wins)| WinCount {
            configuration,
            wins,
        })
        .collect()
}

/// Entries achieving the maximum win count
pub fn most_wins(wins: &[WinCount]) -> Vec<WinCount> {
    let Some(max) = wins.iter().map(|w| w.wins).max() else {
        return Vec::new();
    };
    wins.iter().filter(|w| w.wins == max).copied().collect()
}

fn select_best(
    wins: &[WinCount],
    means: &BTreeMap<Configuration, f64>,
    config: &RankingConfig,
) -> Vec<Configuration> {
    let leaders: Vec<Configuration> = most_wins(wins).into_iter().map(|w| w.configuration).collect();
    if leaders.len() < 2 {
        return leaders;
    }

    let mean_of = |c: &Configuration| means.get(c).copied().unwrap_or(f64::NAN);
    let Some(best_mean) = leaders
        .iter()
        .map(mean_of)
        .reduce(|a, b| config.direction.best_of(a, b))
    else {
        return leaders;
    };

    leaders
        .into_iter()
        .filter(|c| {
            let mean = mean_of(c);
            mean == best_mean || (mean - best_mean).abs() <= config.tolerance
        })
        .collect()
}
