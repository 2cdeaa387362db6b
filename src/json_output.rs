//! JSON output format for ranking reports
//!
//! `rank --format json` prints an array with one [`JsonScenarioReport`] per
//! evaluation budget.

use crate::dataset::Configuration;
use crate::ranking::{PairwiseComparison, Ranking};
use serde::{Deserialize, Serialize};

/// A configuration as it appears in JSON reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsonConfiguration {
    pub cp: f64,
    pub mp: f64,
}

impl From<Configuration> for JsonConfiguration {
    fn from(configuration: Configuration) -> Self {
        Self {
            cp: configuration.crossover,
            mp: configuration.mutation,
        }
    }
}

/// One pairwise comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonComparison {
    pub config1: JsonConfiguration,
    pub config2: JsonConfiguration,
    pub pvalue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<JsonConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loser: Option<JsonConfiguration>,
}

impl From<&PairwiseComparison> for JsonComparison {
    fn from(comparison: &PairwiseComparison) -> Self {
        Self {
            config1: comparison.first.into(),
            config2: comparison.second.into(),
            pvalue: comparison.pvalue,
            statistic: comparison.statistic,
            winner: comparison.outcome.map(|o| o.winner.into()),
            loser: comparison.outcome.map(|o| o.loser.into()),
        }
    }
}

/// Win count and global mean of a compared configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWinCount {
    #[serde(flatten)]
    pub configuration: JsonConfiguration,
    pub wins: usize,
    pub mean_normalized_fitness: f64,
}

/// A configuration left out by the coverage filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonExclusion {
    #[serde(flatten)]
    pub configuration: JsonConfiguration,
    pub reason: String,
}

/// Ranking of one evaluation-budget scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonScenarioReport {
    pub budget: i64,
    pub observations: usize,
    pub significance_level: f64,
    pub comparisons: Vec<JsonComparison>,
    pub wins: Vec<JsonWinCount>,
    pub best: Vec<JsonConfiguration>,
    pub excluded: Vec<JsonExclusion>,
}

impl JsonScenarioReport {
    pub fn new(budget: i64, observations: usize, ranking: &Ranking) -> Self {
        Self {
            budget,
            observations,
            significance_level: ranking.config.significance_level,
            comparisons: ranking.comparisons.iter().map(JsonComparison::from).collect(),
            wins: ranking
                .wins
                .iter()
                .map(|w| JsonWinCount {
                    configuration: w.configuration.into(),
                    wins: w.wins,
                    mean_normalized_fitness: ranking
                        .means
                        .get(&w.configuration)
                        .copied()
                        .unwrap_or(f64::NAN),
                })
                .collect(),
            best: ranking.best.iter().map(|&c| c.into()).collect(),
            excluded: ranking
                .excluded
                .iter()
                .map(|e| JsonExclusion {
                    configuration: e.configuration.into(),
                    reason: e.reason.to_string(),
                })
                .collect(),
        }
    }
}
