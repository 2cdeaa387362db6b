// Configuration for configuration-comparison ranking
//
// Significance threshold, equality tolerance and optimization direction are
// passed into the ranker explicitly; nothing is read from module-level state.

use serde::{Deserialize, Serialize};

/// Which way fitness improves for the benchmark problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Higher normalized fitness is better (knapsack-style problems)
    #[default]
    Maximize,
    /// Lower normalized fitness is better
    Minimize,
}

impl Direction {
    /// True when `candidate` is strictly better than `other`
    pub fn is_better(self, candidate: f64, other: f64) -> bool {
        match self {
            Direction::Maximize => candidate > other,
            Direction::Minimize => candidate < other,
        }
    }

    /// The better of two values
    pub fn best_of(self, a: f64, b: f64) -> f64 {
        if self.is_better(b, a) {
            b
        } else {
            a
        }
    }
}

/// Configuration for pairwise ranking of parameter configurations
///
/// # Example
/// ```
/// use sweeprank::ranking::RankingConfig;
///
/// let config = RankingConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Statistical significance level (alpha) for the signed-rank test
    ///
    /// A pair only produces a winner when its p-value is strictly below
    /// this value.
    pub significance_level: f64,

    /// Element-wise tolerance under which two performance vectors count
    /// as identical
    ///
    /// Identical vectors skip the test and get p = 1.0. The same tolerance
    /// decides whether two global means are tied during best-set selection.
    pub tolerance: f64,

    /// Optimization direction of the benchmark problems
    pub direction: Direction,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            tolerance: 1e-14,
            direction: Direction::Maximize,
        }
    }
}

impl RankingConfig {
    /// 99% confidence: fewer declared wins
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            ..Self::default()
        }
    }

    /// 90% confidence: more declared wins
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.significance_level > 0.0 && self.significance_level <= 1.0) {
            return Err(format!(
                "significance_level must be in (0, 1], got {}",
                self.significance_level
            ));
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            ));
        }

        Ok(())
    }
}
