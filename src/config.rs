//! Sweep configuration (sweeprank.toml)
//!
//! Names the evaluation budgets to analyse, the canonical problem set every
//! configuration must cover, and the ranking options. Anything left out is
//! derived from the dataset.
//!
//! # Example sweeprank.toml
//!
//! ```toml
//! budgets = [-1, 1000, 10000]
//! problems = [0, 1, 2, 3, 4, 5, 6]
//!
//! [ranking]
//! significance_level = 0.05
//! tolerance = 1e-14
//! direction = "maximize"
//! ```

use crate::dataset::Dataset;
use crate::ranking::RankingConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration for sweeprank.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Evaluation budgets to analyse; all budgets in the dataset when absent
    #[serde(default)]
    pub budgets: Option<Vec<i64>>,

    /// Canonical problem set; all problems in the dataset when absent
    #[serde(default)]
    pub problems: Option<Vec<u32>>,

    #[serde(default)]
    pub ranking: RankingConfig,
}

/// Sweep configuration with every default filled in from a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSweep {
    pub budgets: Vec<i64>,
    pub problems: Vec<u32>,
    pub ranking: RankingConfig,
}

impl SweepConfig {
    /// Load a sweep configuration from a TOML file
    ///
    /// ```no_run
    /// use sweeprank::config::SweepConfig;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = SweepConfig::from_file("sweeprank.toml")?;
    /// println!("alpha = {}", config.ranking.significance_level);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Fill in budgets and problems from the dataset and validate
    pub fn resolve(&self, dataset: &Dataset) -> Result<ResolvedSweep> {
        self.ranking
            .validate()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid ranking configuration")?;

        let budgets = self.budgets.clone().unwrap_or_else(|| dataset.budgets());
        let mut problems = self
            .problems
            .clone()
            .unwrap_or_else(|| dataset.problem_indices());
        problems.sort_unstable();
        problems.dedup();

        Ok(ResolvedSweep {
            budgets,
            problems,
            ranking: self.ranking.clone(),
        })
    }
}
