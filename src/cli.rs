//! CLI argument parsing for sweeprank

use crate::config::SweepConfig;
use crate::ranking::Direction;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for ranking reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sweeprank")]
#[command(version)]
#[command(about = "Rank genetic-algorithm parameter configurations with paired significance tests", long_about = None)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write per-problem fitness and execution-time statistics
    Summary(DatasetArgs),
    /// Compare configurations pairwise and select the best per budget
    Rank(RankArgs),
    /// Report the configurations with most wins from a win-count table
    Best(BestArgs),
    /// Run `summary` and `rank` with the same arguments
    All(RankArgs),
}

/// Input dataset, output directory and budget selection
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Raw results table (.csv, .jsonl or .ndjson)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Directory receiving `<budget>_evaluations/` subdirectories
    #[arg(short, long, value_name = "DIR", default_value = "analysis")]
    pub output_dir: PathBuf,

    /// Evaluation budgets to analyse, comma separated (default: all in dataset)
    #[arg(
        short,
        long,
        value_name = "BUDGETS",
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub budgets: Option<Vec<i64>>,
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Sweep configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Canonical problem indices, comma separated (default: all in dataset)
    #[arg(short, long, value_name = "PROBLEMS", value_delimiter = ',')]
    pub problems: Option<Vec<u32>>,

    /// Significance level for the pairwise tests
    #[arg(short, long, value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Treat lower normalized fitness as better
    #[arg(long)]
    pub minimize: bool,

    /// Report format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl RankArgs {
    /// Apply command-line overrides on top of a configuration file
    pub fn apply_overrides(&self, mut config: SweepConfig) -> SweepConfig {
        if let Some(budgets) = &self.dataset.budgets {
            config.budgets = Some(budgets.clone());
        }
        if let Some(problems) = &self.problems {
            config.problems = Some(problems.clone());
        }
        if let Some(alpha) = self.alpha {
            config.ranking.significance_level = alpha;
        }
        if self.minimize {
            config.ranking.direction = Direction::Minimize;
        }
        config
    }
}

#[derive(Args, Debug, Clone)]
pub struct BestArgs {
    /// Win-count table with columns cp, mp, wins
    #[arg(short, long, value_name = "FILE")]
    pub wins: PathBuf,
}
