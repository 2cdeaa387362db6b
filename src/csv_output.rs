//! CSV artifacts for external plotting and reporting
//!
//! Column names match what the downstream plotting scripts read:
//! - pairwise comparisons: `config1_cp, config1_mp, config2_cp, config2_mp,
//!   p-value, stat, winner_cp, winner_mp, loser_cp, loser_mp`
//! - win counts: `cp, mp, wins`
//! - aggregate fitness / execution-time statistics per problem
//!
//! Every table starts with its header row, even when it has no rows.

use crate::dataset::Configuration;
use crate::ranking::{PairwiseComparison, WinCount};
use crate::summary::{ExecTimeSummary, FitnessSummary};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const COMPARISON_HEADER: [&str; 10] = [
    "config1_cp",
    "config1_mp",
    "config2_cp",
    "config2_mp",
    "p-value",
    "stat",
    "winner_cp",
    "winner_mp",
    "loser_cp",
    "loser_mp",
];

pub const WIN_COUNT_HEADER: [&str; 3] = ["cp", "mp", "wins"];

pub const FITNESS_SUMMARY_HEADER: [&str; 6] = [
    "problemIndex",
    "crossoverProbability",
    "mutationProbability",
    "mean_fitness",
    "std_fitness",
    "problem.optimalValue",
];

pub const EXEC_TIME_SUMMARY_HEADER: [&str; 5] = [
    "problemIndex",
    "crossoverProbability",
    "mutationProbability",
    "mean_time",
    "std_time",
];

#[derive(Debug, Serialize)]
struct ComparisonRow {
    config1_cp: f64,
    config1_mp: f64,
    config2_cp: f64,
    config2_mp: f64,
    pvalue: f64,
    stat: Option<f64>,
    winner_cp: Option<f64>,
    winner_mp: Option<f64>,
    loser_cp: Option<f64>,
    loser_mp: Option<f64>,
}

impl From<&PairwiseComparison> for ComparisonRow {
    fn from(comparison: &PairwiseComparison) -> Self {
        let winner = comparison.outcome.map(|o| o.winner);
        let loser = comparison.outcome.map(|o| o.loser);
        Self {
            config1_cp: comparison.first.crossover,
            config1_mp: comparison.first.mutation,
            config2_cp: comparison.second.crossover,
            config2_mp: comparison.second.mutation,
            pvalue: comparison.pvalue,
            stat: comparison.statistic,
            winner_cp: winner.map(|c| c.crossover),
            winner_mp: winner.map(|c| c.mutation),
            loser_cp: loser.map(|c| c.crossover),
            loser_mp: loser.map(|c| c.mutation),
        }
    }
}

/// One row of the win-count table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinCountRow {
    pub cp: f64,
    pub mp: f64,
    pub wins: usize,
}

impl From<&WinCount> for WinCountRow {
    fn from(count: &WinCount) -> Self {
        Self {
            cp: count.configuration.crossover,
            mp: count.configuration.mutation,
            wins: count.wins,
        }
    }
}

impl From<WinCountRow> for WinCount {
    fn from(row: WinCountRow) -> Self {
        Self {
            configuration: Configuration::new(row.cp, row.mp),
            wins: row.wins,
        }
    }
}

#[derive(Debug, Serialize)]
struct FitnessSummaryRow {
    problem: u32,
    cp: f64,
    mp: f64,
    mean_fitness: f64,
    std_fitness: Option<f64>,
    optimal_value: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ExecTimeSummaryRow {
    problem: u32,
    cp: f64,
    mp: f64,
    mean_time: f64,
    std_time: Option<f64>,
}

/// Write a header row followed by serialized rows
fn write_table<W, T, I>(writer: W, header: &[&str], rows: I) -> Result<()>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer
        .write_record(header)
        .context("Failed to write CSV header")?;
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn write_comparisons<W: Write>(writer: W, comparisons: &[PairwiseComparison]) -> Result<()> {
    write_table(
        writer,
        &COMPARISON_HEADER,
        comparisons.iter().map(ComparisonRow::from),
    )
}

pub fn write_win_counts<W: Write>(writer: W, wins: &[WinCount]) -> Result<()> {
    write_table(writer, &WIN_COUNT_HEADER, wins.iter().map(WinCountRow::from))
}

pub fn write_fitness_summary<W: Write>(writer: W, summary: &[FitnessSummary]) -> Result<()> {
    write_table(
        writer,
        &FITNESS_SUMMARY_HEADER,
        summary.iter().map(|s| FitnessSummaryRow {
            problem: s.problem,
            cp: s.configuration.crossover,
            mp: s.configuration.mutation,
            mean_fitness: s.mean_fitness,
            std_fitness: s.std_fitness,
            optimal_value: s.optimal_value,
        }),
    )
}

pub fn write_exec_time_summary<W: Write>(writer: W, summary: &[ExecTimeSummary]) -> Result<()> {
    write_table(
        writer,
        &EXEC_TIME_SUMMARY_HEADER,
        summary.iter().map(|s| ExecTimeSummaryRow {
            problem: s.problem,
            cp: s.configuration.crossover,
            mp: s.configuration.mutation,
            mean_time: s.mean_time,
            std_time: s.std_time,
        }),
    )
}

/// Create `path` and hand it to one of the table writers
pub fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<()>,
{
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write(file).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Read a `cp, mp, wins` table
pub fn read_win_counts<R: Read>(reader: R) -> Result<Vec<WinCount>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader
        .deserialize::<WinCountRow>()
        .map(|row| row.map(WinCount::from).context("Malformed win-count row"))
        .collect()
}
