//! Per-scenario batch runs
//!
//! Each evaluation budget is processed independently: slice the dataset,
//! compute the derived tables, write them under
//! `<output_dir>/<budget>_evaluations/`.

use crate::config::ResolvedSweep;
use crate::csv_output::{
    write_comparisons, write_exec_time_summary, write_file, write_fitness_summary,
    write_win_counts,
};
use crate::dataset::Dataset;
use crate::ranking::{rank_configurations, Ranking};
use crate::summary::{summarize_exec_time, summarize_fitness};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const PVALUES_FILE: &str = "wilcoxon_pvalues.csv";
pub const WINS_FILE: &str = "stat_test_wins_count.csv";

/// Ranking of one evaluation-budget scenario
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub budget: i64,
    pub observations: usize,
    pub ranking: Ranking,
}

/// Directory holding the artifacts of one scenario
pub fn scenario_dir(output_dir: &Path, budget: i64) -> PathBuf {
    output_dir.join(format!("{}_evaluations", budget))
}

pub fn fitness_summary_file(budget: i64) -> String {
    format!("fitness_aggregated_statistics_{}_evaluations.csv", budget)
}

pub fn exec_time_summary_file(budget: i64) -> String {
    format!("exec_time_aggregated_statistics_{}_evaluations.csv", budget)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

/// Write fitness and execution-time statistics for every budget
///
/// The execution-time table is skipped for scenarios without timed runs.
/// Returns the number of files written.
pub fn summarize_scenarios(dataset: &Dataset, budgets: &[i64], output_dir: &Path) -> Result<usize> {
    let optimal_values = dataset.optimal_values();
    let mut written = 0;

    for &budget in budgets {
        let scenario = dataset.scenario(budget);
        let dir = scenario_dir(output_dir, budget);
        ensure_dir(&dir)?;

        let fitness = summarize_fitness(&scenario, &optimal_values);
        write_file(&dir.join(fitness_summary_file(budget)), |file| {
            write_fitness_summary(file, &fitness)
        })?;
        written += 1;

        let exec_time = summarize_exec_time(&scenario);
        if exec_time.is_empty() {
            tracing::debug!("No execution times recorded for budget {}", budget);
        } else {
            write_file(&dir.join(exec_time_summary_file(budget)), |file| {
                write_exec_time_summary(file, &exec_time)
            })?;
            written += 1;
        }

        tracing::info!(
            "Summarized {} runs into {} groups for budget {}",
            scenario.len(),
            fitness.len(),
            budget
        );
    }

    Ok(written)
}

/// Rank one scenario without touching the filesystem
pub fn rank_scenario(dataset: &Dataset, budget: i64, sweep: &ResolvedSweep) -> Result<ScenarioReport> {
    let scenario = dataset.scenario(budget);
    let ranking = rank_configurations(&scenario, &sweep.problems, &sweep.ranking)
        .with_context(|| format!("Failed to rank configurations for budget {}", budget))?;

    if ranking.best.is_empty() {
        tracing::warn!(
            "Budget {}: fewer than two configurations cover all {} problems",
            budget,
            sweep.problems.len()
        );
    } else {
        tracing::info!("{}", ranking.best_line(budget));
    }

    Ok(ScenarioReport {
        budget,
        observations: scenario.len(),
        ranking,
    })
}

/// Rank every budget of the sweep and write the comparison and win tables
pub fn rank_scenarios(
    dataset: &Dataset,
    sweep: &ResolvedSweep,
    output_dir: &Path,
) -> Result<Vec<ScenarioReport>> {
    let mut reports = Vec::with_capacity(sweep.budgets.len());

    for &budget in &sweep.budgets {
        let report = rank_scenario(dataset, budget, sweep)?;

        let dir = scenario_dir(output_dir, budget);
        ensure_dir(&dir)?;
        write_file(&dir.join(PVALUES_FILE), |file| {
            write_comparisons(file, &report.ranking.comparisons)
        })?;
        write_file(&dir.join(WINS_FILE), |file| {
            write_win_counts(file, &report.ranking.wins)
        })?;

        reports.push(report);
    }

    Ok(reports)
}
