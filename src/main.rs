use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use sweeprank::cli::{BestArgs, Cli, Command, DatasetArgs, OutputFormat, RankArgs};
use sweeprank::config::{ResolvedSweep, SweepConfig};
use sweeprank::csv_output::read_win_counts;
use sweeprank::dataset::Dataset;
use sweeprank::json_output::JsonScenarioReport;
use sweeprank::pipeline::{rank_scenarios, summarize_scenarios};
use sweeprank::ranking::most_wins;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise RUST_LOG
/// applies with a default of `warn`
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_dataset(args: &DatasetArgs) -> Result<Dataset> {
    Dataset::from_path(&args.input)
        .with_context(|| format!("Failed to load results from {}", args.input.display()))
}

fn run_summary(args: &DatasetArgs, dataset: &Dataset, budgets: &[i64]) -> Result<()> {
    let written = summarize_scenarios(dataset, budgets, &args.output_dir)?;
    println!(
        "Wrote {} summary tables for {} budget(s) to {}",
        written,
        budgets.len(),
        args.output_dir.display()
    );
    Ok(())
}

/// Sweep configuration file with command-line overrides, resolved against
/// the dataset
fn resolve_sweep(args: &RankArgs, dataset: &Dataset) -> Result<ResolvedSweep> {
    let file_config = match &args.config {
        Some(path) => SweepConfig::from_file(path)?,
        None => SweepConfig::default(),
    };
    args.apply_overrides(file_config).resolve(dataset)
}

fn run_rank(args: &RankArgs, dataset: &Dataset, sweep: &ResolvedSweep) -> Result<()> {
    let reports = rank_scenarios(dataset, sweep, &args.dataset.output_dir)?;

    match args.format {
        OutputFormat::Text => {
            for report in &reports {
                println!("{}", report.ranking.to_report_string(report.budget));
            }
        }
        OutputFormat::Json => {
            let json: Vec<JsonScenarioReport> = reports
                .iter()
                .map(|r| JsonScenarioReport::new(r.budget, r.observations, &r.ranking))
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

fn run_best(args: &BestArgs) -> Result<()> {
    let file = File::open(&args.wins)
        .with_context(|| format!("Failed to open {}", args.wins.display()))?;
    let wins = read_win_counts(file)?;
    let best = most_wins(&wins);

    if best.is_empty() {
        println!("No configurations in {}", args.wins.display());
    } else {
        println!("Best combination(s) based on wins:");
        for count in best {
            println!("  {} wins={}", count.configuration, count.wins);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    match &args.command {
        Command::Summary(dataset_args) => {
            let dataset = load_dataset(dataset_args)?;
            let budgets = dataset_args
                .budgets
                .clone()
                .unwrap_or_else(|| dataset.budgets());
            run_summary(dataset_args, &dataset, &budgets)?;
        }
        Command::Rank(rank_args) => {
            let dataset = load_dataset(&rank_args.dataset)?;
            let sweep = resolve_sweep(rank_args, &dataset)?;
            run_rank(rank_args, &dataset, &sweep)?;
        }
        Command::Best(best_args) => {
            run_best(best_args)?;
        }
        Command::All(rank_args) => {
            let dataset = load_dataset(&rank_args.dataset)?;
            let sweep = resolve_sweep(rank_args, &dataset)?;
            run_summary(&rank_args.dataset, &dataset, &sweep.budgets)?;
            run_rank(rank_args, &dataset, &sweep)?;
        }
    }

    Ok(())
}
