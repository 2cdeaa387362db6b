//! sweeprank - statistical ranking of genetic-algorithm parameter sweeps
//!
//! This library post-processes the results of a parameter sweep over
//! crossover and mutation probabilities: it aggregates repeated-run fitness
//! and execution time, runs pairwise Wilcoxon signed-rank tests between
//! configurations, tallies wins and selects the best configuration per
//! evaluation budget.

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod dataset;
pub mod json_output;
pub mod pipeline;
pub mod ranking;
pub mod summary;
