//! Aggregate fitness and execution-time statistics per configuration
//!
//! Groups the runs of one scenario by (problem, crossover, mutation) and
//! reports mean and sample standard deviation for each group.

use crate::dataset::{Configuration, Observation};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Fitness statistics of one (problem, configuration) group
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessSummary {
    pub problem: u32,
    pub configuration: Configuration,
    pub runs: usize,
    pub mean_fitness: f64,
    /// Sample standard deviation; `None` for a single run
    pub std_fitness: Option<f64>,
    pub optimal_value: Option<f64>,
}

/// Execution-time statistics of one (problem, configuration) group
#[derive(Debug, Clone, PartialEq)]
pub struct ExecTimeSummary {
    pub problem: u32,
    pub configuration: Configuration,
    pub runs: usize,
    pub mean_time: f64,
    pub std_time: Option<f64>,
}

fn group_by<F>(observations: &[Observation], value: F) -> BTreeMap<(u32, Configuration), Vec<f64>>
where
    F: Fn(&Observation) -> Option<f64>,
{
    let mut groups: BTreeMap<(u32, Configuration), Vec<f64>> = BTreeMap::new();
    for observation in observations {
        if let Some(v) = value(observation) {
            groups
                .entry((observation.problem, observation.configuration()))
                .or_default()
                .push(v);
        }
    }
    groups
}

fn sample_std_dev(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    Some(samples.std_dev()).filter(|s| s.is_finite())
}

/// Fitness mean/std per (problem, configuration), ordered by problem then
/// configuration
///
/// `optimal_values` is usually [`Dataset::optimal_values`] of the whole
/// dataset, so problems keep their optimum even in scenarios that lack it.
///
/// [`Dataset::optimal_values`]: crate::dataset::Dataset::optimal_values
pub fn summarize_fitness(
    observations: &[Observation],
    optimal_values: &BTreeMap<u32, f64>,
) -> Vec<FitnessSummary> {
    group_by(observations, |o| Some(o.fitness))
        .into_iter()
        .map(|((problem, configuration), samples)| FitnessSummary {
            problem,
            configuration,
            runs: samples.len(),
            mean_fitness: samples.as_slice().mean(),
            std_fitness: sample_std_dev(&samples),
            optimal_value: optimal_values.get(&problem).copied(),
        })
        .collect()
}

/// Execution-time mean/std per (problem, configuration)
///
/// Runs without a recorded execution time are ignored; groups with no timed
/// run are omitted.
pub fn summarize_exec_time(observations: &[Observation]) -> Vec<ExecTimeSummary> {
    group_by(observations, |o| o.execution_time)
        .into_iter()
        .map(|((problem, configuration), samples)| ExecTimeSummary {
            problem,
            configuration,
            runs: samples.len(),
            mean_time: samples.as_slice().mean(),
            std_time: sample_std_dev(&samples),
        })
        .collect()
}
