// Performance vectors: per-configuration mean normalized fitness per problem
//
// Observations are normalized by their problem optimum, reduced to the mean
// per (configuration, problem), and kept only when the configuration covers
// exactly the canonical problem set.

use crate::dataset::{Configuration, Observation};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Mean normalized fitness of one configuration, one value per canonical
/// problem in ascending problem order
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceVector {
    pub configuration: Configuration,
    pub values: Vec<f64>,
}

impl PerformanceVector {
    /// Global mean normalized fitness across all problems
    pub fn mean(&self) -> f64 {
        self.values.iter().mean()
    }

    /// True when every paired element differs by at most `tolerance`
    pub fn approx_eq(&self, other: &PerformanceVector, tolerance: f64) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a == b || (a - b).abs() <= tolerance)
    }
}

/// Why a configuration was left out of the comparison
#[derive(Debug, Clone, PartialEq)]
pub enum ExclusionReason {
    /// Canonical problems with no runs
    MissingProblems(Vec<u32>),
    /// Problems outside the canonical set
    UnexpectedProblems(Vec<u32>),
    /// Problem whose mean normalized fitness is NaN or infinite
    NonFiniteValue(u32),
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::MissingProblems(problems) => {
                write!(f, "missing problems {:?}", problems)
            }
            ExclusionReason::UnexpectedProblems(problems) => {
                write!(f, "unexpected problems {:?}", problems)
            }
            ExclusionReason::NonFiniteValue(problem) => {
                write!(f, "non-finite normalized fitness for problem {}", problem)
            }
        }
    }
}

/// A configuration dropped by the coverage filter
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub configuration: Configuration,
    pub reason: ExclusionReason,
}

/// Performance vectors that passed the coverage filter, plus the exclusions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceTable {
    /// Ordered by configuration (cp, then mp)
    pub vectors: Vec<PerformanceVector>,
    pub excluded: Vec<Exclusion>,
}

/// Normalize, aggregate and coverage-filter the runs of one scenario
///
/// # Arguments
/// * `observations` - Runs of a single evaluation-budget scenario
/// * `problems` - Canonical problem set; order and duplicates are irrelevant
///
/// Configurations whose problem set differs from the canonical set are
/// excluded, never reported as errors.
pub fn build_performance_vectors(
    observations: &[Observation],
    problems: &[u32],
) -> PerformanceTable {
    let canonical: BTreeSet<u32> = problems.iter().copied().collect();

    // configuration -> problem -> normalized runs
    let mut runs: BTreeMap<Configuration, BTreeMap<u32, Vec<f64>>> = BTreeMap::new();
    for observation in observations {
        runs.entry(observation.configuration())
            .or_default()
            .entry(observation.problem)
            .or_default()
            .push(observation.normalized_fitness());
    }

    let mut table = PerformanceTable::default();
    for (configuration, per_problem) in runs {
        match coverage_vector(&per_problem, &canonical) {
            Ok(values) => table.vectors.push(PerformanceVector {
                configuration,
                values,
            }),
            Err(reason) => {
                tracing::debug!("Excluding {}: {}", configuration, reason);
                table.excluded.push(Exclusion {
                    configuration,
                    reason,
                });
            }
        }
    }

    table
}

fn coverage_vector(
    per_problem: &BTreeMap<u32, Vec<f64>>,
    canonical: &BTreeSet<u32>,
) -> Result<Vec<f64>, ExclusionReason> {
    let missing: Vec<u32> = canonical
        .iter()
        .filter(|p| !per_problem.contains_key(p))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(ExclusionReason::MissingProblems(missing));
    }

    let unexpected: Vec<u32> = per_problem
        .keys()
        .filter(|p| !canonical.contains(p))
        .copied()
        .collect();
    if !unexpected.is_empty() {
        return Err(ExclusionReason::UnexpectedProblems(unexpected));
    }

    per_problem
        .iter()
        .map(|(&problem, samples)| {
            let mean = samples.iter().mean();
            if mean.is_finite() {
                Ok(mean)
            } else {
                Err(ExclusionReason::NonFiniteValue(problem))
            }
        })
        .collect()
}
