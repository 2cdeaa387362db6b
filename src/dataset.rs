//! Raw results of a genetic-algorithm parameter sweep
//!
//! One [`Observation`] per algorithm run, as produced by the experiment
//! runner. Runs are loaded once into an immutable [`Dataset`] and sliced
//! into evaluation-budget scenarios.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a results table
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported dataset format: {0} (expected .csv, .jsonl or .ndjson)")]
    UnsupportedFormat(String),

    #[error("Malformed CSV record: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed JSON record on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, DatasetError>;

/// A (crossover probability, mutation probability) pair under test
///
/// Probabilities are compared bit-for-bit (`f64::total_cmp`), so two
/// configurations are equal exactly when the runner wrote the same values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Configuration {
    pub crossover: f64,
    pub mutation: f64,
}

impl Configuration {
    pub fn new(crossover: f64, mutation: f64) -> Self {
        Self {
            crossover,
            mutation,
        }
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Configuration {}

impl PartialOrd for Configuration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Configuration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.crossover
            .total_cmp(&other.crossover)
            .then_with(|| self.mutation.total_cmp(&other.mutation))
    }
}

impl Hash for Configuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.crossover.to_bits().hash(state);
        self.mutation.to_bits().hash(state);
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(cp={}, mp={})", self.crossover, self.mutation)
    }
}

/// One experimental run
///
/// Field names follow the column names written by the experiment runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Function-evaluation limit of the run (`-1` means "until optimum")
    #[serde(rename = "functionEvaluations")]
    pub budget: i64,

    #[serde(rename = "problemIndex")]
    pub problem: u32,

    #[serde(rename = "crossoverProbability")]
    pub crossover: f64,

    #[serde(rename = "mutationProbability")]
    pub mutation: f64,

    /// Fitness of the best individual found
    #[serde(rename = "bestIndividual.fitness")]
    pub fitness: f64,

    /// Known optimum of the problem instance
    #[serde(rename = "problem.optimalValue")]
    pub optimal_value: f64,

    /// Wall-clock time of the run in milliseconds
    #[serde(rename = "executionTime", default)]
    pub execution_time: Option<f64>,
}

impl Observation {
    pub fn configuration(&self) -> Configuration {
        Configuration::new(self.crossover, self.mutation)
    }

    /// Fitness relative to the problem optimum
    pub fn normalized_fitness(&self) -> f64 {
        self.fitness / self.optimal_value
    }
}

/// Immutable in-memory results table
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Load a results table, choosing the parser from the file extension
    ///
    /// `.csv` files need a header row; `.jsonl`/`.ndjson` files hold one
    /// JSON object per line. Blank lines are skipped.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let open = || {
            File::open(path).map_err(|source| DatasetError::Open {
                path: path.display().to_string(),
                source,
            })
        };

        let dataset = match extension.as_str() {
            "csv" => Self::from_csv_reader(open()?)?,
            "jsonl" | "ndjson" => Self::from_json_lines(BufReader::new(open()?))?,
            _ => return Err(DatasetError::UnsupportedFormat(path.display().to_string())),
        };

        tracing::debug!(
            "Loaded {} observations from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let observations = reader
            .deserialize()
            .collect::<std::result::Result<Vec<Observation>, csv::Error>>()?;
        Ok(Self { observations })
    }

    pub fn from_json_lines<R: BufRead>(reader: R) -> Result<Self> {
        let mut observations = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let observation = serde_json::from_str(&line).map_err(|source| DatasetError::Json {
                line: index + 1,
                source,
            })?;
            observations.push(observation);
        }
        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct evaluation budgets, ascending
    pub fn budgets(&self) -> Vec<i64> {
        let budgets: BTreeSet<i64> = self.observations.iter().map(|o| o.budget).collect();
        budgets.into_iter().collect()
    }

    /// Distinct problem indices, ascending
    pub fn problem_indices(&self) -> Vec<u32> {
        let problems: BTreeSet<u32> = self.observations.iter().map(|o| o.problem).collect();
        problems.into_iter().collect()
    }

    /// Optimal value per problem (first value seen for each problem)
    pub fn optimal_values(&self) -> BTreeMap<u32, f64> {
        let mut optima = BTreeMap::new();
        for observation in &self.observations {
            optima
                .entry(observation.problem)
                .or_insert(observation.optimal_value);
        }
        optima
    }

    /// Runs executed under one evaluation budget
    pub fn scenario(&self, budget: i64) -> Vec<Observation> {
        self.observations
            .iter()
            .filter(|o| o.budget == budget)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const CSV: &str = "\
functionEvaluations,problemIndex,crossoverProbability,mutationProbability,bestIndividual.fitness,problem.optimalValue,executionTime
1000,0,0.9,0.01,90.0,100.0,12.5
1000,1,0.9,0.01,45.0,50.0,
10000,0,0.5,0.1,99.0,100.0,40.0
";

    #[test]
    fn test_csv_parses_runner_columns() {
        let dataset = Dataset::from_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);

        let first = dataset.observations()[0];
        assert_eq!(first.budget, 1000);
        assert_eq!(first.problem, 0);
        assert_eq!(first.configuration(), Configuration::new(0.9, 0.01));
        assert_eq!(first.execution_time, Some(12.5));
        assert!((first.normalized_fitness() - 0.9).abs() < 1e-12);

        // Empty executionTime cell
        assert_eq!(dataset.observations()[1].execution_time, None);
    }

    #[test]
    fn test_csv_without_execution_time_column() {
        let csv = "\
functionEvaluations,problemIndex,crossoverProbability,mutationProbability,bestIndividual.fitness,problem.optimalValue
-1,3,0.7,0.05,10.0,20.0
";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.observations()[0].budget, -1);
        assert_eq!(dataset.observations()[0].execution_time, None);
    }

    #[test]
    fn test_csv_missing_required_column_is_error() {
        let csv = "functionEvaluations,problemIndex\n1000,0\n";
        assert!(matches!(
            Dataset::from_csv_reader(csv.as_bytes()),
            Err(DatasetError::Csv(_))
        ));
    }

    #[test]
    fn test_header_only_csv_is_empty_dataset() {
        let header = CSV.lines().next().unwrap();
        let dataset = Dataset::from_csv_reader(header.as_bytes()).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.budgets().is_empty());
    }

    #[test]
    fn test_json_lines_skip_blank_lines() {
        let jsonl = r#"{"functionEvaluations":1000,"problemIndex":2,"crossoverProbability":0.8,"mutationProbability":0.02,"bestIndividual.fitness":7.0,"problem.optimalValue":8.0}

{"functionEvaluations":1000,"problemIndex":3,"crossoverProbability":0.8,"mutationProbability":0.02,"bestIndividual.fitness":5.0,"problem.optimalValue":8.0,"executionTime":3.0}
"#;
        let dataset = Dataset::from_json_lines(jsonl.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.problem_indices(), vec![2, 3]);
    }

    #[test]
    fn test_json_lines_reports_line_number() {
        let jsonl = "{\"functionEvaluations\":1}\n";
        match Dataset::from_json_lines(jsonl.as_bytes()) {
            Err(DatasetError::Json { line, .. }) => assert_eq!(line, 1),
            other => panic!("Expected JSON error, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Dataset::from_path("results.parquet").unwrap_err();
        assert!(matches!(err, DatasetError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_path("/nonexistent/results.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open dataset"));
    }

    #[test]
    fn test_budgets_and_scenario() {
        let dataset = Dataset::from_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(dataset.budgets(), vec![1000, 10000]);
        assert_eq!(dataset.scenario(1000).len(), 2);
        assert_eq!(dataset.scenario(10000).len(), 1);
        assert!(dataset.scenario(-1).is_empty());
    }

    #[test]
    fn test_optimal_values_first_seen() {
        let dataset = Dataset::from_csv_reader(CSV.as_bytes()).unwrap();
        let optima = dataset.optimal_values();
        assert_eq!(optima.get(&0), Some(&100.0));
        assert_eq!(optima.get(&1), Some(&50.0));
    }

    #[test]
    fn test_configuration_ordering_and_hashing() {
        let a = Configuration::new(0.5, 0.1);
        let b = Configuration::new(0.5, 0.2);
        let c = Configuration::new(0.9, 0.01);
        assert!(a < b && b < c);

        let set: HashSet<Configuration> = [a, b, Configuration::new(0.5, 0.1)].into();
        assert_eq!(set.len(), 2);
        assert_eq!(a.to_string(), "(cp=0.5, mp=0.1)");
    }
}
