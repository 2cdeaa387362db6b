#![no_main]

use libfuzzer_sys::fuzz_target;
use sweeprank::dataset::Dataset;
use sweeprank::ranking::{rank_configurations, RankingConfig};

fuzz_target!(|data: &[u8]| {
    // Malformed tables must surface as errors, never panics
    for parsed in [
        Dataset::from_csv_reader(data),
        Dataset::from_json_lines(data),
    ] {
        if let Ok(dataset) = parsed {
            let problems = dataset.problem_indices();
            for budget in dataset.budgets() {
                let _ = rank_configurations(
                    &dataset.scenario(budget),
                    &problems,
                    &RankingConfig::default(),
                );
            }
        }
    }
});
