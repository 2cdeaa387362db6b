// Configuration-comparison ranking with paired hypothesis testing
//
// For one evaluation-budget scenario the ranker:
// 1. Normalizes every run by its problem optimum and averages per
//    (configuration, problem) into a performance vector
// 2. Drops configurations that do not cover exactly the canonical problems
// 3. Runs a two-sided Wilcoxon signed-rank test for every pair, skipping
//    pairs whose vectors are identical within tolerance (p = 1.0)
// 4. Declares a winner when p < alpha and the global means differ
// 5. Tallies wins and selects the best configuration(s), breaking ties by
//    global mean normalized fitness
//
// The ranker is a pure function of (observations, canonical problems,
// RankingConfig). Missing coverage, identical samples and too few
// configurations all produce (possibly empty) results, never errors.

mod config;
mod performance;
mod tournament;
mod wilcoxon;

pub use config::{Direction, RankingConfig};
pub use performance::{
    build_performance_vectors, Exclusion, ExclusionReason, PerformanceTable, PerformanceVector,
};
pub use tournament::{
    compare_pair, most_wins, rank_configurations, Outcome, PairwiseComparison, Ranking, WinCount,
};
pub use wilcoxon::{wilcoxon_signed_rank, PValueMethod, SignedRankTest, WilcoxonError};

#[cfg(test)]
mod tests;
