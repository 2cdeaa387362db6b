// Wilcoxon signed-rank test for paired samples
//
// Two-sided, rank-based test for small and non-normal paired samples.
// - Zero differences are dropped before ranking ("wilcox" zero method)
// - Tied |differences| receive their average rank
// - Statistic T = min(W+, W-)
// - Exact null distribution for n <= 50 without ties or zero differences,
//   otherwise the normal approximation with tie-corrected variance (no
//   continuity correction)

use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;
use thiserror::Error;

/// Largest sample size for which the exact null distribution is used
pub const EXACT_MAX_SAMPLES: usize = 50;

/// Errors raised when the test is undefined for the given samples
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WilcoxonError {
    #[error("Paired samples differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("All paired differences are zero")]
    NoDifferences,

    #[error("Samples contain non-finite values")]
    NonFinite,
}

/// How the p-value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PValueMethod {
    Exact,
    NormalApproximation,
}

/// Result of a signed-rank test
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRankTest {
    /// T = min(W+, W-)
    pub statistic: f64,

    /// Two-sided p-value
    pub pvalue: f64,

    /// Number of non-zero differences that were ranked
    pub sample_size: usize,

    pub method: PValueMethod,
}

/// Run the two-sided Wilcoxon signed-rank test on paired samples
///
/// # Arguments
/// * `first` - Samples of the first configuration, aligned by problem
/// * `second` - Samples of the second configuration, same alignment
///
/// # Example
/// ```
/// use sweeprank::ranking::wilcoxon_signed_rank;
///
/// let a = [0.9, 0.8, 0.95, 0.7, 0.85, 0.6, 0.75];
/// let b = [0.8, 0.6, 0.65, 0.3, 0.35, 0.0, 0.05];
/// let test = wilcoxon_signed_rank(&a, &b).unwrap();
/// assert_eq!(test.statistic, 0.0);
/// assert!((test.pvalue - 0.015625).abs() < 1e-12);
/// ```
pub fn wilcoxon_signed_rank(
    first: &[f64],
    second: &[f64],
) -> Result<SignedRankTest, WilcoxonError> {
    if first.len() != second.len() {
        return Err(WilcoxonError::LengthMismatch {
            left: first.len(),
            right: second.len(),
        });
    }

    if first.iter().chain(second).any(|v| !v.is_finite()) {
        return Err(WilcoxonError::NonFinite);
    }

    let differences: Vec<f64> = first
        .iter()
        .zip(second)
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();

    if differences.is_empty() {
        return Err(WilcoxonError::NoDifferences);
    }

    let (ranks, tie_sizes) = rank_magnitudes(&differences);

    let (mut positive, mut negative) = (0.0, 0.0);
    for (difference, rank) in differences.iter().zip(&ranks) {
        if *difference > 0.0 {
            positive += rank;
        } else {
            negative += rank;
        }
    }
    let statistic = f64::min(positive, negative);
    let sample_size = differences.len();

    let has_ties = tie_sizes.iter().any(|&size| size > 1);
    let has_zeros = sample_size < first.len();
    let (pvalue, method) = if sample_size <= EXACT_MAX_SAMPLES && !has_ties && !has_zeros {
        (exact_pvalue(sample_size, statistic), PValueMethod::Exact)
    } else {
        (
            normal_pvalue(sample_size, statistic, &tie_sizes),
            PValueMethod::NormalApproximation,
        )
    };

    Ok(SignedRankTest {
        statistic,
        pvalue,
        sample_size,
        method,
    })
}

/// Average ranks (1-based) of |differences| plus the size of every tie group
fn rank_magnitudes(differences: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let magnitudes: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
    let mut order: Vec<usize> = (0..magnitudes.len()).collect();
    order.sort_by(|&a, &b| magnitudes[a].total_cmp(&magnitudes[b]));

    let mut ranks = vec![0.0; magnitudes.len()];
    let mut tie_sizes = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && magnitudes[order[end]] == magnitudes[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let average = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = average;
        }
        tie_sizes.push(end - start);
        start = end;
    }

    (ranks, tie_sizes)
}

/// Two-sided p-value from the exact null distribution of W+
///
/// Counts subsets of {1..n} by rank sum; P(W <= T) doubled and capped at 1.
fn exact_pvalue(n: usize, statistic: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0u64; max_sum + 1];
    counts[0] = 1;
    for rank in 1..=n {
        for sum in (rank..=max_sum).rev() {
            counts[sum] += counts[sum - rank];
        }
    }

    let threshold = (statistic.floor() as usize).min(max_sum);
    let tail: u64 = counts[..=threshold].iter().sum();
    let total = 2f64.powi(n as i32);

    (2.0 * tail as f64 / total).min(1.0)
}

/// Two-sided p-value from the normal approximation with tie correction
fn normal_pvalue(n: usize, statistic: f64, tie_sizes: &[usize]) -> f64 {
    let n = n as f64;
    let mean = n * (n + 1.0) / 4.0;
    let tie_correction: f64 = tie_sizes
        .iter()
        .map(|&size| {
            let t = size as f64;
            t * t * t - t
        })
        .sum::<f64>()
        / 48.0;
    let variance = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_correction;

    if variance <= 0.0 {
        return 1.0;
    }

    let z = (statistic - mean) / variance.sqrt();
    erfc(z.abs() / SQRT_2).min(1.0)
}
