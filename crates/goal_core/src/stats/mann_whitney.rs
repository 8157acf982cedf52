//! Mann-Whitney U test (two-sided).
//!
//! U1 = R1 - n1(n1+1)/2 where R1 is the rank sum of the first sample
//! (tied values share their mid-rank).
//!
//! Without ties and with at most `EXACT_MAX_SMALLER` observations in the
//! smaller sample, p = 2·P(U >= max(U1, U2)) from the exact null
//! distribution of U. Otherwise the normal approximation is used, with the
//! tie-corrected variance
//!
//! σ² = n1·n2/12 · ((n+1) - Σ(t³-t) / (n(n-1)))
//!
//! and a 0.5 continuity correction on max(U1, U2).

use super::normal::two_sided_p_value;
use super::{validate_sample, TestOutcome};
use crate::error::StatsError;

/// Smaller-sample size up to which tie-free samples get the exact p-value
pub const EXACT_MAX_SMALLER: usize = 8;

/// Largest n1·n2 (the degree of the U distribution) evaluated exactly
const EXACT_MAX_DEGREE: usize = 100_000;

/// Returns U of the first sample and the two-sided p-value.
/// If every observation is identical the variance is zero and p = 1.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<TestOutcome, StatsError> {
    validate_sample("x", x)?;
    validate_sample("y", y)?;

    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let n = n1 + n2;

    let mut pooled: Vec<(f64, bool)> = x
        .iter()
        .map(|&v| (v, true))
        .chain(y.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let values: Vec<f64> = pooled.iter().map(|(v, _)| *v).collect();
    let (ranks, tie_term) = mid_ranks(&values);

    let rank_sum_x: f64 = pooled
        .iter()
        .zip(&ranks)
        .filter(|((_, from_x), _)| *from_x)
        .map(|(_, rank)| rank)
        .sum();

    let u1 = rank_sum_x - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let mean = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));

    if variance <= 0.0 {
        return Ok(TestOutcome {
            statistic: u1,
            p_value: 1.0,
        });
    }

    let smaller = x.len().min(y.len());
    let larger = x.len().max(y.len());
    if tie_term == 0.0 && smaller <= EXACT_MAX_SMALLER && smaller * larger <= EXACT_MAX_DEGREE {
        return Ok(TestOutcome {
            statistic: u1,
            p_value: exact_p_value(smaller, larger, u1.max(u2).round() as usize),
        });
    }

    let z = (u1.max(u2) - mean - 0.5) / variance.sqrt();
    // z < 0 only when U sits on the mean; the continuity correction
    // overshoots and the p-value saturates at 1.
    let p_value = if z <= 0.0 { 1.0 } else { two_sided_p_value(z) };

    Ok(TestOutcome {
        statistic: u1,
        p_value,
    })
}

/// Two-sided exact p-value for the larger of U1, U2.
fn exact_p_value(m: usize, n: usize, u_max: usize) -> f64 {
    let frequencies = u_frequencies(m, n);
    let total: i128 = frequencies.iter().sum();
    let upper: i128 = frequencies.iter().skip(u_max).sum();
    (2.0 * upper as f64 / total as f64).clamp(0.0, 1.0)
}

/// Number of orderings giving U = 0..=m·n: the coefficients of the Gaussian
/// binomial [m+n choose m]_q = Π_{i=1..m} (1 - q^(n+i)) / (1 - q^i).
fn u_frequencies(m: usize, n: usize) -> Vec<i128> {
    let degree = m * n;
    let mut coefficients = vec![0i128; degree + 1];
    coefficients[0] = 1;

    // truncating at `degree` is exact: coefficient k of a product or power
    // series quotient only depends on coefficients <= k
    for i in 1..=m {
        let shift = n + i;
        for k in (shift..=degree).rev() {
            coefficients[k] -= coefficients[k - shift];
        }
        for k in i..=degree {
            coefficients[k] += coefficients[k - i];
        }
    }
    coefficients
}

/// 1-based mid-ranks of an ascending slice, plus Σ(t³ - t) over tie groups.
pub(crate) fn mid_ranks(sorted: &[f64]) -> (Vec<f64>, f64) {
    let mut ranks = vec![0.0; sorted.len()];
    let mut tie_term = 0.0;
    let mut start = 0;

    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && sorted[end] == sorted[start] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for r in &mut ranks[start..end] {
            *r = rank;
        }
        let t = (end - start) as f64;
        tie_term += t * t * t - t;
        start = end;
    }

    (ranks, tie_term)
}
