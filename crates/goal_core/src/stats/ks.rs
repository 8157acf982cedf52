//! Two-sample Kolmogorov-Smirnov test.
//!
//! D = sup |F1(t) - F2(t)| over the pooled sample. Small samples
//! (n1·n2 <= `EXACT_MAX_CELLS`) get the exact p-value: the probability that
//! a uniformly random lattice path from (0, 0) to (n1, n2) touches a point
//! with |i/n1 - j/n2| >= D. Larger samples use the asymptotic Kolmogorov
//! distribution evaluated at λ = (√nₑ + 0.12 + 0.11/√nₑ) · D with
//! nₑ = n1·n2/(n1+n2) (Stephens' small-sample correction).

use super::{validate_sample, TestOutcome};
use crate::error::StatsError;

const MAX_TERMS: u32 = 100;
const EPS_RELATIVE_TERM: f64 = 1e-3;
const EPS_SUM: f64 = 1e-8;

/// Largest n1·n2 evaluated with the exact lattice-path distribution
pub const EXACT_MAX_CELLS: usize = 10_000;

/// Slack when comparing a lattice point's gap against D
const GAP_TOLERANCE: f64 = 1e-12;

pub fn ks_two_sample(x: &[f64], y: &[f64]) -> Result<TestOutcome, StatsError> {
    validate_sample("x", x)?;
    validate_sample("y", y)?;

    let statistic = ks_statistic(x, y);
    if statistic == 0.0 {
        return Ok(TestOutcome {
            statistic,
            p_value: 1.0,
        });
    }

    let p_value = if x.len() * y.len() <= EXACT_MAX_CELLS {
        exact_p_value(x.len(), y.len(), statistic)
    } else {
        let n1 = x.len() as f64;
        let n2 = y.len() as f64;
        let en = (n1 * n2 / (n1 + n2)).sqrt();
        kolmogorov_survival((en + 0.12 + 0.11 / en) * statistic)
    };

    Ok(TestOutcome { statistic, p_value })
}

/// P(D >= d) under the null: one minus the probability that a random
/// monotone path stays strictly inside the band |i/m - j/n| < d.
fn exact_p_value(m: usize, n: usize, d: f64) -> f64 {
    let (mf, nf) = (m as f64, n as f64);
    let inside = |i: usize, j: usize| (i as f64 / mf - j as f64 / nf).abs() < d - GAP_TOLERANCE;

    // row[j] holds the probability of reaching (i, j) without leaving the band
    let mut row = vec![0.0; n + 1];
    for i in 0..=m {
        for j in 0..=n {
            let reached = if i == 0 && j == 0 {
                1.0
            } else {
                let mut p = 0.0;
                if i > 0 {
                    // step in x from (i-1, j)
                    let (left_x, left_y) = ((m - i + 1) as f64, (n - j) as f64);
                    p += row[j] * left_x / (left_x + left_y);
                }
                if j > 0 {
                    // step in y from (i, j-1)
                    let (left_x, left_y) = ((m - i) as f64, (n - j + 1) as f64);
                    p += row[j - 1] * left_y / (left_x + left_y);
                }
                p
            };
            row[j] = if inside(i, j) { reached } else { 0.0 };
        }
    }

    (1.0 - row[n]).clamp(0.0, 1.0)
}

/// Largest vertical gap between the two empirical CDFs.
fn ks_statistic(x: &[f64], y: &[f64]) -> f64 {
    let mut a = x.to_vec();
    let mut b = y.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;

    while i < a.len() && j < b.len() {
        let t = a[i].min(b[j]);
        // step over every observation equal to t in both samples
        while i < a.len() && a[i] <= t {
            i += 1;
        }
        while j < b.len() && b[j] <= t {
            j += 1;
        }
        d = d.max((i as f64 / n1 - j as f64 / n2).abs());
    }

    d
}

/// Q(λ) = 2 Σ (-1)^(k-1) exp(-2 k² λ²), clamped to [0, 1].
/// The alternating series fails to converge for tiny λ where Q is 1.
fn kolmogorov_survival(lambda: f64) -> f64 {
    let a2 = -2.0 * lambda * lambda;
    let mut sign = 2.0;
    let mut sum = 0.0;
    let mut previous = 0.0;

    for k in 1..=MAX_TERMS {
        let kf = f64::from(k);
        let term = sign * (a2 * kf * kf).exp();
        sum += term;
        if term.abs() <= EPS_RELATIVE_TERM * previous || term.abs() <= EPS_SUM * sum {
            return sum.clamp(0.0, 1.0);
        }
        sign = -sign;
        previous = term.abs();
    }

    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistic_separated_samples() {
        assert_eq!(ks_statistic(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 1.0);
    }

    #[test]
    fn test_statistic_with_ties() {
        // F1 jumps to 2/3 at 1, F2 to 1/3 at 1
        let d = ks_statistic(&[1.0, 1.0, 2.0], &[1.0, 2.0, 2.0]);
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_samples() {
        let outcome = ks_two_sample(&[3.0, 7.0, 7.0, 12.0], &[12.0, 7.0, 3.0, 7.0]).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert_eq!(outcome.p_value, 1.0);
    }

    #[test]
    fn test_separated_samples_p_value() {
        // only the two corner paths (1 in 20 each) reach D = 1
        let outcome = ks_two_sample(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(outcome.statistic, 1.0);
        assert!((outcome.p_value - 0.1).abs() < 1e-12);
        assert!(!outcome.is_significant(0.05));
    }

    #[test]
    fn test_exact_unequal_sizes() {
        // C(5, 2) = 10 paths, two of them through a corner
        let outcome = ks_two_sample(&[1.0, 2.0], &[3.0, 4.0, 5.0]).unwrap();
        assert!((outcome.p_value - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_exact_smallest_gap_is_certain() {
        let outcome = ks_two_sample(&[2.0, 44.0], &[0.0, 25.0, 44.0]).unwrap();
        assert!((outcome.statistic - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(outcome.p_value, 1.0);
    }

    #[test]
    fn test_kolmogorov_survival_reference() {
        // Q(1.36) ≈ 0.049 is the classic 5% critical value
        assert!((kolmogorov_survival(1.36) - 0.049).abs() < 1e-3);
        assert_eq!(kolmogorov_survival(0.01), 1.0);
        assert!(kolmogorov_survival(3.0) < 1e-6);
    }

    #[test]
    fn test_shifted_distribution_is_significant() {
        let first: Vec<f64> = (0..200).map(|i| f64::from(i % 45)).collect();
        let second: Vec<f64> = (0..200).map(|i| f64::from(20 + i % 45)).collect();
        let outcome = ks_two_sample(&first, &second).unwrap();
        assert!(outcome.statistic > 0.4);
        assert!(outcome.p_value < 1e-6);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(
            ks_two_sample(&[1.0], &[f64::INFINITY]),
            Err(StatsError::NonFiniteSample("y"))
        );
    }
}
