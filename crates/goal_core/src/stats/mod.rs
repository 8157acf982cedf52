//! # Two-Sample Tests
//!
//! Closed-form tests used to compare goal-time distributions:
//!
//! - `poisson` - Z-test for the difference of two Poisson rates
//! - `mann_whitney` - rank-sum test, mid-ranks for ties
//! - `ks` - Kolmogorov-Smirnov test on empirical CDFs
//!
//! Every test returns a statistic and a two-sided p-value. Inputs that would
//! make a formula undefined are either rejected with `StatsError` or mapped to
//! a documented fallback; a NaN never leaves this module.

pub mod ks;
pub mod mann_whitney;
pub mod normal;
pub mod poisson;

pub use ks::ks_two_sample;
pub use mann_whitney::mann_whitney_u;
pub use normal::{standard_normal_cdf, two_sided_p_value};
pub use poisson::{poisson_count_test, poisson_rate_test};

use crate::error::StatsError;
use serde::{Deserialize, Serialize};

/// Significance level used for the human-readable verdicts
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Statistic and two-sided p-value of a test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestOutcome {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Reject empty or non-finite samples up front.
pub(crate) fn validate_sample(name: &'static str, sample: &[f64]) -> Result<(), StatsError> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample(name));
    }
    if sample.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteSample(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sample() {
        assert_eq!(validate_sample("x", &[]), Err(StatsError::EmptySample("x")));
        assert_eq!(
            validate_sample("y", &[1.0, f64::NAN]),
            Err(StatsError::NonFiniteSample("y"))
        );
        assert!(validate_sample("z", &[1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_significance() {
        let outcome = TestOutcome {
            statistic: 2.5,
            p_value: 0.012,
        };
        assert!(outcome.is_significant(DEFAULT_ALPHA));
        assert!(!outcome.is_significant(0.01));
    }
}
