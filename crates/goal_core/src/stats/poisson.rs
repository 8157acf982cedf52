//! Two-sample Z-test for Poisson rates.
//!
//! z = (λ1 - λ2) / sqrt(λ1/n1 + λ2/n2), p = 2 * (1 - Φ(|z|))
//!
//! λ are per-unit rates (goals per match) and n the exposures (matches).
//! When both rates are zero the standard error is zero and z is undefined;
//! two empty counts carry no evidence of a difference, so the test reports
//! z = 0 and p = 1.

use super::normal::two_sided_p_value;
use super::TestOutcome;
use crate::error::StatsError;

pub fn poisson_rate_test(
    rate1: f64,
    n1: f64,
    rate2: f64,
    n2: f64,
) -> Result<TestOutcome, StatsError> {
    check_rate("rate1", rate1)?;
    check_rate("rate2", rate2)?;
    check_exposure("n1", n1)?;
    check_exposure("n2", n2)?;

    if rate1 == 0.0 && rate2 == 0.0 {
        return Ok(TestOutcome {
            statistic: 0.0,
            p_value: 1.0,
        });
    }

    let std_error = (rate1 / n1 + rate2 / n2).sqrt();
    let z = (rate1 - rate2) / std_error;

    Ok(TestOutcome {
        statistic: z,
        p_value: two_sided_p_value(z),
    })
}

/// Same test from raw counts: rate = count / matches.
pub fn poisson_count_test(
    count1: usize,
    matches1: u32,
    count2: usize,
    matches2: u32,
) -> Result<TestOutcome, StatsError> {
    let n1 = f64::from(matches1);
    let n2 = f64::from(matches2);
    check_exposure("n1", n1)?;
    check_exposure("n2", n2)?;
    poisson_rate_test(count1 as f64 / n1, n1, count2 as f64 / n2, n2)
}

fn check_rate(name: &'static str, value: f64) -> Result<(), StatsError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StatsError::InvalidRate { name, value });
    }
    Ok(())
}

fn check_exposure(name: &'static str, value: f64) -> Result<(), StatsError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(StatsError::InvalidExposure { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_value() {
        // 570 vs 456 goals over a 380 match season
        let outcome = poisson_rate_test(1.5, 380.0, 1.2, 380.0).unwrap();
        assert!((outcome.statistic - 3.559).abs() < 1e-3);
        assert!(outcome.p_value < 0.001);
    }

    #[test]
    fn test_equal_rates_give_p_one() {
        let outcome = poisson_rate_test(1.3, 100.0, 1.3, 100.0).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert!((outcome.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_both_rates_zero_fallback() {
        let outcome = poisson_rate_test(0.0, 50.0, 0.0, 50.0).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert_eq!(outcome.p_value, 1.0);
    }

    #[test]
    fn test_one_rate_zero_is_defined() {
        let outcome = poisson_rate_test(0.0, 50.0, 0.1, 50.0).unwrap();
        assert!(outcome.statistic < 0.0);
        assert!(outcome.p_value.is_finite());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            poisson_rate_test(-0.1, 10.0, 1.0, 10.0),
            Err(StatsError::InvalidRate { name: "rate1", .. })
        ));
        assert!(matches!(
            poisson_rate_test(1.0, 0.0, 1.0, 10.0),
            Err(StatsError::InvalidExposure { name: "n1", .. })
        ));
        assert!(matches!(
            poisson_rate_test(1.0, 10.0, f64::NAN, 10.0),
            Err(StatsError::InvalidRate { name: "rate2", .. })
        ));
        assert!(matches!(
            poisson_count_test(3, 10, 4, 0),
            Err(StatsError::InvalidExposure { name: "n2", .. })
        ));
    }

    #[test]
    fn test_count_form_matches_rate_form() {
        let from_counts = poisson_count_test(45, 380, 30, 380).unwrap();
        let from_rates = poisson_rate_test(45.0 / 380.0, 380.0, 30.0 / 380.0, 380.0).unwrap();
        assert_eq!(from_counts, from_rates);
    }

    proptest! {
        #[test]
        fn prop_swap_flips_sign_only(
            rate1 in 0.0f64..5.0,
            n1 in 1.0f64..1000.0,
            rate2 in 0.0f64..5.0,
            n2 in 1.0f64..1000.0,
        ) {
            let forward = poisson_rate_test(rate1, n1, rate2, n2).unwrap();
            let swapped = poisson_rate_test(rate2, n2, rate1, n1).unwrap();
            prop_assert!((forward.statistic + swapped.statistic).abs() < 1e-9);
            prop_assert!((forward.p_value - swapped.p_value).abs() < 1e-12);
            prop_assert!(forward.p_value >= 0.0 && forward.p_value <= 1.0);
        }
    }
}
