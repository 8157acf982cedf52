use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Standard normal CDF, Φ(x) = 0.5 * erfc(-x / √2).
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Two-sided p-value of a z-score: 2 * (1 - Φ(|z|)).
///
/// Evaluated as 2 * Φ(-|z|) so large |z| does not round to 0 through
/// `1 - Φ`.
pub fn two_sided_p_value(z: f64) -> f64 {
    (2.0 * standard_normal_cdf(-z.abs())).clamp(0.0, 1.0)
}
