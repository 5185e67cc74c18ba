// Reference distributions behind the p-value computations
//
// Student's t and the standard normal come from statrs. statrs has no
// Kolmogorov distribution, so its tail is summed here as the alternating
// series Q_KS(λ) = 2 Σ (-1)^(j-1) exp(-2 j² λ²).

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Two-tailed p-value of Student's t-distribution with `df` degrees of freedom
///
/// Degenerate input (NaN statistic, non-positive or non-finite df) yields 1.0.
pub fn student_t_two_tailed_p(t: f64, df: f64) -> f64 {
    if t.is_nan() || !df.is_finite() || df <= 0.0 {
        return 1.0;
    }
    if t.is_infinite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

fn standard_normal() -> Option<Normal> {
    Normal::new(0.0, 1.0).ok()
}

/// Standard normal CDF
pub fn normal_cdf(x: f64) -> f64 {
    standard_normal().map_or(f64::NAN, |n| n.cdf(x))
}

/// Two-tailed p-value of a standard normal z-score
pub fn normal_two_tailed_p(z: f64) -> f64 {
    if z.is_nan() {
        return 1.0;
    }
    standard_normal().map_or(1.0, |n| (2.0 * n.sf(z.abs())).clamp(0.0, 1.0))
}

/// Kolmogorov distribution tail Q_KS(lambda) = P(K > lambda)
///
/// Returns 1.0 for lambda near zero, where the series does not converge.
pub fn kolmogorov_q(lambda: f64) -> f64 {
    const EPS1: f64 = 1.0e-3;
    const EPS2: f64 = 1.0e-8;

    if !lambda.is_finite() {
        return if lambda > 0.0 { 0.0 } else { 1.0 };
    }

    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut term_before = 0.0;

    for j in 1..=100 {
        let j = j as f64;
        let term = fac * (a2 * j * j).exp();
        sum += term;
        if term.abs() <= EPS1 * term_before || term.abs() <= EPS2 * sum {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        term_before = term.abs();
    }

    1.0
}
