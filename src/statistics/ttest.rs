// Welch's two-sample t-test
//
// Unequal-variance variant: the degrees of freedom follow the
// Welch-Satterthwaite approximation, so samples with different spread are
// compared without pooling their variances.

use super::distribution::student_t_two_tailed_p;
use super::{direction, TestOutcome};

/// Mean and unbiased (n - 1) variance
fn mean_variance(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}

/// Compare the means of two samples
///
/// Returns `None` when either sample has fewer than two values. When both
/// samples have zero variance the p-value is 1 for equal means and 0
/// otherwise, with an infinite statistic.
///
/// # Example
/// ```
/// use perflogic::statistics::welch_t_test;
///
/// let fast = [10.0, 12.0, 11.0, 13.0, 10.0];
/// let slow = [25.0, 27.0, 26.0, 28.0, 25.0];
///
/// let outcome = welch_t_test(&fast, &slow).unwrap();
/// assert!(outcome.p_value < 0.05);
/// assert_eq!(outcome.left_larger, Some(false));
/// ```
pub fn welch_t_test(left: &[f64], right: &[f64]) -> Option<TestOutcome> {
    if left.len() < 2 || right.len() < 2 {
        return None;
    }

    let n1 = left.len() as f64;
    let n2 = right.len() as f64;
    let (mean1, var1) = mean_variance(left);
    let (mean2, var2) = mean_variance(right);

    let se1 = var1 / n1;
    let se2 = var2 / n2;
    let se_sq = se1 + se2;
    let diff = mean1 - mean2;

    if se_sq == 0.0 {
        let (statistic, p_value) = if diff == 0.0 {
            (0.0, 1.0)
        } else {
            (diff.signum() * f64::INFINITY, 0.0)
        };
        return Some(TestOutcome {
            statistic,
            p_value,
            left_larger: direction(diff),
        });
    }

    let t = diff / se_sq.sqrt();
    let df = se_sq * se_sq / (se1 * se1 / (n1 - 1.0) + se2 * se2 / (n2 - 1.0));

    Some(TestOutcome {
        statistic: t,
        p_value: student_t_two_tailed_p(t, df),
        left_larger: direction(diff),
    })
}
