// Two-sample hypothesis tests over execution-time samples
//
// Each test compares a left and a right sample and reports its statistic, a
// two-sided p-value and which side tends to be larger. Mapping a test outcome
// onto a comparison verdict happens in `crate::comparison`.
//
// Tests:
// - Welch's t-test: parametric, compares means (unequal variances allowed)
// - Mann-Whitney U: rank based, robust to outliers and skew
// - Kolmogorov-Smirnov: distribution shape, extended with a direction flag
//
// Reference distributions (Student's t, normal, Kolmogorov) live in
// `distribution` and are shared by all three.

mod distribution;
mod kolmogorov;
mod mann_whitney;
mod summary;
mod ttest;

pub use distribution::{
    kolmogorov_q, normal_cdf, normal_two_tailed_p, student_t_two_tailed_p,
};
pub use kolmogorov::kolmogorov_smirnov;
pub use mann_whitney::mann_whitney_u;
pub use summary::SampleSummary;
pub use ttest::welch_t_test;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which hypothesis test produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    TTest,
    MannWhitney,
    KolmogorovSmirnov,
}

impl TestKind {
    pub const ALL: [TestKind; 3] = [
        TestKind::TTest,
        TestKind::MannWhitney,
        TestKind::KolmogorovSmirnov,
    ];

    /// Run this test on two samples
    pub fn run(self, left: &[f64], right: &[f64]) -> Option<TestOutcome> {
        match self {
            TestKind::TTest => welch_t_test(left, right),
            TestKind::MannWhitney => mann_whitney_u(left, right),
            TestKind::KolmogorovSmirnov => kolmogorov_smirnov(left, right),
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestKind::TTest => "t-test",
            TestKind::MannWhitney => "Mann-Whitney U",
            TestKind::KolmogorovSmirnov => "Kolmogorov-Smirnov",
        };
        f.write_str(s)
    }
}

/// Raw outcome of one two-sample test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test statistic (t, U of the left sample, or D)
    pub statistic: f64,

    /// Two-sided p-value: probability of a difference at least this large
    /// if both samples came from the same distribution
    pub p_value: f64,

    /// Whether the left sample tends to be larger than the right one;
    /// `None` when the test sees no direction
    pub left_larger: Option<bool>,
}

impl TestOutcome {
    /// Significant at level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Direction flag from a signed difference; zero means no direction
pub(crate) fn direction(difference: f64) -> Option<bool> {
    if difference > 0.0 {
        Some(true)
    } else if difference < 0.0 {
        Some(false)
    } else {
        None
    }
}
