// Statistical evaluation of one comparison leaf
//
// Each of the three tests is mapped independently onto a verdict:
//
// - the right operand is widened by the equality interval ε
//   (R⁺ = R·(1+ε), R⁻ = R·(1−ε))
// - `<` / `>=` test against R⁻, `<=` / `>` against R⁺
// - `=` holds when L is significantly above R⁻ and below R⁺
//   (two one-sided tests); `!=` is its negation
// - a non-significant outcome is INCONCLUSIVE
//
// The verdict propagated through the formula tree comes from the configured
// primary test, or from all three combined with Kleene AND.

use crate::config::{EvaluatorConfig, PrimaryTest};
use crate::error::{EvalError, Result};
use crate::formula::{Comparison, Sign};
use crate::logic::{conjunction, StatisticalResult};
use crate::result::ComparisonEvaluationResult;
use crate::sample::{AcquiredData, MeasurementSample, MeasurementSampleDataProvider};
use crate::statistics::{TestKind, TestOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Verdict of one test for one comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Holds,
    DoesNotHold,
    Inconclusive,
}

impl Verdict {
    fn negate(self) -> Self {
        match self {
            Verdict::Holds => Verdict::DoesNotHold,
            Verdict::DoesNotHold => Verdict::Holds,
            Verdict::Inconclusive => Verdict::Inconclusive,
        }
    }
}

impl From<Verdict> for StatisticalResult {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Holds => StatisticalResult::True,
            Verdict::DoesNotHold => StatisticalResult::False,
            Verdict::Inconclusive => StatisticalResult::Unknown,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Holds => "HOLDS",
            Verdict::DoesNotHold => "DOES NOT HOLD",
            Verdict::Inconclusive => "INCONCLUSIVE",
        };
        f.write_str(s)
    }
}

/// Verdict of one test plus the numbers behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub test: TestKind,
    pub verdict: Verdict,
    /// Test statistic against the deciding bound; absent if the test did not run
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    /// True if the left operand tends to be larger than the deciding bound
    pub left_larger: Option<bool>,
}

impl ComparisonResult {
    pub fn inconclusive(test: TestKind) -> Self {
        Self {
            test,
            verdict: Verdict::Inconclusive,
            statistic: None,
            p_value: None,
            left_larger: None,
        }
    }

    fn from_outcome(test: TestKind, verdict: Verdict, outcome: TestOutcome) -> Self {
        Self {
            test,
            verdict,
            statistic: Some(outcome.statistic),
            p_value: Some(outcome.p_value),
            left_larger: outcome.left_larger,
        }
    }

    pub fn result(&self) -> StatisticalResult {
        self.verdict.into()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Smaller,
    Larger,
}

fn scale(samples: &[f64], factor: f64) -> Vec<f64> {
    samples.iter().map(|x| x * factor).collect()
}

fn one_sided(
    test: TestKind,
    left: &[f64],
    bound: &[f64],
    wanted: Direction,
    alpha: f64,
) -> ComparisonResult {
    let Some(outcome) = test.run(left, bound) else {
        return ComparisonResult::inconclusive(test);
    };

    let verdict = match outcome.left_larger {
        // A significant difference without a direction decides nothing
        Some(left_larger) if outcome.is_significant(alpha) => {
            if left_larger == (wanted == Direction::Larger) {
                Verdict::Holds
            } else {
                Verdict::DoesNotHold
            }
        }
        _ => Verdict::Inconclusive,
    };
    ComparisonResult::from_outcome(test, verdict, outcome)
}

fn equality(
    test: TestKind,
    left: &[f64],
    lower: &[f64],
    upper: &[f64],
    alpha: f64,
) -> ComparisonResult {
    let (Some(vs_lower), Some(vs_upper)) = (test.run(left, lower), test.run(left, upper)) else {
        return ComparisonResult::inconclusive(test);
    };

    let above_lower = vs_lower.is_significant(alpha) && vs_lower.left_larger == Some(true);
    let below_lower = vs_lower.is_significant(alpha) && vs_lower.left_larger == Some(false);
    let above_upper = vs_upper.is_significant(alpha) && vs_upper.left_larger == Some(true);
    let below_upper = vs_upper.is_significant(alpha) && vs_upper.left_larger == Some(false);

    if above_lower && below_upper {
        // Inside the band: report the weaker of the two one-sided results
        let reported = if vs_lower.p_value >= vs_upper.p_value {
            vs_lower
        } else {
            vs_upper
        };
        return ComparisonResult::from_outcome(test, Verdict::Holds, reported);
    }
    if below_lower {
        return ComparisonResult::from_outcome(test, Verdict::DoesNotHold, vs_lower);
    }
    if above_upper {
        return ComparisonResult::from_outcome(test, Verdict::DoesNotHold, vs_upper);
    }

    let reported = if vs_lower.p_value >= vs_upper.p_value {
        vs_lower
    } else {
        vs_upper
    };
    ComparisonResult::from_outcome(test, Verdict::Inconclusive, reported)
}

/// Map one test onto a verdict for `left <sign> right`
///
/// Both operands are already scaled and clipped.
///
/// # Example
/// ```
/// use perflogic::comparison::{decide, Verdict};
/// use perflogic::formula::Sign;
/// use perflogic::statistics::TestKind;
///
/// let fast = [1.0, 1.1, 0.9, 1.0, 1.05];
/// let slow = [5.0, 5.2, 4.9, 5.1, 5.0];
/// let result = decide(TestKind::TTest, Sign::Le, &fast, &slow, 0.05, 0.05);
/// assert_eq!(result.verdict, Verdict::Holds);
/// ```
pub fn decide(
    test: TestKind,
    sign: Sign,
    left: &[f64],
    right: &[f64],
    equality_interval: f64,
    alpha: f64,
) -> ComparisonResult {
    let lower = scale(right, 1.0 - equality_interval);
    let upper = scale(right, 1.0 + equality_interval);

    match sign {
        Sign::Lt => one_sided(test, left, &lower, Direction::Smaller, alpha),
        Sign::Le => one_sided(test, left, &upper, Direction::Smaller, alpha),
        Sign::Gt => one_sided(test, left, &upper, Direction::Larger, alpha),
        Sign::Ge => one_sided(test, left, &lower, Direction::Larger, alpha),
        Sign::Eq => equality(test, left, &lower, &upper, alpha),
        Sign::Ne => {
            let mut result = equality(test, left, &lower, &upper, alpha);
            result.verdict = result.verdict.negate();
            result
        }
    }
}

/// Reduce the three per-test results to the propagated verdict
pub fn primary_result(
    primary: PrimaryTest,
    t_test: &ComparisonResult,
    mann_whitney: &ComparisonResult,
    kolmogorov_smirnov: &ComparisonResult,
) -> StatisticalResult {
    match primary {
        PrimaryTest::TTest => t_test.result(),
        PrimaryTest::MannWhitney => mann_whitney.result(),
        PrimaryTest::KolmogorovSmirnov => kolmogorov_smirnov.result(),
        PrimaryTest::All => conjunction([
            t_test.result(),
            mann_whitney.result(),
            kolmogorov_smirnov.result(),
        ]),
    }
}

fn acquire<'a>(
    provider: &'a MeasurementSampleDataProvider,
    warnings: &mut Vec<String>,
) -> Result<Option<AcquiredData<'a>>> {
    match provider.acquire().map_err(EvalError::from) {
        Ok(data) => Ok(Some(data)),
        Err(EvalError::Aborted) => Err(EvalError::Aborted),
        Err(e) => {
            tracing::warn!("Failed to load samples of {}: {}", provider.measurement(), e);
            warnings.push(format!(
                "failed to load samples of {}: {}",
                provider.measurement(),
                e
            ));
            Ok(None)
        }
    }
}

fn check_lambda(side: &str, lambda: f64, comparison: &Comparison, warnings: &mut Vec<String>) {
    if lambda <= 0.0 {
        tracing::warn!(
            "Non-positive {} lambda {} in comparison {}",
            side,
            lambda,
            comparison
        );
        warnings.push(format!("{} lambda {} is not positive", side, lambda));
    }
}

/// Run all three tests for `comparison` and reduce them to one verdict
///
/// Missing or unreadable sample data makes every test INCONCLUSIVE; only
/// cancellation is returned as an error.
pub fn evaluate_comparison(
    comparison: &Comparison,
    left: Arc<MeasurementSample>,
    right: Arc<MeasurementSample>,
    config: &EvaluatorConfig,
) -> Result<ComparisonEvaluationResult> {
    let mut warnings = Vec::new();
    check_lambda("left", comparison.left_lambda, comparison, &mut warnings);
    check_lambda("right", comparison.right_lambda, comparison, &mut warnings);

    let alpha = config.alpha();
    let [t_test, mann_whitney, kolmogorov_smirnov] =
        if let (Some(left_provider), Some(right_provider)) = (left.provider(), right.provider()) {
            let left_data = acquire(left_provider, &mut warnings)?;
            let right_data = acquire(right_provider, &mut warnings)?;

            match (left_data, right_data) {
                (Some(l), Some(r)) => TestKind::ALL.map(|test| {
                    let clip = &config.settings(test).clip;
                    let left_view = l.view(comparison.left_lambda, clip);
                    let right_view = r.view(comparison.right_lambda, clip);
                    decide(
                        test,
                        comparison.sign,
                        &left_view,
                        &right_view,
                        config.equality_interval,
                        alpha,
                    )
                }),
                _ => TestKind::ALL.map(ComparisonResult::inconclusive),
            }
        } else {
            // No test runs on absent data
            warnings.extend(
                [left.label(), right.label()]
                    .into_iter()
                    .flatten()
                    .map(str::to_string),
            );
            TestKind::ALL.map(ComparisonResult::inconclusive)
        };

    let result = primary_result(
        config.primary_test,
        &t_test,
        &mann_whitney,
        &kolmogorov_smirnov,
    );

    Ok(ComparisonEvaluationResult {
        comparison: comparison.clone(),
        left_sample: left,
        right_sample: right,
        t_test,
        mann_whitney,
        kolmogorov_smirnov,
        result,
        warnings,
    })
}
