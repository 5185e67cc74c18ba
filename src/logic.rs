//! Three-valued (Kleene) logic over statistical verdicts
//!
//! Statistical tests can be inconclusive, so truth values propagated through a
//! formula tree are TRUE, FALSE or UNKNOWN. AND and OR are commutative and
//! associative; UNKNOWN only survives when the other operand does not already
//! decide the result. IMPLIES is `!A OR B` and is not commutative.

use crate::formula::Operator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Truth value propagated through the evaluation tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticalResult {
    True,
    False,
    Unknown,
}

impl StatisticalResult {
    pub fn from_bool(value: bool) -> Self {
        if value {
            StatisticalResult::True
        } else {
            StatisticalResult::False
        }
    }

    pub fn is_true(self) -> bool {
        self == StatisticalResult::True
    }

    pub fn is_false(self) -> bool {
        self == StatisticalResult::False
    }

    pub fn is_unknown(self) -> bool {
        self == StatisticalResult::Unknown
    }
}

impl fmt::Display for StatisticalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatisticalResult::True => "TRUE",
            StatisticalResult::False => "FALSE",
            StatisticalResult::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

impl std::ops::Not for StatisticalResult {
    type Output = StatisticalResult;

    fn not(self) -> Self::Output {
        negate(self)
    }
}

/// Three-valued negation; UNKNOWN stays UNKNOWN
pub fn negate(value: StatisticalResult) -> StatisticalResult {
    match value {
        StatisticalResult::True => StatisticalResult::False,
        StatisticalResult::False => StatisticalResult::True,
        StatisticalResult::Unknown => StatisticalResult::Unknown,
    }
}

fn and(left: StatisticalResult, right: StatisticalResult) -> StatisticalResult {
    use StatisticalResult::{False, True, Unknown};
    match (left, right) {
        (False, _) | (_, False) => False,
        (True, True) => True,
        (Unknown, _) | (_, Unknown) => Unknown,
    }
}

fn or(left: StatisticalResult, right: StatisticalResult) -> StatisticalResult {
    use StatisticalResult::{False, True, Unknown};
    match (left, right) {
        (True, _) | (_, True) => True,
        (False, False) => False,
        (Unknown, _) | (_, Unknown) => Unknown,
    }
}

/// Combine two verdicts with a logical operator
///
/// # Example
/// ```
/// use perflogic::formula::Operator;
/// use perflogic::logic::{combine, StatisticalResult};
///
/// assert_eq!(
///     combine(Operator::And, StatisticalResult::False, StatisticalResult::Unknown),
///     StatisticalResult::False
/// );
/// assert_eq!(
///     combine(Operator::Implies, StatisticalResult::False, StatisticalResult::Unknown),
///     StatisticalResult::True
/// );
/// ```
pub fn combine(
    operator: Operator,
    left: StatisticalResult,
    right: StatisticalResult,
) -> StatisticalResult {
    match operator {
        Operator::And => and(left, right),
        Operator::Or => or(left, right),
        Operator::Implies => or(negate(left), right),
    }
}

/// Kleene AND over any number of verdicts; TRUE for an empty input
pub fn conjunction(values: impl IntoIterator<Item = StatisticalResult>) -> StatisticalResult {
    values
        .into_iter()
        .fold(StatisticalResult::True, |acc, v| and(acc, v))
}
