//! Formula model
//!
//! A formula is a boolean expression whose leaves compare two measured
//! quantities and whose inner nodes combine sub-formulas with AND, OR and
//! IMPLIES. Formulas arrive fully resolved (no aliases) from the formula
//! parser; the engine never mutates them.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "type": "comparison",
//!   "left": { "method": "Sort.quick", "generator": "random-1k", "machine": "lab-01" },
//!   "sign": "<=",
//!   "right": { "method": "Sort.bubble", "generator": "random-1k", "machine": "lab-01" },
//!   "right_lambda": 0.5
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one measured data series
///
/// Two measurements with equal fields are interchangeable; the sample cache
/// keys on value equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Measurement {
    /// Executable method identity
    pub method: String,
    /// Data generator identity
    pub generator: String,
    /// Execution machine identity
    pub machine: String,
}

impl Measurement {
    pub fn new(
        method: impl Into<String>,
        generator: impl Into<String>,
        machine: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            generator: generator.into(),
            machine: machine.into(),
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]@{}", self.method, self.generator, self.machine)
    }
}

/// Relational sign of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sign::Lt => "<",
            Sign::Le => "<=",
            Sign::Eq => "=",
            Sign::Ne => "!=",
            Sign::Ge => ">=",
            Sign::Gt => ">",
        };
        f.write_str(s)
    }
}

/// Logical operator of an inner formula node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    And,
    Or,
    Implies,
}

impl Operator {
    /// AND and OR chains may be regrouped; IMPLIES is order-sensitive
    pub fn is_associative(self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Implies => "IMPLIES",
        };
        f.write_str(s)
    }
}

fn default_lambda() -> f64 {
    1.0
}

fn is_default_lambda(lambda: &f64) -> bool {
    *lambda == 1.0
}

/// Leaf formula: `left_lambda * left  <sign>  right_lambda * right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub left: Measurement,

    /// Scalar multiplier applied to every left sample
    #[serde(default = "default_lambda", skip_serializing_if = "is_default_lambda")]
    pub left_lambda: f64,

    pub sign: Sign,

    pub right: Measurement,

    /// Scalar multiplier applied to every right sample
    #[serde(default = "default_lambda", skip_serializing_if = "is_default_lambda")]
    pub right_lambda: f64,
}

impl Comparison {
    pub fn new(left: Measurement, sign: Sign, right: Measurement) -> Self {
        Self {
            left,
            left_lambda: 1.0,
            sign,
            right,
            right_lambda: 1.0,
        }
    }

    pub fn with_lambdas(mut self, left_lambda: f64, right_lambda: f64) -> Self {
        self.left_lambda = left_lambda;
        self.right_lambda = right_lambda;
        self
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !is_default_lambda(&self.left_lambda) {
            write!(f, "{} * ", self.left_lambda)?;
        }
        write!(f, "{} {} ", self.left, self.sign)?;
        if !is_default_lambda(&self.right_lambda) {
            write!(f, "{} * ", self.right_lambda)?;
        }
        write!(f, "{}", self.right)
    }
}

/// Inner formula node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub operator: Operator,
    pub left: Box<Formula>,
    pub right: Box<Formula>,
}

/// Boolean expression tree over performance comparisons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Formula {
    Comparison(Comparison),
    Expression(Expression),
}

impl Formula {
    pub fn comparison(comparison: Comparison) -> Self {
        Formula::Comparison(comparison)
    }

    pub fn expression(operator: Operator, left: Formula, right: Formula) -> Self {
        Formula::Expression(Expression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Self::expression(Operator::And, left, right)
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Self::expression(Operator::Or, left, right)
    }

    pub fn implies(left: Formula, right: Formula) -> Self {
        Self::expression(Operator::Implies, left, right)
    }

    /// Number of comparison leaves
    pub fn comparison_count(&self) -> usize {
        match self {
            Formula::Comparison(_) => 1,
            Formula::Expression(e) => e.left.comparison_count() + e.right.comparison_count(),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Comparison(c) => write!(f, "{}", c),
            Formula::Expression(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
        }
    }
}

/// A formula together with the declaration text it was parsed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaDeclaration {
    /// Original declaration text, kept for reports
    pub text: String,
    pub formula: Formula,
}

/// All formula declarations found at one program location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Program location (e.g. `Sort.quick` or `src/sort.rs:42`)
    pub location: String,
    #[serde(default)]
    pub formulas: Vec<FormulaDeclaration>,
}
