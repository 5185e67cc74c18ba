//! N-ary view of a result tree for presentation
//!
//! Chains of the same associative operator collapse into one node:
//! `(a AND (b AND c))` becomes `AND[a, b, c]`. IMPLIES nodes and nodes with a
//! different operator start a new nested group. Verdicts are copied, never
//! recomputed.

use crate::formula::Operator;
use crate::logic::StatisticalResult;
use crate::result::{ComparisonEvaluationResult, EvaluationResult};

/// Borrowing, flattened view of an [`EvaluationResult`]
#[derive(Debug, Clone)]
pub enum FlatEvaluationResult<'a> {
    Comparison(&'a ComparisonEvaluationResult),
    Logical {
        operator: Operator,
        operands: Vec<FlatEvaluationResult<'a>>,
        result: StatisticalResult,
    },
}

impl FlatEvaluationResult<'_> {
    pub fn result(&self) -> StatisticalResult {
        match self {
            FlatEvaluationResult::Comparison(c) => c.result,
            FlatEvaluationResult::Logical { result, .. } => *result,
        }
    }

    /// Nesting depth; a single comparison has depth 1
    pub fn depth(&self) -> usize {
        match self {
            FlatEvaluationResult::Comparison(_) => 1,
            FlatEvaluationResult::Logical { operands, .. } => {
                1 + operands.iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }
}

/// Flatten `result` into n-ary groups
pub fn flatten(result: &EvaluationResult) -> FlatEvaluationResult<'_> {
    match result {
        EvaluationResult::Comparison(c) => FlatEvaluationResult::Comparison(c),
        EvaluationResult::LogicalOperation(node) => {
            let mut operands = Vec::new();
            collect_operands(node.operator, &node.left, &mut operands);
            collect_operands(node.operator, &node.right, &mut operands);
            FlatEvaluationResult::Logical {
                operator: node.operator,
                operands,
                result: node.result,
            }
        }
    }
}

fn collect_operands<'a>(
    operator: Operator,
    node: &'a EvaluationResult,
    out: &mut Vec<FlatEvaluationResult<'a>>,
) {
    match node {
        EvaluationResult::LogicalOperation(child)
            if operator.is_associative() && child.operator == operator =>
        {
            collect_operands(operator, &child.left, out);
            collect_operands(operator, &child.right, out);
        }
        other => out.push(flatten(other)),
    }
}
