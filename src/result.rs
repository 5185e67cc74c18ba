//! Evaluation result tree
//!
//! Mirrors the formula tree: one [`ComparisonEvaluationResult`] per comparison
//! leaf and one [`LogicalOperationEvaluationResult`] per inner node. Results
//! are built bottom-up during evaluation and not modified afterwards.

use crate::comparison::ComparisonResult;
use crate::formula::{Comparison, FormulaDeclaration, Operator};
use crate::logic::{conjunction, StatisticalResult};
use crate::sample::MeasurementSample;
use crate::statistics::TestKind;
use std::sync::Arc;

/// Outcome of one comparison leaf
#[derive(Debug, Clone)]
pub struct ComparisonEvaluationResult {
    pub comparison: Comparison,
    pub left_sample: Arc<MeasurementSample>,
    pub right_sample: Arc<MeasurementSample>,
    pub t_test: ComparisonResult,
    pub mann_whitney: ComparisonResult,
    pub kolmogorov_smirnov: ComparisonResult,
    /// Verdict propagated to the enclosing node
    pub result: StatisticalResult,
    /// Recovered problems (missing data, suspicious lambdas)
    pub warnings: Vec<String>,
}

impl ComparisonEvaluationResult {
    pub fn test_result(&self, test: TestKind) -> &ComparisonResult {
        match test {
            TestKind::TTest => &self.t_test,
            TestKind::MannWhitney => &self.mann_whitney,
            TestKind::KolmogorovSmirnov => &self.kolmogorov_smirnov,
        }
    }

    /// Per-test results in a fixed order
    pub fn test_results(&self) -> [&ComparisonResult; 3] {
        [&self.t_test, &self.mann_whitney, &self.kolmogorov_smirnov]
    }
}

/// Outcome of an AND / OR / IMPLIES node
#[derive(Debug, Clone)]
pub struct LogicalOperationEvaluationResult {
    pub operator: Operator,
    pub left: Box<EvaluationResult>,
    pub right: Box<EvaluationResult>,
    pub result: StatisticalResult,
}

/// Node of the evaluation result tree
#[derive(Debug, Clone)]
pub enum EvaluationResult {
    Comparison(ComparisonEvaluationResult),
    LogicalOperation(LogicalOperationEvaluationResult),
}

impl EvaluationResult {
    pub fn result(&self) -> StatisticalResult {
        match self {
            EvaluationResult::Comparison(c) => c.result,
            EvaluationResult::LogicalOperation(l) => l.result,
        }
    }

    /// Comparison leaves, left to right
    pub fn comparisons(&self) -> Vec<&ComparisonEvaluationResult> {
        let mut out = Vec::new();
        self.collect_comparisons(&mut out);
        out
    }

    fn collect_comparisons<'a>(&'a self, out: &mut Vec<&'a ComparisonEvaluationResult>) {
        match self {
            EvaluationResult::Comparison(c) => out.push(c),
            EvaluationResult::LogicalOperation(l) => {
                l.left.collect_comparisons(out);
                l.right.collect_comparisons(out);
            }
        }
    }
}

/// Result tree of one declared formula
#[derive(Debug, Clone)]
pub struct FormulaEvaluationResult {
    pub declaration: FormulaDeclaration,
    pub root: EvaluationResult,
}

impl FormulaEvaluationResult {
    pub fn result(&self) -> StatisticalResult {
        self.root.result()
    }
}

/// All formula results of one program location
#[derive(Debug, Clone)]
pub struct AnnotationEvaluationResult {
    pub location: String,
    pub formulas: Vec<FormulaEvaluationResult>,
}

impl AnnotationEvaluationResult {
    /// Kleene AND over the formula verdicts
    pub fn result(&self) -> StatisticalResult {
        conjunction(self.formulas.iter().map(FormulaEvaluationResult::result))
    }

    /// Number of formulas with the given verdict
    pub fn count(&self, result: StatisticalResult) -> usize {
        self.formulas.iter().filter(|f| f.result() == result).count()
    }
}
