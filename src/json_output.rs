//! JSON output format for evaluation results
//!
//! Formula trees are written in their flattened (n-ary) shape. Non-finite
//! statistics (e.g. an infinite t for zero-variance samples) serialize as
//! `null`.

use crate::comparison::ComparisonResult;
use crate::flatten::{flatten, FlatEvaluationResult};
use crate::formula::{Measurement, Operator, Sign};
use crate::logic::StatisticalResult;
use crate::result::{AnnotationEvaluationResult, ComparisonEvaluationResult};
use crate::sample::MeasurementSample;
use crate::statistics::SampleSummary;
use serde::{Deserialize, Serialize};

/// One comparison operand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSample {
    pub measurement: Measurement,
    pub lambda: f64,
    pub valid: bool,
    /// Samples loaded during the run (0 if invalid)
    pub sample_count: usize,
    /// Why the sample is invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Present when renderers requested graphs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SampleSummary>,
}

impl JsonSample {
    fn new(sample: &MeasurementSample, lambda: f64) -> Self {
        Self {
            measurement: sample.measurement().clone(),
            lambda,
            valid: sample.is_valid(),
            sample_count: sample.sample_count(),
            label: sample.label().map(str::to_string),
            summary: sample.summary(),
        }
    }
}

/// Node of a flattened formula tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonNode {
    Comparison {
        /// Human-readable form, e.g. `A[g]@m <= B[g]@m`
        text: String,
        sign: Sign,
        left: JsonSample,
        right: JsonSample,
        tests: Vec<ComparisonResult>,
        result: StatisticalResult,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    Logical {
        operator: Operator,
        result: StatisticalResult,
        operands: Vec<JsonNode>,
    },
}

impl JsonNode {
    fn from_comparison(c: &ComparisonEvaluationResult) -> Self {
        JsonNode::Comparison {
            text: c.comparison.to_string(),
            sign: c.comparison.sign,
            left: JsonSample::new(&c.left_sample, c.comparison.left_lambda),
            right: JsonSample::new(&c.right_sample, c.comparison.right_lambda),
            tests: c.test_results().into_iter().copied().collect(),
            result: c.result,
            warnings: c.warnings.clone(),
        }
    }

    fn from_flat(flat: &FlatEvaluationResult<'_>) -> Self {
        match flat {
            FlatEvaluationResult::Comparison(c) => Self::from_comparison(c),
            FlatEvaluationResult::Logical {
                operator,
                operands,
                result,
            } => JsonNode::Logical {
                operator: *operator,
                result: *result,
                operands: operands.iter().map(Self::from_flat).collect(),
            },
        }
    }
}

/// One evaluated formula declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFormula {
    pub text: String,
    pub result: StatisticalResult,
    pub tree: JsonNode,
}

/// All formulas of one program location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonAnnotation {
    pub location: String,
    pub result: StatisticalResult,
    pub formulas: Vec<JsonFormula>,
}

/// Verdict counts over the whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSummary {
    pub annotations: usize,
    pub formulas: usize,
    #[serde(rename = "true")]
    pub true_count: usize,
    #[serde(rename = "false")]
    pub false_count: usize,
    #[serde(rename = "unknown")]
    pub unknown_count: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Crate version that produced the report
    pub version: String,
    /// Format name
    pub format: String,
    pub annotations: Vec<JsonAnnotation>,
    pub summary: JsonSummary,
}

impl JsonReport {
    pub fn from_results(results: &[AnnotationEvaluationResult]) -> Self {
        let mut summary = JsonSummary {
            annotations: results.len(),
            ..JsonSummary::default()
        };

        let annotations = results
            .iter()
            .map(|annotation| {
                let formulas = annotation
                    .formulas
                    .iter()
                    .map(|formula| {
                        let result = formula.result();
                        summary.formulas += 1;
                        match result {
                            StatisticalResult::True => summary.true_count += 1,
                            StatisticalResult::False => summary.false_count += 1,
                            StatisticalResult::Unknown => summary.unknown_count += 1,
                        }
                        JsonFormula {
                            text: formula.declaration.text.clone(),
                            result,
                            tree: JsonNode::from_flat(&flatten(&formula.root)),
                        }
                    })
                    .collect();

                JsonAnnotation {
                    location: annotation.location.clone(),
                    result: annotation.result(),
                    formulas,
                }
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "perflogic-json-v1".to_string(),
            annotations,
            summary,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{Comparison, Formula, FormulaDeclaration};
    use crate::result::{EvaluationResult, FormulaEvaluationResult};
    use crate::sample::SampleCache;
    use crate::statistics::TestKind;
    use std::sync::Arc;

    fn unknown_formula(text: &str) -> FormulaEvaluationResult {
        let m = Measurement::new("A", "g", "m");
        let sample = Arc::new(SampleCache::invalid_sample(&m));
        let comparison = Comparison::new(m.clone(), Sign::Le, m);
        FormulaEvaluationResult {
            declaration: FormulaDeclaration {
                text: text.to_string(),
                formula: Formula::comparison(comparison.clone()),
            },
            root: EvaluationResult::Comparison(ComparisonEvaluationResult {
                comparison,
                left_sample: Arc::clone(&sample),
                right_sample: sample,
                t_test: ComparisonResult::inconclusive(TestKind::TTest),
                mann_whitney: ComparisonResult::inconclusive(TestKind::MannWhitney),
                kolmogorov_smirnov: ComparisonResult::inconclusive(TestKind::KolmogorovSmirnov),
                result: StatisticalResult::Unknown,
                warnings: vec!["no sample data".to_string()],
            }),
        }
    }

    #[test]
    fn test_report_summary_counts() {
        let results = vec![AnnotationEvaluationResult {
            location: "Sort.quick".to_string(),
            formulas: vec![unknown_formula("A <= A"), unknown_formula("A <= A again")],
        }];

        let report = JsonReport::from_results(&results);

        assert_eq!(report.format, "perflogic-json-v1");
        assert_eq!(
            report.summary,
            JsonSummary {
                annotations: 1,
                formulas: 2,
                true_count: 0,
                false_count: 0,
                unknown_count: 2,
            }
        );
        assert_eq!(report.annotations[0].result, StatisticalResult::Unknown);
    }

    #[test]
    fn test_json_serialization() {
        let results = vec![AnnotationEvaluationResult {
            location: "Sort.quick".to_string(),
            formulas: vec![unknown_formula("A <= A")],
        }];

        let json = JsonReport::from_results(&results).to_json().unwrap();

        assert!(json.contains("\"location\": \"Sort.quick\""));
        assert!(json.contains("\"type\": \"comparison\""));
        assert!(json.contains("\"verdict\": \"inconclusive\""));
        assert!(json.contains("\"unknown\": 1"));
        assert!(json.contains("\"warnings\""));
        assert!(!json.contains("\"label\": null"));
    }

    #[test]
    fn test_report_parses_back() {
        let results = vec![AnnotationEvaluationResult {
            location: "x".to_string(),
            formulas: vec![unknown_formula("A <= A")],
        }];
        let json = JsonReport::from_results(&results).to_json().unwrap();

        let parsed: JsonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.annotations[0].formulas[0].text, "A <= A");
        match &parsed.annotations[0].formulas[0].tree {
            JsonNode::Comparison { left, tests, .. } => {
                assert!(!left.valid);
                assert_eq!(left.sample_count, 0);
                assert_eq!(tests.len(), 3);
            }
            JsonNode::Logical { .. } => panic!("Expected comparison node"),
        }
    }
}
