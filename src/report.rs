// Human-readable evaluation report
//
// Renders annotation results as an indented tree in flattened form. Each
// comparison lists the verdict of every test with its statistic and p-value.

use crate::comparison::ComparisonResult;
use crate::flatten::{flatten, FlatEvaluationResult};
use crate::logic::StatisticalResult;
use crate::result::{AnnotationEvaluationResult, ComparisonEvaluationResult};
use crate::sample::MeasurementSample;

fn marker(result: StatisticalResult) -> &'static str {
    match result {
        StatisticalResult::True => "✅",
        StatisticalResult::False => "❌",
        StatisticalResult::Unknown => "❔",
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value)
    } else {
        value.to_string()
    }
}

fn push_test(report: &mut String, indent: &str, result: &ComparisonResult) {
    report.push_str(&format!("{}{}: {}", indent, result.test, result.verdict));
    if let (Some(statistic), Some(p)) = (result.statistic, result.p_value) {
        report.push_str(&format!(
            " (statistic={}, p={})",
            format_number(statistic),
            format_number(p)
        ));
    }
    report.push('\n');
}

fn push_sample(report: &mut String, indent: &str, sample: &MeasurementSample) {
    match (sample.label(), sample.summary()) {
        (Some(label), _) => {
            report.push_str(&format!("{}{}: {}\n", indent, sample.measurement(), label));
        }
        (None, Some(summary)) => {
            report.push_str(&format!(
                "{}{}: n={}, mean={}, median={}, sd={}\n",
                indent,
                sample.measurement(),
                summary.count,
                format_number(summary.mean),
                format_number(summary.median),
                format_number(summary.std_dev)
            ));
        }
        (None, None) => {}
    }
}

fn push_comparison(report: &mut String, depth: usize, c: &ComparisonEvaluationResult) {
    let indent = "  ".repeat(depth);
    let detail = "  ".repeat(depth + 1);

    report.push_str(&format!(
        "{}{} {}  {}\n",
        indent,
        marker(c.result),
        c.result,
        c.comparison
    ));
    for test in c.test_results() {
        push_test(report, &detail, test);
    }
    push_sample(report, &detail, &c.left_sample);
    if c.comparison.right != c.comparison.left {
        push_sample(report, &detail, &c.right_sample);
    }
    for warning in &c.warnings {
        report.push_str(&format!("{}⚠️  {}\n", detail, warning));
    }
}

fn push_node(report: &mut String, depth: usize, node: &FlatEvaluationResult<'_>) {
    match node {
        FlatEvaluationResult::Comparison(c) => push_comparison(report, depth, c),
        FlatEvaluationResult::Logical {
            operator,
            operands,
            result,
        } => {
            report.push_str(&format!(
                "{}{} {} {}\n",
                "  ".repeat(depth),
                marker(*result),
                operator,
                result
            ));
            for operand in operands {
                push_node(report, depth + 1, operand);
            }
        }
    }
}

/// Render one annotation and all of its formulas
pub fn to_report_string(annotation: &AnnotationEvaluationResult) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "📍 {}: {} ({} formula(s))\n",
        annotation.location,
        annotation.result(),
        annotation.formulas.len()
    ));

    for formula in &annotation.formulas {
        report.push_str(&format!(
            "  {} {}  {}\n",
            marker(formula.result()),
            formula.result(),
            formula.declaration.text
        ));
        push_node(&mut report, 2, &flatten(&formula.root));
    }

    report
}

/// Render a whole run followed by verdict totals
pub fn to_run_report_string(results: &[AnnotationEvaluationResult]) -> String {
    let mut report = String::new();
    for annotation in results {
        report.push_str(&to_report_string(annotation));
        report.push('\n');
    }

    let count = |r: StatisticalResult| results.iter().map(|a| a.count(r)).sum::<usize>();
    report.push_str(&format!(
        "📊 {} formula(s): {} true, {} false, {} unknown\n",
        results.iter().map(|a| a.formulas.len()).sum::<usize>(),
        count(StatisticalResult::True),
        count(StatisticalResult::False),
        count(StatisticalResult::Unknown)
    ));
    report
}
