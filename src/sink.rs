//! Incremental result callbacks
//!
//! Renderers observe a run through an [`EvaluationSink`]. Events arrive in
//! post-order: both samples and the comparison of each leaf, then the formula
//! containing them, then the annotation, and `done` once after the run.

use crate::result::{
    AnnotationEvaluationResult, ComparisonEvaluationResult, FormulaEvaluationResult,
};
use crate::sample::MeasurementSample;
use std::sync::Arc;

/// Observer of evaluation progress; every callback defaults to a no-op
pub trait EvaluationSink {
    fn on_sample(&mut self, _sample: &Arc<MeasurementSample>) {}

    fn on_comparison(&mut self, _result: &ComparisonEvaluationResult) {}

    fn on_formula(&mut self, _result: &FormulaEvaluationResult) {}

    fn on_annotation(&mut self, _result: &AnnotationEvaluationResult) {}

    /// The run completed
    fn done(&mut self) {}
}

/// Sink that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EvaluationSink for NullSink {}

/// One recorded callback
#[derive(Debug, Clone)]
pub enum SinkEvent {
    Sample(Arc<MeasurementSample>),
    Comparison(ComparisonEvaluationResult),
    Formula(FormulaEvaluationResult),
    Annotation(AnnotationEvaluationResult),
    Done,
}

/// Sink that stores events for later replay
///
/// Parallel runs give each worker its own recorder and replay them into the
/// caller's sink in input order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<SinkEvent> {
        self.events
    }

    /// Forward every recorded event to `sink`, in recording order
    pub fn replay_into(self, sink: &mut dyn EvaluationSink) {
        for event in self.events {
            match event {
                SinkEvent::Sample(sample) => sink.on_sample(&sample),
                SinkEvent::Comparison(result) => sink.on_comparison(&result),
                SinkEvent::Formula(result) => sink.on_formula(&result),
                SinkEvent::Annotation(result) => sink.on_annotation(&result),
                SinkEvent::Done => sink.done(),
            }
        }
    }
}

impl EvaluationSink for RecordingSink {
    fn on_sample(&mut self, sample: &Arc<MeasurementSample>) {
        self.events.push(SinkEvent::Sample(Arc::clone(sample)));
    }

    fn on_comparison(&mut self, result: &ComparisonEvaluationResult) {
        self.events.push(SinkEvent::Comparison(result.clone()));
    }

    fn on_formula(&mut self, result: &FormulaEvaluationResult) {
        self.events.push(SinkEvent::Formula(result.clone()));
    }

    fn on_annotation(&mut self, result: &AnnotationEvaluationResult) {
        self.events.push(SinkEvent::Annotation(result.clone()));
    }

    fn done(&mut self) {
        self.events.push(SinkEvent::Done);
    }
}

/// Sink that logs verdicts through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EvaluationSink for TracingSink {
    fn on_comparison(&mut self, result: &ComparisonEvaluationResult) {
        tracing::debug!(
            "{} => {} (t-test {}, Mann-Whitney {}, KS {})",
            result.comparison,
            result.result,
            result.t_test.verdict,
            result.mann_whitney.verdict,
            result.kolmogorov_smirnov.verdict
        );
        for warning in &result.warnings {
            tracing::debug!("  warning: {}", warning);
        }
    }

    fn on_formula(&mut self, result: &FormulaEvaluationResult) {
        tracing::info!("{} => {}", result.declaration.text, result.result());
    }

    fn on_annotation(&mut self, result: &AnnotationEvaluationResult) {
        tracing::info!(
            "{}: {} formula(s), overall {}",
            result.location,
            result.formulas.len(),
            result.result()
        );
    }

    fn done(&mut self) {
        tracing::debug!("Evaluation run complete");
    }
}

/// Sink that forwards every event to two sinks, first then second
pub struct TeeSink<'a> {
    first: &'a mut dyn EvaluationSink,
    second: &'a mut dyn EvaluationSink,
}

impl<'a> TeeSink<'a> {
    pub fn new(first: &'a mut dyn EvaluationSink, second: &'a mut dyn EvaluationSink) -> Self {
        Self { first, second }
    }
}

impl EvaluationSink for TeeSink<'_> {
    fn on_sample(&mut self, sample: &Arc<MeasurementSample>) {
        self.first.on_sample(sample);
        self.second.on_sample(sample);
    }

    fn on_comparison(&mut self, result: &ComparisonEvaluationResult) {
        self.first.on_comparison(result);
        self.second.on_comparison(result);
    }

    fn on_formula(&mut self, result: &FormulaEvaluationResult) {
        self.first.on_formula(result);
        self.second.on_formula(result);
    }

    fn on_annotation(&mut self, result: &AnnotationEvaluationResult) {
        self.first.on_annotation(result);
        self.second.on_annotation(result);
    }

    fn done(&mut self) {
        self.first.done();
        self.second.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Measurement;

    #[test]
    fn test_recording_replays_in_order() {
        let a = Arc::new(MeasurementSample::invalid(Measurement::new("A", "g", "m"), "x"));
        let b = Arc::new(MeasurementSample::invalid(Measurement::new("B", "g", "m"), "y"));

        let mut recorder = RecordingSink::new();
        recorder.on_sample(&a);
        recorder.on_sample(&b);
        recorder.done();

        let mut replayed = RecordingSink::new();
        recorder.replay_into(&mut replayed);

        let events = replayed.into_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], SinkEvent::Sample(s) if Arc::ptr_eq(s, &a)));
        assert!(matches!(&events[1], SinkEvent::Sample(s) if Arc::ptr_eq(s, &b)));
        assert!(matches!(events[2], SinkEvent::Done));
    }

    #[test]
    fn test_tee_forwards_to_both() {
        let a = Arc::new(MeasurementSample::invalid(Measurement::new("A", "g", "m"), "x"));
        let mut first = RecordingSink::new();
        let mut second = RecordingSink::new();

        {
            let mut tee = TeeSink::new(&mut first, &mut second);
            tee.on_sample(&a);
            tee.done();
        }

        assert_eq!(first.events().len(), 2);
        assert_eq!(second.events().len(), 2);
    }
}
