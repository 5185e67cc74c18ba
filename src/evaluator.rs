// Formula tree evaluator
//
// Walks formulas depth-first. Both operands of every logical node are
// evaluated (no short-circuit) because each comparison's statistics are
// reported, not only the verdict. Annotations are independent of each other;
// with `parallelism > 1` they are spread over scoped worker threads and the
// recorded sink events are replayed in input order.

use crate::cancel::CancellationToken;
use crate::comparison::evaluate_comparison;
use crate::config::EvaluatorConfig;
use crate::error::{EvalError, Result};
use crate::formula::{Annotation, Comparison, Formula, FormulaDeclaration};
use crate::logic::combine;
use crate::result::{
    AnnotationEvaluationResult, ComparisonEvaluationResult, EvaluationResult,
    FormulaEvaluationResult, LogicalOperationEvaluationResult,
};
use crate::sample::{SampleCache, SampleStore};
use crate::sink::{EvaluationSink, RecordingSink};
use crossbeam::queue::ArrayQueue;
use std::sync::{Arc, Mutex};

/// Evaluates formulas against one sample store for the duration of a run
///
/// # Example
/// ```no_run
/// use perflogic::config::EvaluatorConfig;
/// use perflogic::evaluator::Evaluator;
/// use perflogic::sample::DirectorySampleStore;
/// use perflogic::sink::NullSink;
/// use std::sync::Arc;
///
/// let store = Arc::new(DirectorySampleStore::new("samples"));
/// let evaluator = Evaluator::new(EvaluatorConfig::default(), store).unwrap();
/// let results = evaluator.run(&[], &mut NullSink).unwrap();
/// assert!(results.is_empty());
/// ```
pub struct Evaluator {
    config: EvaluatorConfig,
    cache: SampleCache,
    cancel: CancellationToken,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig, store: Arc<dyn SampleStore>) -> Result<Self> {
        Self::with_cancellation(config, store, CancellationToken::new())
    }

    /// Evaluator polling `cancel` at every checkpoint
    pub fn with_cancellation(
        config: EvaluatorConfig,
        store: Arc<dyn SampleStore>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        config.validate().map_err(EvalError::Config)?;
        let cache = SampleCache::new(store, cancel.clone(), config.wants_summaries());
        Ok(Self {
            config,
            cache,
            cancel,
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn cache(&self) -> &SampleCache {
        &self.cache
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    fn evaluate_leaf(
        &self,
        comparison: &Comparison,
        sink: &mut dyn EvaluationSink,
    ) -> Result<ComparisonEvaluationResult> {
        self.cancel.checkpoint()?;

        let left = self.cache.get_sample(&comparison.left)?;
        let right = self.cache.get_sample(&comparison.right)?;
        let result = evaluate_comparison(comparison, left, right, &self.config)?;

        sink.on_sample(&result.left_sample);
        sink.on_sample(&result.right_sample);
        sink.on_comparison(&result);
        Ok(result)
    }

    /// Evaluate a formula tree
    pub fn evaluate(
        &self,
        formula: &Formula,
        sink: &mut dyn EvaluationSink,
    ) -> Result<EvaluationResult> {
        match formula {
            Formula::Comparison(comparison) => {
                Ok(EvaluationResult::Comparison(self.evaluate_leaf(comparison, sink)?))
            }
            Formula::Expression(expression) => {
                let left = self.evaluate(&expression.left, sink)?;
                let right = self.evaluate(&expression.right, sink)?;
                let result = combine(expression.operator, left.result(), right.result());

                Ok(EvaluationResult::LogicalOperation(
                    LogicalOperationEvaluationResult {
                        operator: expression.operator,
                        left: Box::new(left),
                        right: Box::new(right),
                        result,
                    },
                ))
            }
        }
    }

    /// Evaluate one declared formula and report it
    pub fn evaluate_formula(
        &self,
        declaration: &FormulaDeclaration,
        sink: &mut dyn EvaluationSink,
    ) -> Result<FormulaEvaluationResult> {
        self.cancel.checkpoint()?;

        let root = self.evaluate(&declaration.formula, sink)?;
        let result = FormulaEvaluationResult {
            declaration: declaration.clone(),
            root,
        };
        tracing::debug!("Formula '{}' => {}", declaration.text, result.result());

        sink.on_formula(&result);
        Ok(result)
    }

    /// Evaluate every formula of an annotation and report it
    pub fn evaluate_annotation(
        &self,
        annotation: &Annotation,
        sink: &mut dyn EvaluationSink,
    ) -> Result<AnnotationEvaluationResult> {
        let formulas = annotation
            .formulas
            .iter()
            .map(|declaration| self.evaluate_formula(declaration, sink))
            .collect::<Result<Vec<_>>>()?;

        let result = AnnotationEvaluationResult {
            location: annotation.location.clone(),
            formulas,
        };
        sink.on_annotation(&result);
        Ok(result)
    }

    /// Evaluate all annotations, then signal `done`
    ///
    /// Results and sink events are in input order regardless of parallelism.
    /// Cancellation returns `EvalError::Aborted` and skips `done`.
    pub fn run(
        &self,
        annotations: &[Annotation],
        sink: &mut dyn EvaluationSink,
    ) -> Result<Vec<AnnotationEvaluationResult>> {
        tracing::debug!(
            "Evaluating {} annotation(s) with parallelism {}",
            annotations.len(),
            self.config.parallelism
        );

        let results = if self.config.parallelism <= 1 || annotations.len() <= 1 {
            annotations
                .iter()
                .map(|annotation| self.evaluate_annotation(annotation, sink))
                .collect::<Result<Vec<_>>>()?
        } else {
            self.run_parallel(annotations, sink)?
        };

        sink.done();
        Ok(results)
    }

    fn run_parallel(
        &self,
        annotations: &[Annotation],
        sink: &mut dyn EvaluationSink,
    ) -> Result<Vec<AnnotationEvaluationResult>> {
        type Slot = Mutex<Option<Result<(AnnotationEvaluationResult, RecordingSink)>>>;

        let queue = ArrayQueue::new(annotations.len());
        for index in 0..annotations.len() {
            // Capacity equals the number of pushes
            let _ = queue.push(index);
        }
        let slots: Vec<Slot> = annotations.iter().map(|_| Mutex::new(None)).collect();
        let workers = self.config.parallelism.min(annotations.len());

        crossbeam::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|_| {
                    while let Some(index) = queue.pop() {
                        let mut recorder = RecordingSink::new();
                        let outcome = self
                            .evaluate_annotation(&annotations[index], &mut recorder)
                            .map(|result| (result, recorder));
                        *slots[index]
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(outcome);
                    }
                });
            }
        })
        .map_err(|_| EvalError::Worker("evaluation worker panicked".to_string()))?;

        let mut results = Vec::with_capacity(annotations.len());
        for (index, slot) in slots.into_iter().enumerate() {
            let outcome = slot
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match outcome {
                Some(Ok((result, recorder))) => {
                    recorder.replay_into(sink);
                    results.push(result);
                }
                Some(Err(e)) => return Err(e),
                None => {
                    return Err(EvalError::Worker(format!(
                        "annotation {} was not evaluated",
                        annotations[index].location
                    )));
                }
            }
        }
        Ok(results)
    }
}
