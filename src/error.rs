//! Error types for the evaluation engine
//!
//! Missing or malformed sample data is not fatal for a run: the engine turns it
//! into inconclusive verdicts. The variants here are what surfaces when that
//! recovery is not possible, plus cancellation, which is an expected outcome
//! rather than a failure.

use thiserror::Error;

/// Errors raised while decoding a sample file
#[derive(Error, Debug)]
pub enum SampleFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sample file has no identification line")]
    MissingIdentification,

    #[error("Malformed sample on line {line}: {content:?}")]
    MalformedSample { line: usize, content: String },

    #[error("Sample read aborted")]
    Aborted,
}

/// Errors raised by the evaluator
#[derive(Error, Debug)]
pub enum EvalError {
    /// The run was cancelled through its `CancellationToken`
    #[error("Evaluation aborted")]
    Aborted,

    /// Sample data that could not be loaded; the evaluator downgrades it
    /// to an inconclusive comparison
    #[error("Sample data error: {0}")]
    Sample(SampleFileError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Evaluation worker failed: {0}")]
    Worker(String),
}

impl EvalError {
    /// True if the run stopped because it was cancelled
    pub fn is_aborted(&self) -> bool {
        matches!(self, EvalError::Aborted)
    }
}

impl From<SampleFileError> for EvalError {
    fn from(err: SampleFileError) -> Self {
        match err {
            SampleFileError::Aborted => EvalError::Aborted,
            other => EvalError::Sample(other),
        }
    }
}

/// Result type for evaluator operations
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborted_read_maps_to_aborted_run() {
        let err: EvalError = SampleFileError::Aborted.into();
        assert!(err.is_aborted());
    }

    #[test]
    fn test_malformed_sample_is_data_error() {
        let err: EvalError = SampleFileError::MalformedSample {
            line: 4,
            content: "abc".to_string(),
        }
        .into();

        assert!(!err.is_aborted());
        assert!(matches!(err, EvalError::Sample(_)));
        assert!(err.to_string().contains("line 4"));
    }
}
