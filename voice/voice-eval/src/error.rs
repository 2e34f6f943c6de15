//! Error types for voice-eval crate.

use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// No samples to score.
    #[error("no samples to score")]
    EmptyInput,

    /// Predicted and expected label counts differ.
    #[error("length mismatch: {predicted} predictions vs {expected} expected labels")]
    LengthMismatch {
        /// Number of predicted labels.
        predicted: usize,
        /// Number of expected labels.
        expected: usize,
    },

    /// A label fell outside the class range.
    #[error("label {label} out of range for {num_classes} classes")]
    LabelOutOfRange {
        /// The offending label.
        label: u32,
        /// Number of known classes.
        num_classes: usize,
    },

    /// Inputs failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

impl EvalError {
    /// Creates a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(predicted: usize, expected: usize) -> Self {
        Self::LengthMismatch {
            predicted,
            expected,
        }
    }

    /// Creates a label out of range error.
    #[must_use]
    pub const fn label_out_of_range(label: u32, num_classes: usize) -> Self {
        Self::LabelOutOfRange { label, num_classes }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_input() {
        let err = EvalError::EmptyInput;
        assert!(err.to_string().contains("no samples"));
    }

    #[test]
    fn error_length_mismatch() {
        let err = EvalError::length_mismatch(3, 5);
        assert!(err.to_string().contains("3 predictions"));
        assert!(err.to_string().contains("5 expected"));
    }

    #[test]
    fn error_label_out_of_range() {
        let err = EvalError::label_out_of_range(7, 4);
        assert!(err.to_string().contains("label 7"));
        assert!(err.to_string().contains("4 classes"));
    }

    #[test]
    fn error_validation() {
        let err = EvalError::validation("class names required");
        assert!(err.to_string().contains("validation error"));
        assert!(err.to_string().contains("class names"));
    }
}
