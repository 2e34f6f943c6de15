//! Error types for voice-dataset crate.

use thiserror::Error;

/// Errors that can occur in voice-dataset operations.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Corpus contains no utterances.
    #[error("corpus is empty")]
    EmptyCorpus,

    /// Corpus is too small to partition into three splits.
    #[error("corpus has {0} utterances; at least 3 are required to split")]
    CorpusTooSmall(usize),

    /// Feature vector has the wrong length.
    #[error("utterance {index} has {actual} features, expected {expected}")]
    RaggedFeatures {
        /// Index of the offending utterance.
        index: usize,
        /// Expected feature length.
        expected: usize,
        /// Actual feature length.
        actual: usize,
    },

    /// Label is outside the class range.
    #[error("utterance {index} has label {label}, but only {num_classes} classes are defined")]
    LabelOutOfRange {
        /// Index of the offending utterance.
        index: usize,
        /// The out-of-range label.
        label: u32,
        /// Number of defined classes.
        num_classes: usize,
    },

    /// Invalid split fractions.
    #[error("invalid split fractions: test={test}, val={val} (each must be in (0, 1) and sum below 1)")]
    InvalidSplitFractions {
        /// Test hold-out fraction.
        test: f32,
        /// Validation hold-out fraction.
        val: f32,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),
}

impl DatasetError {
    /// Creates a corpus-too-small error.
    #[must_use]
    pub const fn corpus_too_small(len: usize) -> Self {
        Self::CorpusTooSmall(len)
    }

    /// Creates a ragged-features error.
    #[must_use]
    pub const fn ragged_features(index: usize, expected: usize, actual: usize) -> Self {
        Self::RaggedFeatures {
            index,
            expected,
            actual,
        }
    }

    /// Creates a label-out-of-range error.
    #[must_use]
    pub const fn label_out_of_range(index: usize, label: u32, num_classes: usize) -> Self {
        Self::LabelOutOfRange {
            index,
            label,
            num_classes,
        }
    }

    /// Creates an invalid split fractions error.
    #[must_use]
    pub const fn invalid_split_fractions(test: f32, val: f32) -> Self {
        Self::InvalidSplitFractions { test, val }
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization(reason.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for voice-dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_corpus_too_small() {
        let err = DatasetError::corpus_too_small(2);
        assert!(err.to_string().contains('2'));
        assert!(err.to_string().contains("at least 3"));
    }

    #[test]
    fn error_ragged_features() {
        let err = DatasetError::ragged_features(7, 26, 24);
        assert!(err.to_string().contains('7'));
        assert!(err.to_string().contains("26"));
        assert!(err.to_string().contains("24"));
    }

    #[test]
    fn error_label_out_of_range() {
        let err = DatasetError::label_out_of_range(3, 9, 4);
        assert!(err.to_string().contains("label 9"));
        assert!(err.to_string().contains("4 classes"));
    }

    #[test]
    fn error_invalid_split_fractions() {
        let err = DatasetError::invalid_split_fractions(0.7, 0.5);
        assert!(err.to_string().contains("0.7"));
        assert!(err.to_string().contains("0.5"));
    }

    #[test]
    fn error_validation() {
        let err = DatasetError::validation("missing class names");
        assert!(err.to_string().contains("missing class names"));
    }

    #[test]
    fn error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: DatasetError = io_err.into();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[test]
    fn error_from_serde_error() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: DatasetError = json_err.into();
        assert!(matches!(err, DatasetError::Serialization(_)));
    }
}
