//! Error types for voice-training crate.

use thiserror::Error;

/// Errors that can occur during training.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Invalid training configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input data failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Model error.
    #[error("model error: {0}")]
    Model(String),

    /// Checkpoint error.
    #[error("checkpoint error: {0}")]
    Checkpoint(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl TrainingError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Creates a model error.
    #[must_use]
    pub fn model(reason: impl Into<String>) -> Self {
        Self::Model(reason.into())
    }

    /// Creates a checkpoint error.
    #[must_use]
    pub fn checkpoint(reason: impl Into<String>) -> Self {
        Self::Checkpoint(reason.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization(reason.into())
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }
}

impl From<std::io::Error> for TrainingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrainingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<voice_model::ModelError> for TrainingError {
    fn from(err: voice_model::ModelError) -> Self {
        Self::Model(err.to_string())
    }
}

/// Result type for training operations.
pub type Result<T> = std::result::Result<T, TrainingError>;
