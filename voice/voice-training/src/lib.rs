//! Training lifecycle for the VoiceForge classifier.
//!
//! This crate drives the full training recipe and records everything a
//! run produces:
//!
//! # Training Components
//!
//! - [`TrainingConfig`] - Configuration for training runs
//! - [`fit`] - Epoch loop with best-weights checkpointing
//! - [`evaluate`] / [`predictions`] - Inference over held-out splits
//! - [`TrainingHistory`] - Per-epoch metrics with best tracking
//!
//! # Run Artifacts
//!
//! - [`MetricsLogger`] - JSON-lines log, one record per epoch
//! - [`render_curves_svg`] - Stacked accuracy/loss curves
//! - [`RunManifest`] - Self-describing run metadata
//!
//! # Example
//!
//! ```ignore
//! use voice_training::{TrainingConfig, fit};
//! use voice_model::{ClassifierConfig, VoiceClassifier};
//!
//! let config = TrainingConfig::default();
//! let model_config = ClassifierConfig::for_corpus(corpus.feature_len, corpus.class_names.len());
//! let model = VoiceClassifier::new(model_config, &device);
//!
//! let (model, history, artifacts) =
//!     fit(model, &splits.train, &splits.val, &config, run_dir, &device)?;
//! println!("{}", history.summary());
//! ```
//!
//! # Quality Standards
//!
//! This crate maintains A-grade standards:
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod batch;
mod config;
mod curves;
mod error;
mod manifest;
mod metrics;
mod trainer;

// Re-export configuration
pub use config::{MonitorMode, MonitoredMetric, OptimizerConfig, TrainingConfig};

// Re-export metrics
pub use metrics::{EpochMetrics, EvalMetrics, TrainingHistory};

// Re-export trainer
pub use trainer::{
    evaluate, fit, predictions, MetricsLogger, TrainerArtifacts, CHECKPOINT_STEM, METRICS_LOG_FILE,
};

// Re-export batching
pub use batch::{batch_tensors, batch_tensors_at};

// Re-export curves
pub use curves::{render_curves_svg, write_curves_svg, CurveParams};

// Re-export manifest
pub use manifest::{ArtifactPaths, RunManifest, SchemaVersion, MANIFEST_FILE};

// Re-export error types
pub use error::{Result, TrainingError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        evaluate, fit, predictions, render_curves_svg, write_curves_svg, ArtifactPaths,
        CurveParams, EpochMetrics, EvalMetrics, MetricsLogger, MonitorMode, MonitoredMetric,
        OptimizerConfig, RunManifest, SchemaVersion, TrainerArtifacts, TrainingConfig,
        TrainingError, TrainingHistory,
    };
}
