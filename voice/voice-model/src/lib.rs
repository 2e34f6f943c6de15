//! Voice-command classifier model for VoiceForge.
//!
//! This crate provides the model layer of the voice-command training
//! pipeline:
//!
//! # Model
//!
//! - [`ClassifierConfig`] - Network shape derived from the corpus
//! - [`VoiceClassifier`] - Feed-forward Burn module (Linear/Dropout stack)
//!
//! # Checkpoints
//!
//! - [`CheckpointFormat`] - Binary or JSON persistence
//! - [`save_checkpoint`] / [`load_checkpoint`] - Best-only weight storage
//!
//! # Firmware Export
//!
//! - [`ModelExport`] - Trained weights reduced to plain arrays
//! - [`write_c_header`] - Self-contained C header for embedding
//!
//! # Example
//!
//! ```
//! use burn_ndarray::NdArray;
//! use burn::prelude::Backend;
//! use burn::tensor::Tensor;
//! use voice_model::{ClassifierConfig, VoiceClassifier};
//!
//! type B = NdArray<f32>;
//!
//! let config = ClassifierConfig::for_corpus(26, 3);
//! let device = <B as Backend>::Device::default();
//! let model = VoiceClassifier::<B>::new(config, &device);
//!
//! let input = Tensor::<B, 2>::zeros([1, 26], &device);
//! assert_eq!(model.forward(input).dims(), [1, 3]);
//! ```
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod checkpoint;
mod classifier;
mod error;
mod export;

// Re-export model types
pub use classifier::{ClassifierConfig, VoiceClassifier};

// Re-export checkpoint utilities
pub use checkpoint::{CheckpointFormat, load_checkpoint, save_checkpoint};

// Re-export firmware export types
pub use export::{DenseLayer, ExportParams, ModelExport, write_c_header};

// Re-export error types
pub use error::{ModelError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        CheckpointFormat, ClassifierConfig, DenseLayer, ExportParams, ModelError, ModelExport,
        VoiceClassifier, load_checkpoint, save_checkpoint, write_c_header,
    };
}
