//! Feature corpus handling for VoiceForge.
//!
//! This crate provides the dataset layer of the voice-command training
//! pipeline:
//!
//! # Corpus Types
//!
//! - [`Utterance`] - Single labelled feature vector
//! - [`FeatureCorpus`] - Validated corpus with JSON persistence
//! - [`CorpusSummary`] - Per-class statistics about a corpus
//!
//! # Splitting
//!
//! - [`SplitRatios`] - Test/validation hold-out fractions
//! - [`split_corpus`] - Deterministic train/validation/test partitioning
//!
//! Splits are drawn with a seeded `ChaCha8` generator, so a fixed seed
//! reproduces the exact same partitions on every run and platform.
//!
//! # Example
//!
//! ```
//! use voice_dataset::{FeatureCorpus, SplitRatios, Utterance, split_corpus};
//!
//! let utterances: Vec<Utterance> = (0..20u32)
//!     .map(|i| Utterance::new(vec![i as f32, 0.5], i % 2))
//!     .collect();
//! let corpus = FeatureCorpus::from_parts(
//!     2,
//!     vec!["yes".to_string(), "no".to_string()],
//!     utterances,
//! );
//! corpus.validate().unwrap();
//!
//! let splits = split_corpus(&corpus, SplitRatios::TRAIN60_VAL20_TEST20, 42).unwrap();
//! assert_eq!(splits.train.len(), 12);
//! assert_eq!(splits.val.len(), 4);
//! assert_eq!(splits.test.len(), 4);
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

mod corpus;
mod error;
mod splits;
mod summary;
mod utterance;

// Re-export corpus types
pub use corpus::FeatureCorpus;
pub use utterance::Utterance;

// Re-export split utilities
pub use splits::{CorpusSplits, SplitRatios, split_corpus};

// Re-export summary types
pub use summary::CorpusSummary;

// Re-export error types
pub use error::{DatasetError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        CorpusSplits, CorpusSummary, DatasetError, FeatureCorpus, SplitRatios, Utterance,
        split_corpus,
    };
}
