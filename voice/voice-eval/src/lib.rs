//! Evaluation metrics for VoiceForge classifiers.
//!
//! Scores predicted labels against expected labels:
//!
//! # Metrics
//!
//! - [`accuracy_score`] - Fraction of matching labels
//! - [`ConfusionMatrix`] - Expected-vs-predicted count grid
//! - [`ClassificationReport`] - Per-class precision/recall/F1 with
//!   macro and weighted averages
//!
//! # Example
//!
//! ```
//! use voice_eval::ClassificationReport;
//!
//! let names = vec!["stop".to_string(), "go".to_string()];
//! let report = ClassificationReport::from_predictions(&[0, 1, 0], &[0, 1, 1], &names)?;
//!
//! println!("{}", report.to_report());
//! # Ok::<(), voice_eval::EvalError>(())
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

mod accuracy;
mod confusion;
mod error;
mod report;

// Re-export metrics
pub use accuracy::accuracy_score;
pub use confusion::ConfusionMatrix;
pub use report::{ClassReport, ClassificationReport};

// Re-export error types
pub use error::{EvalError, Result};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        accuracy_score, ClassReport, ClassificationReport, ConfusionMatrix, EvalError,
    };
}
