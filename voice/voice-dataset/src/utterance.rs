//! Single labelled utterance samples.

use serde::{Deserialize, Serialize};

/// One labelled training sample: a fixed-length feature vector extracted
/// from a voice recording, plus the class it belongs to.
///
/// Features and label travel together in one value, so dataset shuffling
/// and splitting can never misalign them.
///
/// # Example
///
/// ```
/// use voice_dataset::Utterance;
///
/// let u = Utterance::new(vec![0.1, 0.5, 0.9], 2);
/// assert_eq!(u.feature_len(), 3);
/// assert_eq!(u.label, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Extracted audio features for one utterance.
    pub features: Vec<f32>,
    /// Class label index.
    pub label: u32,
    /// Optional provenance tag (recording id, file stem, speaker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Utterance {
    /// Creates a new utterance.
    #[must_use]
    pub const fn new(features: Vec<f32>, label: u32) -> Self {
        Self {
            features,
            label,
            source: None,
        }
    }

    /// Creates a new utterance with a provenance tag.
    #[must_use]
    pub fn with_source(features: Vec<f32>, label: u32, source: impl Into<String>) -> Self {
        Self {
            features,
            label,
            source: Some(source.into()),
        }
    }

    /// Returns the number of features.
    #[must_use]
    pub fn feature_len(&self) -> usize {
        self.features.len()
    }
}
