//! Feature corpus container and JSON persistence.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DatasetError, Result};
use crate::utterance::Utterance;

/// A labelled corpus of fixed-length feature vectors.
///
/// Every utterance must carry exactly `feature_len` features and a label
/// below `class_names.len()`. [`FeatureCorpus::validate`] enforces both;
/// [`FeatureCorpus::from_json_file`] validates after parsing, so a corpus
/// obtained from disk is always structurally sound.
///
/// # Example
///
/// ```
/// use voice_dataset::{FeatureCorpus, Utterance};
///
/// let corpus = FeatureCorpus::from_parts(
///     2,
///     vec!["yes".to_string(), "no".to_string()],
///     vec![
///         Utterance::new(vec![0.1, 0.9], 0),
///         Utterance::new(vec![0.8, 0.2], 1),
///     ],
/// );
///
/// assert!(corpus.validate().is_ok());
/// assert_eq!(corpus.len(), 2);
/// assert_eq!(corpus.num_classes(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCorpus {
    /// Length every feature vector must have.
    pub feature_len: usize,
    /// Class names, indexed by label.
    pub class_names: Vec<String>,
    /// The labelled samples.
    pub utterances: Vec<Utterance>,
}

impl FeatureCorpus {
    /// Creates a corpus from its parts without validating.
    #[must_use]
    pub const fn from_parts(
        feature_len: usize,
        class_names: Vec<String>,
        utterances: Vec<Utterance>,
    ) -> Self {
        Self {
            feature_len,
            class_names,
            utterances,
        }
    }

    /// Returns the number of utterances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    /// Returns `true` if the corpus has no utterances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Returns the number of defined classes.
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.class_names.len()
    }

    /// Counts utterances per class.
    ///
    /// Labels outside the class range are not counted; [`FeatureCorpus::validate`]
    /// rejects them.
    #[must_use]
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.num_classes()];
        for utterance in &self.utterances {
            if let Some(count) = counts.get_mut(utterance.label as usize) {
                *count += 1;
            }
        }
        counts
    }

    /// Validates the structural invariants of the corpus.
    ///
    /// # Errors
    ///
    /// Returns an error if the corpus is empty, no classes are defined,
    /// `feature_len` is zero, any feature vector has the wrong length or
    /// non-finite values, or any label is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.utterances.is_empty() {
            return Err(DatasetError::EmptyCorpus);
        }
        if self.class_names.is_empty() {
            return Err(DatasetError::validation("no class names defined"));
        }
        if self.feature_len == 0 {
            return Err(DatasetError::validation("feature length is zero"));
        }

        for (index, utterance) in self.utterances.iter().enumerate() {
            if utterance.feature_len() != self.feature_len {
                return Err(DatasetError::ragged_features(
                    index,
                    self.feature_len,
                    utterance.feature_len(),
                ));
            }
            if utterance.label as usize >= self.num_classes() {
                return Err(DatasetError::label_out_of_range(
                    index,
                    utterance.label,
                    self.num_classes(),
                ));
            }
            if utterance.features.iter().any(|f| !f.is_finite()) {
                return Err(DatasetError::validation(format!(
                    "utterance {index} has non-finite feature values"
                )));
            }
        }

        Ok(())
    }

    /// Loads and validates a corpus from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or fails [`FeatureCorpus::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let corpus: Self = serde_json::from_reader(reader)?;
        corpus.validate()?;

        info!(
            path = %path.display(),
            utterances = corpus.len(),
            classes = corpus.num_classes(),
            feature_len = corpus.feature_len,
            "Loaded feature corpus"
        );

        Ok(corpus)
    }

    /// Writes the corpus to a JSON file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
