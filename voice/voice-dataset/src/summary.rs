//! Corpus statistics and reporting.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::corpus::FeatureCorpus;

/// Aggregate statistics describing a corpus.
///
/// # Example
///
/// ```
/// use voice_dataset::{CorpusSummary, FeatureCorpus, Utterance};
///
/// let corpus = FeatureCorpus::from_parts(
///     1,
///     vec!["on".to_string(), "off".to_string()],
///     vec![
///         Utterance::new(vec![0.1], 0),
///         Utterance::new(vec![0.2], 0),
///         Utterance::new(vec![0.3], 1),
///     ],
/// );
///
/// let summary = CorpusSummary::from_corpus(&corpus);
/// assert_eq!(summary.total, 3);
/// assert_eq!(summary.class_counts, vec![2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    /// Total number of utterances.
    pub total: usize,
    /// Feature vector length.
    pub feature_len: usize,
    /// Class names, indexed by label.
    pub class_names: Vec<String>,
    /// Utterance count per class.
    pub class_counts: Vec<usize>,
}

impl CorpusSummary {
    /// Computes summary statistics for a corpus.
    #[must_use]
    pub fn from_corpus(corpus: &FeatureCorpus) -> Self {
        Self {
            total: corpus.len(),
            feature_len: corpus.feature_len,
            class_names: corpus.class_names.clone(),
            class_counts: corpus.class_counts(),
        }
    }

    /// Renders a human-readable report.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_report(&self) -> String {
        let mut report = String::new();

        let _ = writeln!(report, "Voice Corpus Summary");
        let _ = writeln!(report, "====================");
        let _ = writeln!(report, "Total utterances: {}", self.total);
        let _ = writeln!(report, "Feature length:   {}", self.feature_len);
        let _ = writeln!(report, "Classes:          {}", self.class_names.len());
        let _ = writeln!(report);

        let name_width = self
            .class_names
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(5);

        for (name, &count) in self.class_names.iter().zip(self.class_counts.iter()) {
            let percent = if self.total == 0 {
                0.0
            } else {
                count as f64 / self.total as f64 * 100.0
            };
            let _ = writeln!(report, "  {name:<name_width$} {count:>6} ({percent:>5.1}%)");
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utterance::Utterance;

    fn sample_corpus() -> FeatureCorpus {
        FeatureCorpus::from_parts(
            2,
            vec!["left".to_string(), "right".to_string(), "stop".to_string()],
            vec![
                Utterance::new(vec![0.1, 0.2], 0),
                Utterance::new(vec![0.3, 0.4], 1),
                Utterance::new(vec![0.5, 0.6], 1),
                Utterance::new(vec![0.7, 0.8], 2),
            ],
        )
    }

    #[test]
    fn summary_from_corpus() {
        let summary = CorpusSummary::from_corpus(&sample_corpus());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.feature_len, 2);
        assert_eq!(summary.class_counts, vec![1, 2, 1]);
    }

    #[test]
    fn summary_report_contains_classes() {
        let summary = CorpusSummary::from_corpus(&sample_corpus());
        let report = summary.to_report();

        assert!(report.contains("Voice Corpus Summary"));
        assert!(report.contains("Total utterances: 4"));
        assert!(report.contains("left"));
        assert!(report.contains("right"));
        assert!(report.contains("stop"));
        assert!(report.contains("50.0%"));
    }

    #[test]
    fn summary_serialization() {
        let summary = CorpusSummary::from_corpus(&sample_corpus());
        let json = serde_json::to_string(&summary).unwrap();
        let parsed: CorpusSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary);
    }
}
