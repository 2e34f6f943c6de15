//! Confusion matrix.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// Square matrix of expected-vs-predicted label counts.
///
/// Rows are expected classes, columns are predicted classes. Out of
/// range accessor arguments read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    num_classes: usize,
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    /// Builds a confusion matrix from parallel label slices.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length, are empty, the
    /// class count is zero, or any label is out of range.
    pub fn from_predictions(
        predicted: &[u32],
        expected: &[u32],
        num_classes: usize,
    ) -> Result<Self> {
        if predicted.len() != expected.len() {
            return Err(EvalError::length_mismatch(predicted.len(), expected.len()));
        }
        if predicted.is_empty() {
            return Err(EvalError::EmptyInput);
        }
        if num_classes == 0 {
            return Err(EvalError::validation("at least one class is required"));
        }

        let mut counts = vec![0usize; num_classes * num_classes];
        for (&p, &e) in predicted.iter().zip(expected) {
            if p as usize >= num_classes {
                return Err(EvalError::label_out_of_range(p, num_classes));
            }
            if e as usize >= num_classes {
                return Err(EvalError::label_out_of_range(e, num_classes));
            }
            counts[e as usize * num_classes + p as usize] += 1;
        }

        Ok(Self {
            num_classes,
            counts,
        })
    }

    /// Number of classes.
    #[must_use]
    pub const fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Count of samples with the given expected and predicted classes.
    #[must_use]
    pub fn count(&self, expected: usize, predicted: usize) -> usize {
        if expected >= self.num_classes || predicted >= self.num_classes {
            return 0;
        }
        self.counts
            .get(expected * self.num_classes + predicted)
            .copied()
            .unwrap_or(0)
    }

    /// Number of samples whose expected class is `class` (row sum).
    #[must_use]
    pub fn support(&self, class: usize) -> usize {
        (0..self.num_classes).map(|p| self.count(class, p)).sum()
    }

    /// Number of samples predicted as `class` (column sum).
    #[must_use]
    pub fn predicted_count(&self, class: usize) -> usize {
        (0..self.num_classes).map(|e| self.count(e, class)).sum()
    }

    /// Correctly classified samples of `class`.
    #[must_use]
    pub fn true_positives(&self, class: usize) -> usize {
        self.count(class, class)
    }

    /// Total number of samples.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Overall accuracy (diagonal over total).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let diagonal: usize = (0..self.num_classes).map(|c| self.true_positives(c)).sum();
        diagonal as f32 / total as f32
    }

    /// Renders the matrix as an aligned grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the name count does not match the class count.
    #[allow(clippy::let_underscore_must_use)] // String::write_fmt is infallible
    pub fn to_report(&self, class_names: &[String]) -> Result<String> {
        use std::fmt::Write;

        if class_names.len() != self.num_classes {
            return Err(EvalError::validation(format!(
                "{} class names for {} classes",
                class_names.len(),
                self.num_classes
            )));
        }

        let name_w = class_names
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(8);
        let cell_w = name_w + 2;

        let mut s = String::new();
        let _ = writeln!(s, "Confusion Matrix");
        let _ = writeln!(s, "================");

        let _ = write!(s, "{:name_w$}", "");
        for name in class_names {
            let _ = write!(s, "{name:>cell_w$}");
        }
        let _ = writeln!(s);

        for (row, name) in class_names.iter().enumerate() {
            let _ = write!(s, "{name:<name_w$}");
            for col in 0..self.num_classes {
                let _ = write!(s, "{:>cell_w$}", self.count(row, col));
            }
            let _ = writeln!(s);
        }

        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn confusion_counts_placement() {
        let matrix = ConfusionMatrix::from_predictions(&[0, 1, 1], &[0, 0, 1], 2).unwrap();

        assert_eq!(matrix.count(0, 0), 1);
        assert_eq!(matrix.count(0, 1), 1);
        assert_eq!(matrix.count(1, 1), 1);
        assert_eq!(matrix.count(1, 0), 0);

        assert_eq!(matrix.support(0), 2);
        assert_eq!(matrix.support(1), 1);
        assert_eq!(matrix.predicted_count(1), 2);
        assert_eq!(matrix.true_positives(1), 1);
        assert_eq!(matrix.total(), 3);
    }

    #[test]
    fn confusion_accuracy_from_diagonal() {
        let matrix = ConfusionMatrix::from_predictions(&[0, 1, 1], &[0, 0, 1], 2).unwrap();
        assert!((matrix.accuracy() - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn confusion_out_of_range_reads_zero() {
        let matrix = ConfusionMatrix::from_predictions(&[0], &[0], 1).unwrap();
        assert_eq!(matrix.count(3, 0), 0);
        assert_eq!(matrix.support(9), 0);
    }

    #[test]
    fn confusion_rejects_bad_labels() {
        let err = ConfusionMatrix::from_predictions(&[3], &[0], 2).unwrap_err();
        assert_eq!(err, EvalError::label_out_of_range(3, 2));

        let err = ConfusionMatrix::from_predictions(&[0], &[5], 2).unwrap_err();
        assert_eq!(err, EvalError::label_out_of_range(5, 2));
    }

    #[test]
    fn confusion_rejects_mismatched_inputs() {
        let err = ConfusionMatrix::from_predictions(&[0, 1], &[0], 2).unwrap_err();
        assert_eq!(err, EvalError::length_mismatch(2, 1));

        let err = ConfusionMatrix::from_predictions(&[], &[], 2).unwrap_err();
        assert_eq!(err, EvalError::EmptyInput);

        let err = ConfusionMatrix::from_predictions(&[0], &[0], 0).unwrap_err();
        assert!(matches!(err, EvalError::Validation(_)));
    }

    #[test]
    fn confusion_report_grid() {
        let matrix =
            ConfusionMatrix::from_predictions(&[0, 1, 1, 0], &[0, 0, 1, 1], 2).unwrap();
        let report = matrix.to_report(&names(&["yes", "no"])).unwrap();

        assert!(report.contains("Confusion Matrix"));
        assert!(report.contains("yes"));
        assert!(report.contains("no"));

        let err = matrix.to_report(&names(&["yes"])).unwrap_err();
        assert!(matches!(err, EvalError::Validation(_)));
    }

    #[test]
    fn confusion_serialization_round_trip() {
        let matrix = ConfusionMatrix::from_predictions(&[0, 1], &[0, 1], 2).unwrap();
        let json = serde_json::to_string(&matrix).unwrap();
        let parsed: ConfusionMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, matrix);
    }
}
