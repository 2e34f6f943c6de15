//! Per-class classification report.

use serde::{Deserialize, Serialize};

use crate::confusion::ConfusionMatrix;
use crate::error::{EvalError, Result};

/// Precision, recall, and F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassReport {
    /// Fraction of predictions for this class that were correct.
    pub precision: f32,

    /// Fraction of this class's samples that were found.
    pub recall: f32,

    /// Harmonic mean of precision and recall.
    pub f1: f32,

    /// Number of samples whose expected class is this one.
    pub support: usize,
}

impl ClassReport {
    /// Derives metrics from raw counts.
    ///
    /// Zero denominators score zero rather than NaN, matching the
    /// usual report convention for unseen classes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(true_positives: usize, predicted: usize, support: usize) -> Self {
        let precision = if predicted == 0 {
            0.0
        } else {
            true_positives as f32 / predicted as f32
        };
        let recall = if support == 0 {
            0.0
        } else {
            true_positives as f32 / support as f32
        };
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            precision,
            recall,
            f1,
            support,
        }
    }
}

/// Per-class metrics with overall accuracy and averages.
///
/// # Example
///
/// ```
/// use voice_eval::ClassificationReport;
///
/// let names = vec!["yes".to_string(), "no".to_string()];
/// let report = ClassificationReport::from_predictions(&[0, 1, 1, 1], &[0, 0, 1, 1], &names)
///     .unwrap();
///
/// assert!((report.accuracy - 0.75).abs() < 1e-6);
/// assert_eq!(report.classes[0].support, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Class names, aligned with `classes`.
    pub class_names: Vec<String>,

    /// Per-class metrics, one entry per class.
    pub classes: Vec<ClassReport>,

    /// Overall accuracy.
    pub accuracy: f32,

    /// Unweighted mean over classes; support is the sample total.
    pub macro_avg: ClassReport,

    /// Support-weighted mean over classes; support is the sample total.
    pub weighted_avg: ClassReport,
}

impl ClassificationReport {
    /// Builds a report from parallel label slices.
    ///
    /// # Errors
    ///
    /// Returns an error if no class names are given, slices differ in
    /// length or are empty, or any label is out of range.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_predictions(
        predicted: &[u32],
        expected: &[u32],
        class_names: &[String],
    ) -> Result<Self> {
        if class_names.is_empty() {
            return Err(EvalError::validation("at least one class name is required"));
        }

        let matrix = ConfusionMatrix::from_predictions(predicted, expected, class_names.len())?;
        let total = matrix.total();

        let classes: Vec<ClassReport> = (0..matrix.num_classes())
            .map(|c| {
                ClassReport::from_counts(
                    matrix.true_positives(c),
                    matrix.predicted_count(c),
                    matrix.support(c),
                )
            })
            .collect();

        let class_count = classes.len() as f32;
        let macro_avg = ClassReport {
            precision: classes.iter().map(|c| c.precision).sum::<f32>() / class_count,
            recall: classes.iter().map(|c| c.recall).sum::<f32>() / class_count,
            f1: classes.iter().map(|c| c.f1).sum::<f32>() / class_count,
            support: total,
        };

        let total_f = total as f32;
        let weighted = |metric: fn(&ClassReport) -> f32| {
            classes
                .iter()
                .map(|c| metric(c) * c.support as f32)
                .sum::<f32>()
                / total_f
        };
        let weighted_avg = ClassReport {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support: total,
        };

        Ok(Self {
            class_names: class_names.to_vec(),
            classes,
            accuracy: matrix.accuracy(),
            macro_avg,
            weighted_avg,
        })
    }

    /// Renders the report as an aligned table.
    #[must_use]
    #[allow(clippy::let_underscore_must_use)] // String::write_fmt is infallible
    pub fn to_report(&self) -> String {
        use std::fmt::Write;

        let name_w = self
            .class_names
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("weighted avg".len());

        let mut s = String::new();
        let _ = writeln!(s, "Classification Report");
        let _ = writeln!(s, "=====================");
        let _ = writeln!(
            s,
            "{:>name_w$} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        );
        let _ = writeln!(s);

        for (name, class) in self.class_names.iter().zip(&self.classes) {
            let _ = writeln!(
                s,
                "{name:>name_w$} {:>10.3} {:>10.3} {:>10.3} {:>10}",
                class.precision, class.recall, class.f1, class.support
            );
        }

        let _ = writeln!(s);
        let _ = writeln!(
            s,
            "{:>name_w$} {:>10} {:>10} {:>10.3} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        );
        for (label, avg) in [
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ] {
            let _ = writeln!(
                s,
                "{label:>name_w$} {:>10.3} {:>10.3} {:>10.3} {:>10}",
                avg.precision, avg.recall, avg.f1, avg.support
            );
        }

        s
    }
}
