//! Training metrics collection.

use serde::{Deserialize, Serialize};

use crate::config::MonitoredMetric;

/// Metrics for a single training epoch.
///
/// Epochs are numbered from 1. Validation runs every epoch, so the
/// validation fields are always populated by the trainer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Epoch number (1-based).
    pub epoch: usize,

    /// Mean training loss over the epoch.
    pub train_loss: f32,

    /// Training accuracy over the epoch.
    pub train_accuracy: f32,

    /// Mean validation loss.
    pub val_loss: f32,

    /// Validation accuracy.
    pub val_accuracy: f32,

    /// Wall-clock duration of the epoch in milliseconds.
    pub duration_ms: u64,
}

impl EpochMetrics {
    /// Creates metrics for an epoch with training results.
    #[must_use]
    pub const fn new(epoch: usize, train_loss: f32, train_accuracy: f32) -> Self {
        Self {
            epoch,
            train_loss,
            train_accuracy,
            val_loss: 0.0,
            val_accuracy: 0.0,
            duration_ms: 0,
        }
    }

    /// Attaches validation results.
    #[must_use]
    pub const fn with_validation(mut self, val_loss: f32, val_accuracy: f32) -> Self {
        self.val_loss = val_loss;
        self.val_accuracy = val_accuracy;
        self
    }

    /// Attaches the epoch duration.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Loss and accuracy over a held-out split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    /// Mean loss over the split.
    pub loss: f32,

    /// Fraction of correctly classified samples.
    pub accuracy: f32,
}

impl EvalMetrics {
    /// Creates evaluation metrics.
    #[must_use]
    pub const fn new(loss: f32, accuracy: f32) -> Self {
        Self { loss, accuracy }
    }
}

/// Per-epoch history for a training run.
///
/// Tracks the best value of the monitored metric as epochs are
/// recorded; [`TrainingHistory::record`] reports whether the epoch just
/// added set a new best, which is the trainer's cue to checkpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Metric driving best-epoch tracking.
    pub monitor: MonitoredMetric,

    /// Metrics for each completed epoch, in order.
    pub epochs: Vec<EpochMetrics>,

    /// Best value of the monitored metric seen so far.
    pub best_metric: Option<f32>,

    /// Epoch that produced the best value.
    pub best_epoch: Option<usize>,
}

impl TrainingHistory {
    /// Creates an empty history tracking the given metric.
    #[must_use]
    pub const fn new(monitor: MonitoredMetric) -> Self {
        Self {
            monitor,
            epochs: Vec::new(),
            best_metric: None,
            best_epoch: None,
        }
    }

    /// Records an epoch and returns `true` if it set a new best.
    ///
    /// The first epoch always counts as an improvement.
    pub fn record(&mut self, metrics: EpochMetrics) -> bool {
        let value = self.monitor.value_of(&metrics);
        let improved = match self.best_metric {
            Some(best) => self.monitor.improved(value, best),
            None => true,
        };

        if improved {
            self.best_metric = Some(value);
            self.best_epoch = Some(metrics.epoch);
        }
        self.epochs.push(metrics);
        improved
    }

    /// Returns the number of recorded epochs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    /// Checks if no epochs have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Returns the most recent epoch record.
    #[must_use]
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    /// Returns training accuracies as a vector.
    #[must_use]
    pub fn train_accuracy(&self) -> Vec<f32> {
        self.epochs.iter().map(|m| m.train_accuracy).collect()
    }

    /// Returns validation accuracies as a vector.
    #[must_use]
    pub fn val_accuracy(&self) -> Vec<f32> {
        self.epochs.iter().map(|m| m.val_accuracy).collect()
    }

    /// Returns training losses as a vector.
    #[must_use]
    pub fn train_loss(&self) -> Vec<f32> {
        self.epochs.iter().map(|m| m.train_loss).collect()
    }

    /// Returns validation losses as a vector.
    #[must_use]
    pub fn val_loss(&self) -> Vec<f32> {
        self.epochs.iter().map(|m| m.val_loss).collect()
    }

    /// Total wall-clock time across recorded epochs, in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_time_secs(&self) -> f32 {
        self.epochs.iter().map(|m| m.duration_ms).sum::<u64>() as f32 / 1000.0
    }

    /// Returns a human-readable summary.
    #[must_use]
    #[allow(clippy::let_underscore_must_use)] // String::write_fmt is infallible
    pub fn summary(&self) -> String {
        use std::fmt::Write;

        let mut s = String::new();
        let _ = writeln!(s, "Training Summary");
        let _ = writeln!(s, "================");
        let _ = writeln!(s, "Epochs completed: {}", self.len());
        let _ = writeln!(s, "Total time: {:.1}s", self.total_time_secs());

        if let Some(last) = self.final_metrics() {
            let _ = writeln!(
                s,
                "Final: loss {:.4}, accuracy {:.3}, val_loss {:.4}, val_accuracy {:.3}",
                last.train_loss, last.train_accuracy, last.val_loss, last.val_accuracy
            );
        }

        if let Some(best) = self.best_metric {
            let _ = writeln!(
                s,
                "Best {}: {:.4} (epoch {})",
                self.monitor,
                best,
                self.best_epoch.unwrap_or(0)
            );
        }

        s
    }
}
