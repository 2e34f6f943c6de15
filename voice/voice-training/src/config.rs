//! Training configuration.

use serde::{Deserialize, Serialize};
use voice_model::CheckpointFormat;

use crate::metrics::EpochMetrics;

/// Configuration for a training run.
///
/// The defaults encode the voice-classifier recipe: 3000 epochs of
/// batch-4 Adam at 1e-3, seeded shuffling, checkpointing whenever
/// training accuracy reaches a new best.
///
/// # Example
///
/// ```
/// use voice_training::TrainingConfig;
///
/// let config = TrainingConfig::default();
/// assert_eq!(config.epochs, 3000);
/// assert_eq!(config.batch_size, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training epochs.
    pub epochs: usize,

    /// Batch size.
    pub batch_size: usize,

    /// Optimizer configuration.
    pub optimizer: OptimizerConfig,

    /// Metric that drives best-weights checkpointing.
    pub monitor: MonitoredMetric,

    /// On-disk format for checkpoints.
    pub checkpoint_format: CheckpointFormat,

    /// Whether to reshuffle the training split each epoch.
    pub shuffle: bool,

    /// Random seed for epoch shuffling.
    pub seed: u64,

    /// Epochs between progress log lines.
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EPOCHS)
    }
}

impl TrainingConfig {
    /// Default number of training epochs.
    pub const DEFAULT_EPOCHS: usize = 3000;

    /// Default batch size.
    pub const DEFAULT_BATCH_SIZE: usize = 4;

    /// Default random seed.
    pub const DEFAULT_SEED: u64 = 42;

    /// Default progress-log interval in epochs.
    pub const DEFAULT_LOG_EVERY: usize = 100;

    /// Creates a new training config with the given epochs.
    #[must_use]
    pub const fn new(epochs: usize) -> Self {
        Self {
            epochs,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            optimizer: OptimizerConfig::adam(1e-3),
            monitor: MonitoredMetric::TrainAccuracy,
            checkpoint_format: CheckpointFormat::Binary,
            shuffle: true,
            seed: Self::DEFAULT_SEED,
            log_every: Self::DEFAULT_LOG_EVERY,
        }
    }

    /// Sets the batch size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the optimizer.
    #[must_use]
    pub const fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Sets the monitored metric.
    #[must_use]
    pub const fn with_monitor(mut self, monitor: MonitoredMetric) -> Self {
        self.monitor = monitor;
        self
    }

    /// Sets the checkpoint format.
    #[must_use]
    pub const fn with_checkpoint_format(mut self, format: CheckpointFormat) -> Self {
        self.checkpoint_format = format;
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the progress-log interval.
    #[must_use]
    pub const fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    /// Disables shuffling.
    #[must_use]
    pub const fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `true` if all values are valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.epochs > 0 && self.batch_size > 0 && self.log_every > 0 && self.optimizer.is_valid()
    }
}

/// Optimizer configuration.
///
/// The training loop always uses Adam; these are its hyperparameters.
///
/// # Example
///
/// ```
/// use voice_training::OptimizerConfig;
///
/// let adam = OptimizerConfig::adam(1e-3);
/// assert_eq!(adam.learning_rate, 1e-3);
/// assert_eq!(adam.beta1, 0.9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Base learning rate.
    pub learning_rate: f32,

    /// Exponential decay rate for the first moment.
    pub beta1: f32,

    /// Exponential decay rate for the second moment.
    pub beta2: f32,

    /// Epsilon for numerical stability.
    pub epsilon: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::adam(1e-3)
    }
}

impl OptimizerConfig {
    /// Creates an Adam optimizer config with standard moments.
    #[must_use]
    pub const fn adam(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }

    /// Sets the moment decay rates.
    #[must_use]
    pub const fn with_betas(mut self, beta1: f32, beta2: f32) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    /// Validates the configuration.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.learning_rate > 0.0
            && self.beta1 >= 0.0
            && self.beta1 < 1.0
            && self.beta2 >= 0.0
            && self.beta2 < 1.0
            && self.epsilon > 0.0
    }
}

/// Metric watched for best-weights checkpointing.
///
/// Accuracy metrics improve upward, loss metrics downward; the trainer
/// saves a checkpoint whenever the watched value beats the best seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MonitoredMetric {
    /// Accuracy over the training split.
    #[default]
    TrainAccuracy,

    /// Accuracy over the validation split.
    ValAccuracy,

    /// Mean loss over the training split.
    TrainLoss,

    /// Mean loss over the validation split.
    ValLoss,
}

impl MonitoredMetric {
    /// Direction in which this metric improves.
    #[must_use]
    pub const fn mode(self) -> MonitorMode {
        match self {
            Self::TrainAccuracy | Self::ValAccuracy => MonitorMode::Max,
            Self::TrainLoss | Self::ValLoss => MonitorMode::Min,
        }
    }

    /// Short name used in logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TrainAccuracy => "accuracy",
            Self::ValAccuracy => "val_accuracy",
            Self::TrainLoss => "loss",
            Self::ValLoss => "val_loss",
        }
    }

    /// Extracts this metric's value from an epoch record.
    #[must_use]
    pub const fn value_of(self, metrics: &EpochMetrics) -> f32 {
        match self {
            Self::TrainAccuracy => metrics.train_accuracy,
            Self::ValAccuracy => metrics.val_accuracy,
            Self::TrainLoss => metrics.train_loss,
            Self::ValLoss => metrics.val_loss,
        }
    }

    /// Returns `true` if `current` beats `best` in this metric's direction.
    #[must_use]
    pub fn improved(self, current: f32, best: f32) -> bool {
        match self.mode() {
            MonitorMode::Max => current > best,
            MonitorMode::Min => current < best,
        }
    }
}

impl std::fmt::Display for MonitoredMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Improvement direction for a monitored metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitorMode {
    /// Larger values are better.
    Max,
    /// Smaller values are better.
    Min,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_matches_recipe() {
        let config = TrainingConfig::default();
        assert_eq!(config.epochs, 3000);
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.seed, 42);
        assert_eq!(config.log_every, 100);
        assert!(config.shuffle);
        assert_eq!(config.monitor, MonitoredMetric::TrainAccuracy);
        assert_eq!(config.checkpoint_format, CheckpointFormat::Binary);
        assert!(config.is_valid());
    }

    #[test]
    fn config_builders() {
        let config = TrainingConfig::new(50)
            .with_batch_size(8)
            .with_seed(7)
            .with_log_every(10)
            .with_monitor(MonitoredMetric::ValLoss)
            .without_shuffle();

        assert_eq!(config.epochs, 50);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.seed, 7);
        assert_eq!(config.log_every, 10);
        assert_eq!(config.monitor, MonitoredMetric::ValLoss);
        assert!(!config.shuffle);
    }

    #[test]
    fn config_invalid_values() {
        assert!(!TrainingConfig::new(0).is_valid());
        assert!(!TrainingConfig::new(10).with_batch_size(0).is_valid());
        assert!(!TrainingConfig::new(10).with_log_every(0).is_valid());
    }

    #[test]
    fn optimizer_adam_defaults() {
        let adam = OptimizerConfig::adam(1e-3);
        assert_eq!(adam.beta1, 0.9);
        assert_eq!(adam.beta2, 0.999);
        assert_eq!(adam.epsilon, 1e-8);
        assert!(adam.is_valid());
    }

    #[test]
    fn optimizer_invalid_values() {
        assert!(!OptimizerConfig::adam(0.0).is_valid());
        assert!(!OptimizerConfig::adam(1e-3).with_betas(1.0, 0.999).is_valid());
        assert!(!OptimizerConfig::adam(1e-3).with_betas(0.9, -0.1).is_valid());
    }

    #[test]
    fn monitor_modes() {
        assert_eq!(MonitoredMetric::TrainAccuracy.mode(), MonitorMode::Max);
        assert_eq!(MonitoredMetric::ValAccuracy.mode(), MonitorMode::Max);
        assert_eq!(MonitoredMetric::TrainLoss.mode(), MonitorMode::Min);
        assert_eq!(MonitoredMetric::ValLoss.mode(), MonitorMode::Min);
    }

    #[test]
    fn monitor_improvement_direction() {
        assert!(MonitoredMetric::TrainAccuracy.improved(0.9, 0.8));
        assert!(!MonitoredMetric::TrainAccuracy.improved(0.8, 0.8));
        assert!(MonitoredMetric::ValLoss.improved(0.3, 0.4));
        assert!(!MonitoredMetric::ValLoss.improved(0.5, 0.4));
    }

    #[test]
    fn monitor_value_extraction() {
        let metrics = EpochMetrics::new(1, 0.5, 0.8).with_validation(0.6, 0.7);
        assert_eq!(MonitoredMetric::TrainLoss.value_of(&metrics), 0.5);
        assert_eq!(MonitoredMetric::TrainAccuracy.value_of(&metrics), 0.8);
        assert_eq!(MonitoredMetric::ValLoss.value_of(&metrics), 0.6);
        assert_eq!(MonitoredMetric::ValAccuracy.value_of(&metrics), 0.7);
    }

    #[test]
    fn monitor_display_names() {
        assert_eq!(MonitoredMetric::TrainAccuracy.to_string(), "accuracy");
        assert_eq!(MonitoredMetric::ValLoss.to_string(), "val_loss");
    }

    #[test]
    fn config_serialization_round_trip() {
        let config = TrainingConfig::default().with_seed(11);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: TrainingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
