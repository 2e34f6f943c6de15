//! Training loop with best-weights checkpointing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use burn::module::AutodiffModule;
use burn::nn::loss::CrossEntropyLossConfig;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::Backend;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Int, Tensor};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use voice_dataset::Utterance;
use voice_model::{save_checkpoint, VoiceClassifier};

use crate::batch::{batch_tensors, batch_tensors_at};
use crate::config::TrainingConfig;
use crate::error::{Result, TrainingError};
use crate::metrics::{EpochMetrics, EvalMetrics, TrainingHistory};

/// File stem for the best-weights checkpoint.
pub const CHECKPOINT_STEM: &str = "voice_classifier";

/// File name for the per-epoch metrics log.
pub const METRICS_LOG_FILE: &str = "training_log.jsonl";

/// Paths produced by a training run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerArtifacts {
    /// Best-weights checkpoint, extension matching the configured format.
    pub checkpoint: PathBuf,

    /// Per-epoch metrics log (JSON lines).
    pub metrics_log: PathBuf,
}

/// Appends per-epoch metrics to a JSON-lines log file.
///
/// Each record is flushed as it is written, so the log stays complete
/// up to the last finished epoch even if the run is interrupted.
#[derive(Debug)]
pub struct MetricsLogger {
    writer: BufWriter<File>,
    path: PathBuf,
    lines: usize,
}

impl MetricsLogger {
    /// Creates (or truncates) the log file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            lines: 0,
        })
    }

    /// Appends one epoch record as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn append(&mut self, metrics: &EpochMetrics) -> Result<()> {
        let line = serde_json::to_string(metrics)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        self.lines += 1;
        Ok(())
    }

    /// Number of records written so far.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Trains the classifier for the configured number of epochs.
///
/// Each epoch runs mini-batch gradient descent over the training split
/// (reshuffled per epoch when `config.shuffle` is set), then a
/// dropout-free validation pass. Whenever the monitored metric improves
/// the current weights are saved under `run_dir`, so the checkpoint on
/// disk always holds the best weights seen so far. Every epoch is
/// appended to the metrics log. The full epoch count always runs; there
/// is no early stopping.
///
/// Returns the final model (not necessarily the best; reload the
/// checkpoint for that), the per-epoch history, and the artifact paths.
///
/// # Errors
///
/// Returns an error if the config is invalid, a split is empty, the
/// loss becomes non-finite, or an artifact cannot be written.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::too_many_lines
)]
pub fn fit<B: AutodiffBackend>(
    mut model: VoiceClassifier<B>,
    train: &[Utterance],
    val: &[Utterance],
    config: &TrainingConfig,
    run_dir: &Path,
    device: &B::Device,
) -> Result<(VoiceClassifier<B>, TrainingHistory, TrainerArtifacts)> {
    if !config.is_valid() {
        return Err(TrainingError::invalid_config(
            "training config failed validation",
        ));
    }
    if train.is_empty() {
        return Err(TrainingError::validation("training split is empty"));
    }
    if val.is_empty() {
        return Err(TrainingError::validation("validation split is empty"));
    }

    fs::create_dir_all(run_dir)?;
    let mut logger = MetricsLogger::create(run_dir.join(METRICS_LOG_FILE))?;
    let checkpoint_base = run_dir.join(CHECKPOINT_STEM);

    let loss_fn = CrossEntropyLossConfig::new().init(device);
    let mut optimizer = AdamConfig::new()
        .with_beta_1(config.optimizer.beta1)
        .with_beta_2(config.optimizer.beta2)
        .with_epsilon(config.optimizer.epsilon)
        .init();
    let learning_rate = f64::from(config.optimizer.learning_rate);

    let mut history = TrainingHistory::new(config.monitor);
    let mut checkpoint_path = None;

    info!(
        epochs = config.epochs,
        batch_size = config.batch_size,
        learning_rate,
        seed = config.seed,
        monitor = %config.monitor,
        train_samples = train.len(),
        val_samples = val.len(),
        "Starting training"
    );

    let mut order: Vec<usize> = (0..train.len()).collect();

    for epoch in 1..=config.epochs {
        let started = Instant::now();

        if config.shuffle {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(epoch as u64));
            order.shuffle(&mut rng);
        }

        let mut loss_sum = 0.0f64;
        let mut correct = 0usize;

        for chunk in order.chunks(config.batch_size) {
            let (features, targets) = batch_tensors_at::<B>(train, chunk, device);

            let logits = model.forward(features);
            let loss = loss_fn.forward(logits.clone(), targets.clone());

            let batch_loss = loss.clone().into_scalar().elem::<f32>();
            if !batch_loss.is_finite() {
                return Err(TrainingError::validation(format!(
                    "loss became non-finite at epoch {epoch}"
                )));
            }
            loss_sum += f64::from(batch_loss) * chunk.len() as f64;
            correct += count_correct(logits, targets);

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optimizer.step(learning_rate, model, grads);
        }

        let train_loss = (loss_sum / train.len() as f64) as f32;
        let train_accuracy = correct as f32 / train.len() as f32;

        let val_metrics = evaluate(&model.valid(), val, config.batch_size, device)?;

        let metrics = EpochMetrics::new(epoch, train_loss, train_accuracy)
            .with_validation(val_metrics.loss, val_metrics.accuracy)
            .with_duration_ms(duration_ms(started));
        logger.append(&metrics)?;

        debug!(
            epoch,
            train_loss = f64::from(train_loss),
            train_accuracy = f64::from(train_accuracy),
            val_loss = f64::from(val_metrics.loss),
            val_accuracy = f64::from(val_metrics.accuracy),
            "Epoch complete"
        );
        if epoch % config.log_every == 0 || epoch == config.epochs {
            info!(
                epoch,
                total = config.epochs,
                train_loss = f64::from(train_loss),
                train_accuracy = f64::from(train_accuracy),
                val_accuracy = f64::from(val_metrics.accuracy),
                "Training progress"
            );
        }

        if history.record(metrics) {
            let saved = save_checkpoint(&model, &checkpoint_base, config.checkpoint_format)?;
            debug!(
                epoch,
                metric = %config.monitor,
                value = f64::from(config.monitor.value_of(&metrics)),
                path = %saved.display(),
                "New best, checkpoint saved"
            );
            checkpoint_path = Some(saved);
        }
    }

    let checkpoint = checkpoint_path
        .ok_or_else(|| TrainingError::checkpoint("no checkpoint was written during training"))?;

    info!(
        best_epoch = history.best_epoch.unwrap_or(0),
        best_metric = f64::from(history.best_metric.unwrap_or(0.0)),
        checkpoint = %checkpoint.display(),
        "Training complete"
    );

    let artifacts = TrainerArtifacts {
        checkpoint,
        metrics_log: logger.path().to_path_buf(),
    };
    Ok((model, history, artifacts))
}

/// Computes mean loss and accuracy over a split without training.
///
/// Dropout is inert on inference backends, so running this on the
/// model's `valid()` form matches deployment behavior.
///
/// # Errors
///
/// Returns an error if the split is empty or the batch size is zero.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn evaluate<B: Backend>(
    model: &VoiceClassifier<B>,
    samples: &[Utterance],
    batch_size: usize,
    device: &B::Device,
) -> Result<EvalMetrics> {
    if samples.is_empty() {
        return Err(TrainingError::validation("cannot evaluate an empty split"));
    }
    if batch_size == 0 {
        return Err(TrainingError::invalid_config("batch size must be > 0"));
    }

    let loss_fn = CrossEntropyLossConfig::new().init(device);
    let mut loss_sum = 0.0f64;
    let mut correct = 0usize;

    for chunk in samples.chunks(batch_size) {
        let (features, targets) = batch_tensors::<B>(chunk, device);
        let logits = model.forward(features);
        let loss = loss_fn.forward(logits.clone(), targets.clone());

        loss_sum += f64::from(loss.into_scalar().elem::<f32>()) * chunk.len() as f64;
        correct += count_correct(logits, targets);
    }

    Ok(EvalMetrics::new(
        (loss_sum / samples.len() as f64) as f32,
        correct as f32 / samples.len() as f32,
    ))
}

/// Predicts a class for every utterance, preserving input order.
///
/// # Errors
///
/// Returns an error if the batch size is zero or prediction fails.
pub fn predictions<B: Backend>(
    model: &VoiceClassifier<B>,
    samples: &[Utterance],
    batch_size: usize,
    device: &B::Device,
) -> Result<Vec<u32>> {
    if batch_size == 0 {
        return Err(TrainingError::invalid_config("batch size must be > 0"));
    }

    let mut predicted = Vec::with_capacity(samples.len());
    for chunk in samples.chunks(batch_size) {
        let (features, _) = batch_tensors::<B>(chunk, device);
        predicted.extend(model.predict(features)?);
    }
    Ok(predicted)
}

/// Counts agreement between argmax predictions and integer targets.
fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    let predicted: Tensor<B, 1, Int> = logits.argmax(1).squeeze(1);
    let agreed = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    usize::try_from(agreed).unwrap_or(0)
}

fn duration_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_autodiff::Autodiff;
    use burn_ndarray::NdArray;
    use voice_model::ClassifierConfig;

    type TrainBackend = Autodiff<NdArray<f32>>;
    type InferBackend = NdArray<f32>;

    /// Two cleanly separable classes over four features.
    fn toy_split() -> Vec<Utterance> {
        let mut samples = Vec::new();
        for i in 0..8u32 {
            let label = i % 2;
            let bump = 0.01 * i as f32;
            let features = if label == 0 {
                vec![1.0 + bump, 0.0, 1.0, 0.0]
            } else {
                vec![0.0, 1.0 + bump, 0.0, 1.0]
            };
            samples.push(Utterance::new(features, label));
        }
        samples
    }

    fn toy_config(epochs: usize) -> TrainingConfig {
        TrainingConfig::new(epochs)
            .with_batch_size(2)
            .with_optimizer(crate::OptimizerConfig::adam(1e-2))
            .with_log_every(10)
    }

    #[test]
    fn fit_trains_and_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let device = <TrainBackend as Backend>::Device::default();
        <TrainBackend as Backend>::seed(42);

        let samples = toy_split();
        let config = toy_config(20);
        let model_config = ClassifierConfig::new(4, 2);
        let model = VoiceClassifier::<TrainBackend>::new(model_config, &device);

        let (_model, history, artifacts) =
            fit(model, &samples, &samples, &config, dir.path(), &device).unwrap();

        assert_eq!(history.len(), 20);
        assert!(history.best_epoch.is_some());
        assert!(artifacts.checkpoint.exists());
        assert!(artifacts.metrics_log.exists());

        let first = history.epochs[0].train_loss;
        let last = history.epochs[19].train_loss;
        assert!(last < first, "loss did not decrease: {first} -> {last}");
        assert!(history.epochs[19].train_accuracy >= 0.5);

        let log = std::fs::read_to_string(&artifacts.metrics_log).unwrap();
        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines.len(), 20);
        let parsed: EpochMetrics = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.epoch, 1);
    }

    #[test]
    fn fit_reloads_best_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let device = <TrainBackend as Backend>::Device::default();
        <TrainBackend as Backend>::seed(42);

        let samples = toy_split();
        let config = toy_config(10);
        let model_config = ClassifierConfig::new(4, 2);
        let model = VoiceClassifier::<TrainBackend>::new(model_config, &device);

        let (_model, _history, artifacts) =
            fit(model, &samples, &samples, &config, dir.path(), &device).unwrap();

        let reloaded = voice_model::load_checkpoint::<InferBackend>(
            model_config,
            &artifacts.checkpoint,
            &device,
        )
        .unwrap();
        let metrics = evaluate(&reloaded, &samples, 2, &device).unwrap();
        assert!(metrics.accuracy >= 0.0 && metrics.accuracy <= 1.0);
    }

    #[test]
    fn fit_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let device = <TrainBackend as Backend>::Device::default();
        let samples = toy_split();
        let model = VoiceClassifier::<TrainBackend>::new(ClassifierConfig::new(4, 2), &device);

        let err = fit(
            model,
            &samples,
            &samples,
            &TrainingConfig::new(0),
            dir.path(),
            &device,
        )
        .unwrap_err();
        assert!(matches!(err, TrainingError::InvalidConfig(_)));
    }

    #[test]
    fn fit_rejects_empty_splits() {
        let dir = tempfile::tempdir().unwrap();
        let device = <TrainBackend as Backend>::Device::default();
        let samples = toy_split();
        let model = VoiceClassifier::<TrainBackend>::new(ClassifierConfig::new(4, 2), &device);

        let err = fit(
            model,
            &[],
            &samples,
            &toy_config(5),
            dir.path(),
            &device,
        )
        .unwrap_err();
        assert!(matches!(err, TrainingError::Validation(_)));
    }

    #[test]
    fn evaluate_rejects_empty_split() {
        let device = <InferBackend as Backend>::Device::default();
        let model = VoiceClassifier::<InferBackend>::new(ClassifierConfig::new(4, 2), &device);

        let err = evaluate(&model, &[], 4, &device).unwrap_err();
        assert!(matches!(err, TrainingError::Validation(_)));
    }

    #[test]
    fn evaluate_rejects_zero_batch() {
        let device = <InferBackend as Backend>::Device::default();
        let model = VoiceClassifier::<InferBackend>::new(ClassifierConfig::new(4, 2), &device);

        let err = evaluate(&model, &toy_split(), 0, &device).unwrap_err();
        assert!(matches!(err, TrainingError::InvalidConfig(_)));
    }

    #[test]
    fn predictions_cover_every_sample() {
        let device = <InferBackend as Backend>::Device::default();
        let model = VoiceClassifier::<InferBackend>::new(ClassifierConfig::new(4, 2), &device);

        let samples = toy_split();
        let predicted = predictions(&model, &samples, 3, &device).unwrap();
        assert_eq!(predicted.len(), samples.len());
        assert!(predicted.iter().all(|&p| p < 2));
    }

    #[test]
    fn metrics_logger_appends_parseable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let mut logger = MetricsLogger::create(&path).unwrap();

        logger
            .append(&EpochMetrics::new(1, 0.9, 0.4).with_validation(1.0, 0.3))
            .unwrap();
        logger
            .append(&EpochMetrics::new(2, 0.5, 0.8).with_validation(0.6, 0.7))
            .unwrap();
        assert_eq!(logger.lines(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<EpochMetrics> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].epoch, 2);
    }
}
