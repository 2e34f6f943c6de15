//! VoiceForge training pipeline.
//!
//! Loads a feature corpus, splits it 60/20/20, trains the classifier,
//! evaluates the best checkpoint on the held-out test split, and writes
//! the deployment artifacts: checkpoint, metrics log, C header,
//! training curves, and run manifest.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::prelude::Backend;
use burn_autodiff::Autodiff;
use burn_ndarray::NdArray;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use voice_dataset::{split_corpus, CorpusSummary, FeatureCorpus, SplitRatios};
use voice_eval::ClassificationReport;
use voice_model::{
    load_checkpoint, write_c_header, CheckpointFormat, ClassifierConfig, ExportParams, ModelExport,
    VoiceClassifier,
};
use voice_training::{
    evaluate, fit, predictions, write_curves_svg, ArtifactPaths, CurveParams, OptimizerConfig,
    RunManifest, TrainingConfig, MANIFEST_FILE,
};

type TrainBackend = Autodiff<NdArray<f32>>;
type InferBackend = NdArray<f32>;

/// File name for the exported C model header.
const MODEL_HEADER_FILE: &str = "voice_model.h";

/// File name for the training curves.
const CURVES_FILE: &str = "training_curves.svg";

/// Train the VoiceForge command classifier.
#[derive(Parser, Debug)]
#[command(name = "voice-trainer")]
#[command(about = "Train the VoiceForge command classifier", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the feature corpus (JSON).
    dataset: PathBuf,

    /// Directory for run artifacts.
    #[arg(long, default_value = "runs/voice")]
    out_dir: PathBuf,

    /// Number of training epochs.
    #[arg(long, default_value_t = TrainingConfig::DEFAULT_EPOCHS)]
    epochs: usize,

    /// Mini-batch size.
    #[arg(long, default_value_t = TrainingConfig::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Adam learning rate.
    #[arg(long, default_value_t = 1e-3)]
    learning_rate: f32,

    /// Seed for splitting and epoch shuffling.
    #[arg(long, default_value_t = TrainingConfig::DEFAULT_SEED)]
    seed: u64,

    /// Epochs to skip at the start of the curves plot.
    #[arg(long, default_value_t = CurveParams::DEFAULT_SKIP_EPOCHS)]
    display_skip: usize,

    /// Checkpoint format.
    #[arg(long, value_enum, default_value = "binary")]
    checkpoint_format: FormatArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum FormatArg {
    /// Compact binary checkpoint.
    Binary,
    /// Human-readable JSON checkpoint.
    Json,
}

impl From<FormatArg> for CheckpointFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Binary => Self::Binary,
            FormatArg::Json => Self::Json,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let corpus = FeatureCorpus::from_json_file(&args.dataset)
        .with_context(|| format!("loading corpus from {}", args.dataset.display()))?;
    println!("{}", CorpusSummary::from_corpus(&corpus).to_report());

    <TrainBackend as Backend>::seed(args.seed);
    let device = <TrainBackend as Backend>::Device::default();

    let model_config = ClassifierConfig::for_corpus(corpus.feature_len, corpus.class_names.len());
    println!("{}", model_config.summary());

    let splits = split_corpus(&corpus, SplitRatios::TRAIN60_VAL20_TEST20, args.seed)?;
    info!(
        train = splits.train.len(),
        val = splits.val.len(),
        test = splits.test.len(),
        "Split corpus"
    );

    let config = TrainingConfig::new(args.epochs)
        .with_batch_size(args.batch_size)
        .with_optimizer(OptimizerConfig::adam(args.learning_rate))
        .with_seed(args.seed)
        .with_checkpoint_format(args.checkpoint_format.into());

    let model = VoiceClassifier::<TrainBackend>::new(model_config, &device);
    let (_model, history, artifacts) = fit(
        model,
        &splits.train,
        &splits.val,
        &config,
        &args.out_dir,
        &device,
    )?;
    println!("{}", history.summary());

    // Score the best checkpoint, not the final weights.
    let best = load_checkpoint::<InferBackend>(model_config, &artifacts.checkpoint, &device)
        .context("reloading best checkpoint")?;
    let test_metrics = evaluate(&best, &splits.test, config.batch_size, &device)?;
    let predicted = predictions(&best, &splits.test, config.batch_size, &device)?;
    let expected: Vec<u32> = splits.test.iter().map(|u| u.label).collect();
    let report = ClassificationReport::from_predictions(&predicted, &expected, &corpus.class_names)?;

    println!("Test accuracy: {:.3}", test_metrics.accuracy);
    println!("Test loss: {:.3}", test_metrics.loss);
    println!();
    println!("{}", report.to_report());

    let export = ModelExport::from_classifier(&best, model_config, &corpus.class_names)?;
    let header_path = args.out_dir.join(MODEL_HEADER_FILE);
    write_c_header(&export, &header_path, &ExportParams::default())?;

    let curves_path = args.out_dir.join(CURVES_FILE);
    let curve_params = CurveParams::default()
        .with_skip_epochs(args.display_skip)
        .with_titles(
            &format!("Accuracy over epochs (test {:.3})", test_metrics.accuracy),
            &format!("Loss over epochs (test {:.3})", test_metrics.loss),
        );
    write_curves_svg(&history, &curves_path, &curve_params)?;

    let manifest = RunManifest::new(run_id(), config)
        .with_created_at(created_at())
        .with_split_sizes(splits.train.len(), splits.val.len(), splits.test.len())
        .with_best(
            history.best_epoch.unwrap_or(0),
            history.best_metric.unwrap_or(0.0),
        )
        .with_test_metrics(test_metrics.loss, test_metrics.accuracy)
        .with_artifacts(ArtifactPaths {
            checkpoint: file_name(&artifacts.checkpoint),
            metrics_log: file_name(&artifacts.metrics_log),
            model_header: MODEL_HEADER_FILE.to_string(),
            curves: CURVES_FILE.to_string(),
        });
    manifest.to_json_file(&args.out_dir.join(MANIFEST_FILE))?;

    info!(out_dir = %args.out_dir.display(), "Run complete");
    Ok(())
}

fn run_id() -> String {
    format!("run_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
}

#[allow(clippy::cast_precision_loss)]
fn created_at() -> f64 {
    chrono::Utc::now().timestamp() as f64
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
