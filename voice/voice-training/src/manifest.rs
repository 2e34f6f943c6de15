//! Run manifest written alongside training artifacts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::TrainingConfig;
use crate::error::{Result, TrainingError};

/// File name for the run manifest.
pub const MANIFEST_FILE: &str = "run_manifest.json";

/// Schema version for manifest files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl SchemaVersion {
    /// Current schema version.
    pub const CURRENT: Self = Self { major: 1, minor: 0 };

    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Checks if this version is compatible with another.
    ///
    /// Compatible means same major version.
    #[must_use]
    pub const fn is_compatible(&self, other: &Self) -> bool {
        self.major == other.major
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Relative paths of the files a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Best-weights checkpoint.
    pub checkpoint: String,

    /// Per-epoch metrics log.
    pub metrics_log: String,

    /// Exported C header.
    pub model_header: String,

    /// Training curves SVG.
    pub curves: String,
}

/// Run manifest - metadata for a single training run.
///
/// Records the configuration, split sizes, best epoch, held-out test
/// results, and artifact locations, so a run directory is
/// self-describing.
///
/// # Example
///
/// ```
/// use voice_training::{RunManifest, TrainingConfig};
///
/// let manifest = RunManifest::new("run_001", TrainingConfig::default())
///     .with_split_sizes(60, 20, 20)
///     .with_test_metrics(0.35, 0.9);
///
/// assert_eq!(manifest.run_id, "run_001");
/// assert_eq!(manifest.total_samples(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Schema version for compatibility.
    pub schema_version: SchemaVersion,

    /// Unique run identifier.
    pub run_id: String,

    /// Creation timestamp (Unix seconds).
    pub created_at: f64,

    /// Configuration the run used.
    pub config: TrainingConfig,

    /// Number of training samples.
    pub train_samples: usize,

    /// Number of validation samples.
    pub val_samples: usize,

    /// Number of test samples.
    pub test_samples: usize,

    /// Epoch that produced the best monitored metric.
    pub best_epoch: usize,

    /// Best value of the monitored metric.
    pub best_metric: f32,

    /// Loss over the held-out test split.
    pub test_loss: f32,

    /// Accuracy over the held-out test split.
    pub test_accuracy: f32,

    /// Files the run produced.
    pub artifacts: ArtifactPaths,
}

impl RunManifest {
    /// Creates a new run manifest.
    #[must_use]
    pub fn new(run_id: impl Into<String>, config: TrainingConfig) -> Self {
        Self {
            schema_version: SchemaVersion::CURRENT,
            run_id: run_id.into(),
            created_at: 0.0,
            config,
            train_samples: 0,
            val_samples: 0,
            test_samples: 0,
            best_epoch: 0,
            best_metric: 0.0,
            test_loss: 0.0,
            test_accuracy: 0.0,
            artifacts: ArtifactPaths::default(),
        }
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: f64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the split sizes.
    #[must_use]
    pub const fn with_split_sizes(mut self, train: usize, val: usize, test: usize) -> Self {
        self.train_samples = train;
        self.val_samples = val;
        self.test_samples = test;
        self
    }

    /// Sets the best epoch and metric value.
    #[must_use]
    pub const fn with_best(mut self, epoch: usize, metric: f32) -> Self {
        self.best_epoch = epoch;
        self.best_metric = metric;
        self
    }

    /// Sets the held-out test results.
    #[must_use]
    pub const fn with_test_metrics(mut self, loss: f32, accuracy: f32) -> Self {
        self.test_loss = loss;
        self.test_accuracy = accuracy;
        self
    }

    /// Sets the artifact paths.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: ArtifactPaths) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Total samples across all splits.
    #[must_use]
    pub const fn total_samples(&self) -> usize {
        self.train_samples + self.val_samples + self.test_samples
    }

    /// Writes the manifest as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), run_id = %self.run_id, "Wrote run manifest");
        Ok(())
    }

    /// Reads a manifest from a JSON file, checking schema compatibility.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or was
    /// written by an incompatible schema version.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let manifest: Self = serde_json::from_str(&content)?;

        if !manifest.schema_version.is_compatible(&SchemaVersion::CURRENT) {
            return Err(TrainingError::validation(format!(
                "manifest schema {} is incompatible with {}",
                manifest.schema_version,
                SchemaVersion::CURRENT
            )));
        }
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_version_display_and_compat() {
        let v = SchemaVersion::new(1, 2);
        assert_eq!(format!("{v}"), "1.2");
        assert!(v.is_compatible(&SchemaVersion::new(1, 0)));
        assert!(!v.is_compatible(&SchemaVersion::new(2, 0)));
    }

    #[test]
    fn manifest_new_defaults() {
        let manifest = RunManifest::new("run_001", TrainingConfig::default());
        assert_eq!(manifest.run_id, "run_001");
        assert_eq!(manifest.schema_version, SchemaVersion::CURRENT);
        assert_eq!(manifest.total_samples(), 0);
    }

    #[test]
    fn manifest_builders() {
        let manifest = RunManifest::new("run_002", TrainingConfig::default())
            .with_created_at(1_700_000_000.0)
            .with_split_sizes(60, 20, 20)
            .with_best(42, 0.97)
            .with_test_metrics(0.3, 0.9)
            .with_artifacts(ArtifactPaths {
                checkpoint: "voice_classifier.bin".to_string(),
                metrics_log: "training_log.jsonl".to_string(),
                model_header: "voice_model.h".to_string(),
                curves: "training_curves.svg".to_string(),
            });

        assert_eq!(manifest.total_samples(), 100);
        assert_eq!(manifest.best_epoch, 42);
        assert_eq!(manifest.test_accuracy, 0.9);
        assert_eq!(manifest.artifacts.model_header, "voice_model.h");
    }

    #[test]
    fn manifest_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);

        let manifest = RunManifest::new("run_003", TrainingConfig::default())
            .with_split_sizes(6, 2, 2)
            .with_test_metrics(0.5, 0.8);
        manifest.to_json_file(&path).unwrap();

        let loaded = RunManifest::from_json_file(&path).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn manifest_rejects_incompatible_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);

        let mut manifest = RunManifest::new("run_004", TrainingConfig::default());
        manifest.schema_version = SchemaVersion::new(2, 0);
        manifest.to_json_file(&path).unwrap();

        let err = RunManifest::from_json_file(&path).unwrap_err();
        assert!(matches!(err, TrainingError::Validation(_)));
        assert!(err.to_string().contains("incompatible"));
    }
}
