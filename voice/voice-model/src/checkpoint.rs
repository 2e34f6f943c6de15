//! Checkpoint persistence for model weights.

use std::path::{Path, PathBuf};

use burn::module::Module;
use burn::prelude::Backend;
use burn::record::{BinFileRecorder, FullPrecisionSettings, PrettyJsonFileRecorder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::{ClassifierConfig, VoiceClassifier};
use crate::error::{ModelError, Result};

/// Supported checkpoint file formats.
///
/// # Example
///
/// ```
/// use voice_model::CheckpointFormat;
///
/// let format = CheckpointFormat::from_extension("bin");
/// assert_eq!(format, Some(CheckpointFormat::Binary));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckpointFormat {
    /// Binary format - compact and fast.
    ///
    /// Uses Burn's `BinFileRecorder` with full precision.
    #[default]
    Binary,

    /// JSON format - human-readable.
    ///
    /// Uses Burn's `PrettyJsonFileRecorder` for debugging and inspection.
    /// Larger file size but portable.
    Json,
}

impl CheckpointFormat {
    /// Determines format from file extension.
    ///
    /// - `.bin`, `.burn` -> Binary
    /// - `.json` -> Json
    /// - Other -> None
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "bin" | "burn" => Some(Self::Binary),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Determines format from file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the default file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Json => "json",
        }
    }

    /// Returns the format name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for CheckpointFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Saves the classifier weights to a checkpoint file.
///
/// Saving to the same path overwrites the previous checkpoint, which is
/// how best-only checkpointing works: the file on disk always holds the
/// best weights seen so far.
///
/// # Arguments
///
/// - `model`: The model to save
/// - `path`: Output file path (extension is replaced per format)
/// - `format`: Checkpoint format to use
///
/// # Returns
///
/// The full path to the saved checkpoint (with extension).
///
/// # Errors
///
/// Returns `ModelError::SaveCheckpoint` if saving fails.
pub fn save_checkpoint<B: Backend>(
    model: &VoiceClassifier<B>,
    path: &Path,
    format: CheckpointFormat,
) -> Result<PathBuf> {
    let full_path = path.with_extension(format.extension());

    match format {
        CheckpointFormat::Binary => {
            let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
            model
                .clone()
                .save_file(&full_path, &recorder)
                .map_err(|e| {
                    ModelError::save_checkpoint(full_path.display().to_string(), e.to_string())
                })?;
        }
        CheckpointFormat::Json => {
            let recorder = PrettyJsonFileRecorder::<FullPrecisionSettings>::new();
            model
                .clone()
                .save_file(&full_path, &recorder)
                .map_err(|e| {
                    ModelError::save_checkpoint(full_path.display().to_string(), e.to_string())
                })?;
        }
    }

    debug!(path = %full_path.display(), format = %format, "Saved checkpoint");
    Ok(full_path)
}

/// Loads classifier weights from a checkpoint file.
///
/// The format is inferred from the file extension.
///
/// # Arguments
///
/// - `config`: Configuration matching the saved model's shape
/// - `path`: Path to the checkpoint file (with extension)
/// - `device`: Device to load the model onto
///
/// # Returns
///
/// A classifier with the saved weights.
///
/// # Errors
///
/// Returns `ModelError::CheckpointNotFound` if the file doesn't exist,
/// `ModelError::UnsupportedFormat` if the extension is not recognized,
/// and `ModelError::LoadCheckpoint` if deserialization fails.
pub fn load_checkpoint<B: Backend>(
    config: ClassifierConfig,
    path: &Path,
    device: &B::Device,
) -> Result<VoiceClassifier<B>> {
    if !path.exists() {
        return Err(ModelError::checkpoint_not_found(
            path.display().to_string(),
        ));
    }

    let format = CheckpointFormat::from_path(path)
        .ok_or_else(|| ModelError::unsupported_format(path.display().to_string()))?;

    let model = VoiceClassifier::<B>::new(config, device);
    let loaded = match format {
        CheckpointFormat::Binary => {
            let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
            model.load_file(path, &recorder, device).map_err(|e| {
                ModelError::load_checkpoint(path.display().to_string(), e.to_string())
            })?
        }
        CheckpointFormat::Json => {
            let recorder = PrettyJsonFileRecorder::<FullPrecisionSettings>::new();
            model.load_file(path, &recorder, device).map_err(|e| {
                ModelError::load_checkpoint(path.display().to_string(), e.to_string())
            })?
        }
    };

    debug!(path = %path.display(), format = %format, "Loaded checkpoint");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Tensor;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            CheckpointFormat::from_extension("bin"),
            Some(CheckpointFormat::Binary)
        );
        assert_eq!(
            CheckpointFormat::from_extension("burn"),
            Some(CheckpointFormat::Binary)
        );
        assert_eq!(
            CheckpointFormat::from_extension("json"),
            Some(CheckpointFormat::Json)
        );
        assert_eq!(
            CheckpointFormat::from_extension("BIN"),
            Some(CheckpointFormat::Binary)
        );
        assert_eq!(CheckpointFormat::from_extension("xml"), None);
    }

    #[test]
    fn format_from_path() {
        assert_eq!(
            CheckpointFormat::from_path(Path::new("model.bin")),
            Some(CheckpointFormat::Binary)
        );
        assert_eq!(
            CheckpointFormat::from_path(Path::new("/path/to/model.json")),
            Some(CheckpointFormat::Json)
        );
        assert_eq!(CheckpointFormat::from_path(Path::new("model")), None);
    }

    #[test]
    fn format_extension_and_name() {
        assert_eq!(CheckpointFormat::Binary.extension(), "bin");
        assert_eq!(CheckpointFormat::Json.extension(), "json");
        assert_eq!(CheckpointFormat::Binary.name(), "binary");
        assert_eq!(format!("{}", CheckpointFormat::Json), "json");
    }

    #[test]
    fn format_default() {
        assert_eq!(CheckpointFormat::default(), CheckpointFormat::Binary);
    }

    #[test]
    fn checkpoint_roundtrip_binary() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClassifierConfig::for_corpus(8, 2);
        let device = <TestBackend as Backend>::Device::default();
        let model = VoiceClassifier::<TestBackend>::new(config, &device);

        let input = Tensor::<TestBackend, 2>::ones([2, 8], &device);
        let before = model.forward(input.clone()).into_data();

        let saved = save_checkpoint(&model, &dir.path().join("model"), CheckpointFormat::Binary)
            .unwrap();
        assert!(saved.exists());
        assert_eq!(saved.extension().and_then(|e| e.to_str()), Some("bin"));

        let loaded = load_checkpoint::<TestBackend>(config, &saved, &device).unwrap();
        let after = loaded.forward(input).into_data();

        assert_eq!(
            before.to_vec::<f32>().unwrap(),
            after.to_vec::<f32>().unwrap()
        );
    }

    #[test]
    fn checkpoint_missing_file() {
        let config = ClassifierConfig::for_corpus(8, 2);
        let device = <TestBackend as Backend>::Device::default();

        let err = load_checkpoint::<TestBackend>(config, Path::new("/nonexistent/model.bin"), &device);
        assert!(matches!(err, Err(ModelError::CheckpointNotFound(_))));
    }

    #[test]
    fn checkpoint_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.xyz");
        std::fs::write(&path, b"junk").unwrap();

        let config = ClassifierConfig::for_corpus(8, 2);
        let device = <TestBackend as Backend>::Device::default();

        let err = load_checkpoint::<TestBackend>(config, &path, &device);
        assert!(matches!(err, Err(ModelError::UnsupportedFormat(_))));
    }
}
