//! C header export of trained weights for firmware embedding.
//!
//! The exporter turns a trained [`VoiceClassifier`] into a self-contained
//! C header: dimension `#define`s plus one `static const float` array per
//! weight/bias tensor. Firmware implements the forward pass (two ReLU
//! layers and a softmax readout) directly against those arrays.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use burn::nn;
use burn::prelude::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::{ClassifierConfig, VoiceClassifier};
use crate::error::{ModelError, Result};

/// Number of array values emitted per source line.
const VALUES_PER_LINE: usize = 8;

/// Parameters controlling C header rendering.
///
/// # Example
///
/// ```
/// use voice_model::ExportParams;
///
/// let params = ExportParams::default().with_prefix("KWS_MODEL");
/// assert_eq!(params.prefix, "KWS_MODEL");
/// assert_eq!(params.guard, "KWS_MODEL_H");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportParams {
    /// Include-guard macro name.
    pub guard: String,
    /// Prefix for all emitted symbols.
    pub prefix: String,
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            guard: "VOICE_MODEL_H".to_string(),
            prefix: "VOICE_MODEL".to_string(),
        }
    }
}

impl ExportParams {
    /// Sets the symbol prefix and derives the include guard from it.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.guard = format!("{}_H", self.prefix);
        self
    }

    /// Sets the include-guard macro name.
    #[must_use]
    pub fn with_guard(mut self, guard: impl Into<String>) -> Self {
        self.guard = guard.into();
        self
    }
}

/// Weights of one dense layer, extracted to plain vectors.
///
/// `weights` is row-major `[input_dim][output_dim]`, matching the layout
/// of Burn's `Linear` weight tensor: `weights[i * output_dim + j]` is the
/// contribution of input `i` to output `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Layer name, used for emitted symbols.
    pub name: String,
    /// Activation the firmware should apply after this layer.
    pub activation: String,
    /// Input width.
    pub input_dim: usize,
    /// Output width.
    pub output_dim: usize,
    /// Row-major weight matrix values.
    pub weights: Vec<f32>,
    /// Bias values, one per output unit.
    pub bias: Vec<f32>,
}

/// A trained model reduced to exportable weight arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelExport {
    /// Class names in label order.
    pub class_names: Vec<String>,
    /// Input feature vector length.
    pub num_features: usize,
    /// Number of output classes.
    pub num_classes: usize,
    /// Dense layers in forward order.
    pub layers: Vec<DenseLayer>,
}

impl ModelExport {
    /// Extracts the weights of a trained classifier.
    ///
    /// # Arguments
    ///
    /// - `model`: The trained classifier
    /// - `config`: Configuration the classifier was built with
    /// - `class_names`: Class names in label order
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ExportFailed` if tensor data cannot be read
    /// back or any weight is non-finite.
    pub fn from_classifier<B: Backend>(
        model: &VoiceClassifier<B>,
        config: ClassifierConfig,
        class_names: &[String],
    ) -> Result<Self> {
        let layers = vec![
            extract_layer("dense1", "relu", &model.linear1)?,
            extract_layer("dense2", "relu", &model.linear2)?,
            extract_layer("dense3", "softmax", &model.linear3)?,
        ];

        Ok(Self {
            class_names: class_names.to_vec(),
            num_features: config.num_features,
            num_classes: config.num_classes,
            layers,
        })
    }

    /// Total number of exported parameter values.
    #[must_use]
    pub fn total_params(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.bias.len())
            .sum()
    }

    /// Renders the export as a self-contained C header.
    #[must_use]
    pub fn to_c_header(&self, params: &ExportParams) -> String {
        let mut header = String::new();
        let prefix = &params.prefix;

        let _ = writeln!(header, "// Generated by voice-trainer. Do not edit.");
        let _ = writeln!(header, "// Classes: {}", self.class_names.join(", "));
        let _ = writeln!(header, "#ifndef {}", params.guard);
        let _ = writeln!(header, "#define {}", params.guard);
        let _ = writeln!(header);
        let _ = writeln!(header, "#define {prefix}_INPUT_DIM {}", self.num_features);
        let _ = writeln!(header, "#define {prefix}_NUM_CLASSES {}", self.num_classes);
        let _ = writeln!(header, "#define {prefix}_NUM_LAYERS {}", self.layers.len());
        let _ = writeln!(header, "#define {prefix}_TOTAL_PARAMS {}", self.total_params());

        for layer in &self.layers {
            let symbol = format!("{prefix}_{}", layer.name.to_uppercase());
            let _ = writeln!(header);
            let _ = writeln!(
                header,
                "// {}: {} -> {} ({})",
                layer.name, layer.input_dim, layer.output_dim, layer.activation
            );
            let _ = writeln!(header, "#define {symbol}_IN {}", layer.input_dim);
            let _ = writeln!(header, "#define {symbol}_OUT {}", layer.output_dim);
            let _ = writeln!(
                header,
                "static const float {symbol}_WEIGHTS[{symbol}_IN * {symbol}_OUT] = {{"
            );
            write_values(&mut header, &layer.weights);
            let _ = writeln!(header, "}};");
            let _ = writeln!(header, "static const float {symbol}_BIAS[{symbol}_OUT] = {{");
            write_values(&mut header, &layer.bias);
            let _ = writeln!(header, "}};");
        }

        let _ = writeln!(header);
        let _ = writeln!(header, "#endif  // {}", params.guard);

        header
    }
}

/// Renders the header and writes it to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_c_header(export: &ModelExport, path: &Path, params: &ExportParams) -> Result<()> {
    let header = export.to_c_header(params);
    fs::write(path, &header)?;

    info!(
        path = %path.display(),
        bytes = header.len(),
        params = export.total_params(),
        "Wrote model header"
    );
    Ok(())
}

fn extract_layer<B: Backend>(
    name: &str,
    activation: &str,
    linear: &nn::Linear<B>,
) -> Result<DenseLayer> {
    let weight = linear.weight.val();
    let [input_dim, output_dim] = weight.dims();

    let weights = tensor_values(weight)?;
    let bias = match &linear.bias {
        Some(bias) => tensor_values(bias.val())?,
        None => vec![0.0; output_dim],
    };

    if weights.iter().chain(bias.iter()).any(|v| !v.is_finite()) {
        return Err(ModelError::export_failed(format!(
            "layer {name} contains non-finite weights"
        )));
    }

    Ok(DenseLayer {
        name: name.to_string(),
        activation: activation.to_string(),
        input_dim,
        output_dim,
        weights,
        bias,
    })
}

fn tensor_values<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| ModelError::export_failed(format!("tensor readback failed: {e:?}")))
}

fn write_values(header: &mut String, values: &[f32]) {
    for chunk in values.chunks(VALUES_PER_LINE) {
        let line = chunk
            .iter()
            .map(|v| format!("{v:e}f"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(header, "    {line},");
    }
}
