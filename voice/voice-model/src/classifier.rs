//! Feed-forward voice-command classifier.

use std::fmt::Write as _;

use burn::module::Module;
use burn::nn;
use burn::prelude::Backend;
use burn::tensor::activation::{relu, softmax};
use burn::tensor::{Int, Tensor};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Configuration for the voice classifier.
///
/// The network shape is derived from the corpus: the first layer preserves
/// the feature width, the hidden layer is `hidden_multiplier` times the
/// class count, and the output layer has one unit per class.
///
/// # Example
///
/// ```
/// use voice_model::ClassifierConfig;
///
/// let config = ClassifierConfig::for_corpus(26, 3);
/// assert_eq!(config.hidden_dim(), 12);
/// assert_eq!(config.num_parameters(), 1065);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Input feature vector length.
    pub num_features: usize,

    /// Number of output classes.
    pub num_classes: usize,

    /// Hidden layer width as a multiple of the class count.
    pub hidden_multiplier: usize,

    /// Dropout probability applied after the first two layers.
    pub dropout: f64,
}

impl ClassifierConfig {
    /// Default hidden width multiplier.
    pub const DEFAULT_HIDDEN_MULTIPLIER: usize = 4;

    /// Default dropout probability.
    pub const DEFAULT_DROPOUT: f64 = 0.25;

    /// Creates a new configuration.
    #[must_use]
    pub const fn new(num_features: usize, num_classes: usize) -> Self {
        Self {
            num_features,
            num_classes,
            hidden_multiplier: Self::DEFAULT_HIDDEN_MULTIPLIER,
            dropout: Self::DEFAULT_DROPOUT,
        }
    }

    /// Creates the standard configuration for a corpus shape.
    #[must_use]
    pub const fn for_corpus(num_features: usize, num_classes: usize) -> Self {
        Self::new(num_features, num_classes)
    }

    /// Sets the hidden width multiplier.
    #[must_use]
    pub const fn with_hidden_multiplier(mut self, hidden_multiplier: usize) -> Self {
        self.hidden_multiplier = hidden_multiplier;
        self
    }

    /// Sets the dropout probability.
    #[must_use]
    pub const fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }

    /// Returns the hidden layer width.
    #[must_use]
    pub const fn hidden_dim(&self) -> usize {
        self.hidden_multiplier * self.num_classes
    }

    /// Validates the configuration.
    ///
    /// Returns `true` if all dimensions are positive and dropout is in
    /// `[0, 1)`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.num_features > 0
            && self.num_classes > 0
            && self.hidden_multiplier > 0
            && self.dropout >= 0.0
            && self.dropout < 1.0
    }

    /// Total number of trainable parameters (weights and biases).
    #[must_use]
    pub const fn num_parameters(&self) -> usize {
        let hidden = self.hidden_dim();
        self.num_features * self.num_features + self.num_features
            + self.num_features * hidden + hidden
            + hidden * self.num_classes + self.num_classes
    }

    /// Renders a layer-by-layer summary of the network.
    #[must_use]
    pub fn summary(&self) -> String {
        let hidden = self.hidden_dim();
        let rows = [
            ("dense1 (relu)", self.num_features, self.num_features * self.num_features + self.num_features),
            ("dropout1", self.num_features, 0),
            ("dense2 (relu)", hidden, self.num_features * hidden + hidden),
            ("dropout2", hidden, 0),
            ("dense3 (softmax)", self.num_classes, hidden * self.num_classes + self.num_classes),
        ];

        let mut summary = String::new();
        let _ = writeln!(summary, "Voice Classifier Summary");
        let _ = writeln!(summary, "========================");
        let _ = writeln!(summary, "{:<18} {:>10} {:>8}", "Layer", "Output", "Params");
        for (name, width, params) in rows {
            let shape = format!("[_, {width}]");
            let _ = writeln!(summary, "{name:<18} {shape:>10} {params:>8}");
        }
        let _ = writeln!(summary);
        let _ = writeln!(summary, "Total parameters: {}", self.num_parameters());

        summary
    }
}

/// A feed-forward classifier for fixed-length voice feature vectors.
///
/// Architecture:
///
/// ```text
/// Linear(features -> features) -> ReLU -> Dropout
///   -> Linear(features -> 4 x classes) -> ReLU -> Dropout
///   -> Linear(4 x classes -> classes)
/// ```
///
/// [`VoiceClassifier::forward`] returns logits; the cross-entropy loss
/// consumes logits directly, so softmax is applied only by
/// [`VoiceClassifier::probabilities`]. Dropout is active on autodiff
/// backends (training) and inert during inference.
///
/// # Type Parameters
///
/// - `B`: The Burn backend (e.g., `NdArray`, `Autodiff<NdArray>`)
#[derive(Debug, Module)]
pub struct VoiceClassifier<B: Backend> {
    pub(crate) linear1: nn::Linear<B>,
    pub(crate) linear2: nn::Linear<B>,
    pub(crate) linear3: nn::Linear<B>,
    drop1: nn::Dropout,
    drop2: nn::Dropout,
}

impl<B: Backend> VoiceClassifier<B> {
    /// Creates a new classifier with randomly initialized weights.
    ///
    /// # Arguments
    ///
    /// - `config`: Model configuration
    /// - `device`: The device to create the model on
    #[must_use]
    pub fn new(config: ClassifierConfig, device: &B::Device) -> Self {
        let linear1 = nn::LinearConfig::new(config.num_features, config.num_features).init(device);
        let linear2 = nn::LinearConfig::new(config.num_features, config.hidden_dim()).init(device);
        let linear3 = nn::LinearConfig::new(config.hidden_dim(), config.num_classes).init(device);
        let drop1 = nn::DropoutConfig::new(config.dropout).init();
        let drop2 = nn::DropoutConfig::new(config.dropout).init();

        Self {
            linear1,
            linear2,
            linear3,
            drop1,
            drop2,
        }
    }

    /// Runs the forward pass.
    ///
    /// # Arguments
    ///
    /// - `input`: Input tensor of shape `[batch_size, num_features]`
    ///
    /// # Returns
    ///
    /// Output tensor of shape `[batch_size, num_classes]` (logits, not
    /// probabilities).
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.linear1.forward(input));
        let x = self.drop1.forward(x);
        let x = relu(self.linear2.forward(x));
        let x = self.drop2.forward(x);
        self.linear3.forward(x)
    }

    /// Runs the forward pass and applies softmax.
    ///
    /// # Returns
    ///
    /// Class probabilities of shape `[batch_size, num_classes]`; each row
    /// sums to 1.
    pub fn probabilities(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.forward(input), 1)
    }

    /// Predicts the class index for each input row.
    ///
    /// # Errors
    ///
    /// Returns an error if tensor data cannot be read back from the
    /// backend.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn predict(&self, input: Tensor<B, 2>) -> Result<Vec<u32>> {
        let classes: Tensor<B, 1, Int> = self.forward(input).argmax(1).squeeze(1);
        let values = classes
            .into_data()
            .convert::<i64>()
            .to_vec::<i64>()
            .map_err(|e| ModelError::export_failed(format!("argmax readback failed: {e:?}")))?;
        Ok(values.into_iter().map(|v| v as u32).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn config_new() {
        let config = ClassifierConfig::new(26, 4);
        assert_eq!(config.num_features, 26);
        assert_eq!(config.num_classes, 4);
        assert_eq!(config.hidden_multiplier, 4);
        assert!((config.dropout - 0.25).abs() < 1e-9);
        assert!(config.is_valid());
    }

    #[test]
    fn config_hidden_dim() {
        let config = ClassifierConfig::for_corpus(26, 3);
        assert_eq!(config.hidden_dim(), 12);

        let wide = config.with_hidden_multiplier(8);
        assert_eq!(wide.hidden_dim(), 24);
    }

    #[test]
    fn config_builder() {
        let config = ClassifierConfig::new(8, 2)
            .with_hidden_multiplier(6)
            .with_dropout(0.5);

        assert_eq!(config.hidden_dim(), 12);
        assert!((config.dropout - 0.5).abs() < 1e-9);
    }

    #[test]
    fn config_invalid() {
        assert!(!ClassifierConfig::new(0, 3).is_valid());
        assert!(!ClassifierConfig::new(26, 0).is_valid());
        assert!(!ClassifierConfig::new(26, 3).with_dropout(1.0).is_valid());
        assert!(!ClassifierConfig::new(26, 3).with_dropout(-0.1).is_valid());
    }

    #[test]
    fn config_num_parameters() {
        // 26*26+26 + 26*12+12 + 12*3+3 = 702 + 324 + 39
        let config = ClassifierConfig::for_corpus(26, 3);
        assert_eq!(config.num_parameters(), 1065);
    }

    #[test]
    fn config_summary() {
        let summary = ClassifierConfig::for_corpus(26, 3).summary();
        assert!(summary.contains("Voice Classifier Summary"));
        assert!(summary.contains("dense1"));
        assert!(summary.contains("dense3 (softmax)"));
        assert!(summary.contains("Total parameters: 1065"));
    }

    #[test]
    fn config_serialization() {
        let config = ClassifierConfig::for_corpus(26, 3);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ClassifierConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn classifier_forward_shape() {
        let config = ClassifierConfig::for_corpus(26, 3);
        let device = <TestBackend as Backend>::Device::default();
        let model = VoiceClassifier::<TestBackend>::new(config, &device);

        let input = Tensor::<TestBackend, 2>::zeros([5, 26], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [5, 3]);
    }

    #[test]
    fn classifier_probabilities_sum_to_one() {
        let config = ClassifierConfig::for_corpus(8, 2);
        let device = <TestBackend as Backend>::Device::default();
        let model = VoiceClassifier::<TestBackend>::new(config, &device);

        let input = Tensor::<TestBackend, 2>::ones([3, 8], &device);
        let probs = model.probabilities(input);
        let row_sums = probs.sum_dim(1).into_data().convert::<f32>();
        let sums = row_sums.to_vec::<f32>().unwrap();

        for sum in sums {
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn classifier_predict_in_range() {
        let config = ClassifierConfig::for_corpus(8, 4);
        let device = <TestBackend as Backend>::Device::default();
        let model = VoiceClassifier::<TestBackend>::new(config, &device);

        let input = Tensor::<TestBackend, 2>::ones([6, 8], &device);
        let predicted = model.predict(input).unwrap();

        assert_eq!(predicted.len(), 6);
        assert!(predicted.iter().all(|&c| c < 4));
    }
}
