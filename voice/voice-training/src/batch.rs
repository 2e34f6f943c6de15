//! Tensor assembly for utterance batches.

use burn::prelude::Backend;
use burn::tensor::{Int, Tensor, TensorData};
use voice_dataset::Utterance;

/// Builds feature and label tensors for a batch of utterances.
///
/// Features become a `[batch, feature_len]` float tensor, labels a
/// `[batch]` int tensor. Callers pass batches drawn from a validated
/// corpus, so every utterance has the same feature length.
#[must_use]
pub fn batch_tensors<B: Backend>(
    samples: &[Utterance],
    device: &B::Device,
) -> (Tensor<B, 2>, Tensor<B, 1, Int>) {
    let rows = samples.len();
    let cols = samples.first().map_or(0, Utterance::feature_len);

    let mut features = Vec::with_capacity(rows * cols);
    let mut labels = Vec::with_capacity(rows);
    for sample in samples {
        features.extend_from_slice(&sample.features);
        labels.push(i64::from(sample.label));
    }

    let features = Tensor::from_floats(TensorData::new(features, [rows, cols]), device);
    let labels = Tensor::from_ints(TensorData::new(labels, [rows]), device);
    (features, labels)
}

/// Builds batch tensors from `samples` at the given indices.
///
/// Used by the shuffled training loop, which works over an index
/// permutation rather than reordering the split itself.
#[must_use]
pub fn batch_tensors_at<B: Backend>(
    samples: &[Utterance],
    indices: &[usize],
    device: &B::Device,
) -> (Tensor<B, 2>, Tensor<B, 1, Int>) {
    let rows = indices.len();
    let cols = samples.first().map_or(0, Utterance::feature_len);

    let mut features = Vec::with_capacity(rows * cols);
    let mut labels = Vec::with_capacity(rows);
    for &index in indices {
        let sample = &samples[index];
        features.extend_from_slice(&sample.features);
        labels.push(i64::from(sample.label));
    }

    let features = Tensor::from_floats(TensorData::new(features, [rows, cols]), device);
    let labels = Tensor::from_ints(TensorData::new(labels, [rows]), device);
    (features, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    fn samples() -> Vec<Utterance> {
        vec![
            Utterance::new(vec![0.0, 1.0, 2.0], 0),
            Utterance::new(vec![3.0, 4.0, 5.0], 1),
            Utterance::new(vec![6.0, 7.0, 8.0], 2),
        ]
    }

    #[test]
    fn batch_shapes() {
        let device = <TestBackend as Backend>::Device::default();
        let (features, labels) = batch_tensors::<TestBackend>(&samples(), &device);

        assert_eq!(features.dims(), [3, 3]);
        assert_eq!(labels.dims(), [3]);
    }

    #[test]
    fn batch_preserves_values() {
        let device = <TestBackend as Backend>::Device::default();
        let (features, labels) = batch_tensors::<TestBackend>(&samples(), &device);

        let values = features.into_data().convert::<f32>().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let labels = labels.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn batch_at_indices_selects_and_orders() {
        let device = <TestBackend as Backend>::Device::default();
        let (features, labels) = batch_tensors_at::<TestBackend>(&samples(), &[2, 0], &device);

        assert_eq!(features.dims(), [2, 3]);
        let values = features.into_data().convert::<f32>().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![6.0, 7.0, 8.0, 0.0, 1.0, 2.0]);

        let labels = labels.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(labels, vec![2, 0]);
    }
}
