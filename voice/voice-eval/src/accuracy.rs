//! Accuracy scoring.

use crate::error::{EvalError, Result};

/// Fraction of positions where predicted and expected labels agree.
///
/// # Example
///
/// ```
/// use voice_eval::accuracy_score;
///
/// let accuracy = accuracy_score(&[0, 1, 1, 2], &[0, 1, 2, 2]).unwrap();
/// assert!((accuracy - 0.75).abs() < 1e-6);
/// ```
///
/// # Errors
///
/// Returns an error if the slices differ in length or are empty.
#[allow(clippy::cast_precision_loss)]
pub fn accuracy_score(predicted: &[u32], expected: &[u32]) -> Result<f32> {
    if predicted.len() != expected.len() {
        return Err(EvalError::length_mismatch(predicted.len(), expected.len()));
    }
    if predicted.is_empty() {
        return Err(EvalError::EmptyInput);
    }

    let agreed = predicted
        .iter()
        .zip(expected)
        .filter(|(p, e)| p == e)
        .count();
    Ok(agreed as f32 / predicted.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_perfect() {
        let accuracy = accuracy_score(&[0, 1, 2], &[0, 1, 2]).unwrap();
        assert_eq!(accuracy, 1.0);
    }

    #[test]
    fn accuracy_none_correct() {
        let accuracy = accuracy_score(&[1, 2, 0], &[0, 1, 2]).unwrap();
        assert_eq!(accuracy, 0.0);
    }

    #[test]
    fn accuracy_partial() {
        let accuracy = accuracy_score(&[0, 0, 1, 1], &[0, 1, 1, 0]).unwrap();
        assert!((accuracy - 0.5).abs() < 1e-6);
    }

    #[test]
    fn accuracy_rejects_length_mismatch() {
        let err = accuracy_score(&[0, 1], &[0]).unwrap_err();
        assert_eq!(err, EvalError::length_mismatch(2, 1));
    }

    #[test]
    fn accuracy_rejects_empty() {
        let err = accuracy_score(&[], &[]).unwrap_err();
        assert_eq!(err, EvalError::EmptyInput);
    }
}
