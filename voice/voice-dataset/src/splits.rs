//! Deterministic train/validation/test splitting.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::FeatureCorpus;
use crate::error::{DatasetError, Result};
use crate::utterance::Utterance;

/// Hold-out fractions for the two-stage corpus split.
///
/// Both fractions are proportions of the *original* corpus size: the test
/// split is carved off first, then the validation split is carved out of
/// the remainder. Whatever is left becomes training data.
///
/// # Example
///
/// ```
/// use voice_dataset::SplitRatios;
///
/// let ratios = SplitRatios::TRAIN60_VAL20_TEST20;
/// assert!((ratios.train_fraction() - 0.6).abs() < 1e-6);
/// assert_eq!(ratios.test_count(100), 20);
/// assert_eq!(ratios.val_count(100), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    test: f32,
    val: f32,
}

impl SplitRatios {
    /// The standard 60/20/20 recipe split.
    pub const TRAIN60_VAL20_TEST20: Self = Self {
        test: 0.2,
        val: 0.2,
    };

    /// Creates new split ratios.
    ///
    /// # Arguments
    ///
    /// - `test`: Test hold-out fraction (must be in `(0, 1)`)
    /// - `val`: Validation hold-out fraction (must be in `(0, 1)`)
    ///
    /// # Panics
    ///
    /// Panics if either fraction is outside `(0, 1)` or their sum is not
    /// below 1.
    #[must_use]
    pub fn new(test: f32, val: f32) -> Self {
        assert!(
            Self { test, val }.is_valid(),
            "Split fractions must each be in (0, 1) and sum below 1, got test={test}, val={val}"
        );
        Self { test, val }
    }

    /// Creates split ratios, returning `None` if invalid.
    #[must_use]
    pub fn try_new(test: f32, val: f32) -> Option<Self> {
        let ratios = Self { test, val };
        ratios.is_valid().then_some(ratios)
    }

    /// Returns `true` if both fractions are in `(0, 1)` and sum below 1.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.test > 0.0 && self.test < 1.0 && self.val > 0.0 && self.val < 1.0
            && self.test + self.val < 1.0
    }

    /// Returns the test hold-out fraction.
    #[must_use]
    pub const fn test_fraction(&self) -> f32 {
        self.test
    }

    /// Returns the validation hold-out fraction.
    #[must_use]
    pub const fn val_fraction(&self) -> f32 {
        self.val
    }

    /// Returns the fraction left for training.
    #[must_use]
    pub fn train_fraction(&self) -> f32 {
        1.0 - self.test - self.val
    }

    /// Number of test samples for a given corpus size.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn test_count(&self, total: usize) -> usize {
        (total as f32 * self.test).round() as usize
    }

    /// Number of validation samples for a given corpus size.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn val_count(&self, total: usize) -> usize {
        (total as f32 * self.val).round() as usize
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self::TRAIN60_VAL20_TEST20
    }
}

/// The three aligned partitions of a corpus.
///
/// Each utterance of the source corpus lands in exactly one partition.
#[derive(Debug, Clone)]
pub struct CorpusSplits {
    /// Training samples.
    pub train: Vec<Utterance>,
    /// Validation samples.
    pub val: Vec<Utterance>,
    /// Held-out test samples.
    pub test: Vec<Utterance>,
    /// Seed the split was drawn with.
    pub seed: u64,
}

impl CorpusSplits {
    /// Total number of samples across all three partitions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }
}

/// Splits a corpus into train/validation/test partitions.
///
/// The split is a deterministic two-stage hold-out: the first stage
/// shuffles all indices with a `ChaCha8` generator seeded from `seed` and
/// carves off the test partition; the second stage reshuffles the
/// remainder with `seed + 1` and carves off the validation partition.
/// Hold-out counts are rounded from the fractions and clamped so no
/// partition ends up empty.
///
/// Same corpus, ratios and seed produce byte-identical partitions on
/// every run and platform.
///
/// # Arguments
///
/// - `corpus`: The corpus to split
/// - `ratios`: Test/validation hold-out fractions
/// - `seed`: Random seed for reproducibility
///
/// # Errors
///
/// Returns an error if the corpus has fewer than 3 utterances or the
/// ratios are invalid.
///
/// # Example
///
/// ```
/// use voice_dataset::{FeatureCorpus, SplitRatios, Utterance, split_corpus};
///
/// let utterances: Vec<Utterance> = (0..10u32)
///     .map(|i| Utterance::new(vec![i as f32], i % 2))
///     .collect();
/// let corpus = FeatureCorpus::from_parts(1, vec!["a".into(), "b".into()], utterances);
///
/// let splits = split_corpus(&corpus, SplitRatios::TRAIN60_VAL20_TEST20, 42).unwrap();
/// assert_eq!(splits.train.len(), 6);
/// assert_eq!(splits.val.len(), 2);
/// assert_eq!(splits.test.len(), 2);
/// ```
pub fn split_corpus(
    corpus: &FeatureCorpus,
    ratios: SplitRatios,
    seed: u64,
) -> Result<CorpusSplits> {
    let total = corpus.len();
    if total < 3 {
        return Err(DatasetError::corpus_too_small(total));
    }
    if !ratios.is_valid() {
        return Err(DatasetError::invalid_split_fractions(
            ratios.test_fraction(),
            ratios.val_fraction(),
        ));
    }

    // Stage 1: shuffle everything, carve off the test partition.
    let mut indices: Vec<usize> = (0..total).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_count = ratios.test_count(total).max(1).min(total - 2);
    let (test_indices, rest) = indices.split_at(test_count);

    // Stage 2: reshuffle the remainder, carve off the validation partition.
    let mut rest: Vec<usize> = rest.to_vec();
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    rest.shuffle(&mut rng);

    let val_count = ratios.val_count(total).max(1).min(rest.len() - 1);
    let (val_indices, train_indices) = rest.split_at(val_count);

    let train: Vec<Utterance> = train_indices
        .iter()
        .map(|&i| corpus.utterances[i].clone())
        .collect();
    let val: Vec<Utterance> = val_indices
        .iter()
        .map(|&i| corpus.utterances[i].clone())
        .collect();
    let test: Vec<Utterance> = test_indices
        .iter()
        .map(|&i| corpus.utterances[i].clone())
        .collect();

    debug!(
        train = train.len(),
        val = val.len(),
        test = test.len(),
        seed,
        "Split corpus"
    );

    Ok(CorpusSplits {
        train,
        val,
        test,
        seed,
    })
}
