//! Classification results and top-K ranking.

use serde::Serialize;

use crate::ArtifactClass;

/// Default number of predictions returned by the top-K view.
pub const DEFAULT_TOP_K: usize = 5;

/// Maximum allowed deviation of a probability vector's sum from 1.0.
const SUM_TOLERANCE: f32 = 1e-3;

/// A single class prediction with its probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted artifact class.
    pub class: ArtifactClass,

    /// Probability assigned by the classifier, in `[0, 1]`.
    pub probability: f32,
}

/// A full classification result: one probability per known class, in
/// classifier output order.
///
/// The vector is validated at construction so downstream consumers can
/// rely on it being non-negative and summing to 1 within floating-point
/// tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    probabilities: Vec<f32>,
}

/// Error type for malformed probability vectors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassificationError {
    #[error("probability vector has length {actual}, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("probability at index {index} is invalid: {value}")]
    InvalidProbability { index: usize, value: f32 },

    #[error("probability vector sums to {sum}, expected 1.0")]
    BadSum { sum: f32 },
}

/// Error type for out-of-range top-K requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("k must be in [1, {max}], got {k}")]
pub struct InvalidKError {
    /// The rejected K.
    pub k: usize,
    /// The number of known classes.
    pub max: usize,
}

impl Classification {
    /// Creates a classification from a raw probability vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector length does not match the class
    /// count, any entry is negative or non-finite, or the entries do not
    /// sum to 1 within tolerance.
    pub fn new(probabilities: Vec<f32>) -> Result<Self, ClassificationError> {
        if probabilities.len() != ArtifactClass::COUNT {
            return Err(ClassificationError::LengthMismatch {
                expected: ArtifactClass::COUNT,
                actual: probabilities.len(),
            });
        }

        for (index, &value) in probabilities.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(ClassificationError::InvalidProbability { index, value });
            }
        }

        let sum: f32 = probabilities.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(ClassificationError::BadSum { sum });
        }

        Ok(Self { probabilities })
    }

    /// Returns the full per-class probability vector in classifier output
    /// order, unsorted.
    #[must_use]
    pub fn probabilities(&self) -> &[f32] {
        &self.probabilities
    }

    /// Returns the probability assigned to a specific class.
    #[must_use]
    pub fn probability_of(&self, class: ArtifactClass) -> f32 {
        self.probabilities[class.index()]
    }

    /// Returns the highest-probability prediction.
    ///
    /// Ties are broken by ascending class index, matching [`Self::top_k`].
    #[must_use]
    pub fn top1(&self) -> Prediction {
        self.ranked()[0]
    }

    /// Returns the K highest-probability predictions, sorted descending.
    ///
    /// Equal probabilities are ordered by ascending class index so the
    /// result is deterministic for any input.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKError`] if `k` is 0 or exceeds the class count.
    pub fn top_k(&self, k: usize) -> Result<Vec<Prediction>, InvalidKError> {
        if k == 0 || k > ArtifactClass::COUNT {
            return Err(InvalidKError {
                k,
                max: ArtifactClass::COUNT,
            });
        }

        let mut ranked = self.ranked();
        ranked.truncate(k);
        Ok(ranked)
    }

    fn ranked(&self) -> Vec<Prediction> {
        let mut predictions: Vec<Prediction> = self
            .probabilities
            .iter()
            .enumerate()
            .map(|(index, &probability)| Prediction {
                class: ArtifactClass::from_index(index)
                    .expect("probability vector length is validated against the class count"),
                probability,
            })
            .collect();

        predictions.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then(a.class.index().cmp(&b.class.index()))
        });

        predictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(front: &[f32]) -> Vec<f32> {
        let mut probs = vec![0.0; ArtifactClass::COUNT];
        let mut assigned = 0.0;
        for (i, &p) in front.iter().enumerate() {
            probs[i] = p;
            assigned += p;
        }
        // Spread the remainder over the last entry to keep the sum at 1.
        probs[ArtifactClass::COUNT - 1] += 1.0 - assigned;
        probs
    }

    #[test]
    fn test_top_k_sorted_descending() {
        let classification =
            Classification::new(vector(&[0.05, 0.3, 0.1, 0.2, 0.15, 0.1, 0.05, 0.05])).unwrap();

        let top = classification.top_k(ArtifactClass::COUNT).unwrap();
        for pair in top.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
    }

    #[test]
    fn test_top_k_prefix_consistent() {
        let classification =
            Classification::new(vector(&[0.05, 0.3, 0.1, 0.2, 0.15, 0.1, 0.05, 0.05])).unwrap();

        let top3 = classification.top_k(3).unwrap();
        let top5 = classification.top_k(5).unwrap();
        assert_eq!(top3[..], top5[..3]);
    }

    #[test]
    fn test_top_k_known_order() {
        let classification = Classification::new(vector(&[0.7, 0.2, 0.1])).unwrap();

        let top = classification.top_k(2).unwrap();
        assert_eq!(top[0].class, ArtifactClass::HuntingTool);
        assert!((top[0].probability - 0.7).abs() < 1e-6);
        assert_eq!(top[1].class, ArtifactClass::Kendi);
        assert!((top[1].probability - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_ties_broken_by_class_index() {
        // Uniform distribution: every probability equal.
        let uniform = 1.0 / ArtifactClass::COUNT as f32;
        let classification = Classification::new(vec![uniform; ArtifactClass::COUNT]).unwrap();

        let top = classification.top_k(ArtifactClass::COUNT).unwrap();
        for (i, prediction) in top.iter().enumerate() {
            assert_eq!(prediction.class.index(), i);
        }
    }

    #[test]
    fn test_top1_matches_top_k() {
        let classification = Classification::new(vector(&[0.1, 0.6])).unwrap();
        assert_eq!(classification.top1(), classification.top_k(1).unwrap()[0]);
        assert_eq!(classification.top1().class, ArtifactClass::Kendi);
    }

    #[test]
    fn test_invalid_k() {
        let classification = Classification::new(vector(&[1.0])).unwrap();
        assert!(classification.top_k(0).is_err());
        assert!(classification.top_k(ArtifactClass::COUNT + 1).is_err());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = Classification::new(vec![1.0]).unwrap_err();
        assert!(matches!(err, ClassificationError::LengthMismatch { .. }));
    }

    #[test]
    fn test_rejects_negative_probability() {
        let mut probs = vec![0.0; ArtifactClass::COUNT];
        probs[0] = 1.2;
        probs[1] = -0.2;
        let err = Classification::new(probs).unwrap_err();
        assert!(matches!(
            err,
            ClassificationError::InvalidProbability { index: 1, .. }
        ));
    }

    #[test]
    fn test_rejects_bad_sum() {
        let err = Classification::new(vec![0.5; ArtifactClass::COUNT]).unwrap_err();
        assert!(matches!(err, ClassificationError::BadSum { .. }));
    }

    #[test]
    fn test_full_vector_unsorted() {
        let probs = vector(&[0.05, 0.3, 0.1, 0.2]);
        let classification = Classification::new(probs.clone()).unwrap();
        assert_eq!(classification.probabilities(), probs.as_slice());
        assert!((classification.probability_of(ArtifactClass::Kendi) - 0.3).abs() < 1e-6);
    }
}
