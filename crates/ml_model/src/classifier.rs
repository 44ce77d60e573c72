//! Inference adapter around the loaded network.

use std::path::{Path, PathBuf};

use burn::prelude::*;
use burn::record::RecorderError;
use burn::tensor::activation::softmax;
use image_preprocessor::{CHANNELS, ImageTensor};
use tracing::warn;

use crate::{ArtifactCnn, ModelConfig, load_checkpoint};

/// Error type for classifier failures.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The checkpoint could not be loaded at startup.
    #[error("model weights unavailable at '{path}'")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: RecorderError,
    },

    /// The input tensor does not match the model's expected shape.
    #[error("input tensor shape {actual:?} does not match expected {expected:?}")]
    ShapeMismatch {
        expected: [usize; 3],
        actual: [usize; 3],
    },

    /// The model's output width differs from the declared class count.
    #[error("classifier outputs {actual} classes but {expected} were declared")]
    CardinalityMismatch { expected: usize, actual: usize },

    /// The forward pass produced unreadable output.
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Wraps a loaded scoring model behind a pure image -> probabilities
/// function.
///
/// The model and device are fixed at construction and never mutated, so a
/// single classifier can serve concurrent readers. For the same input
/// tensor and the same weights the output is reproducible bit for bit:
/// there are no stochastic layers active at inference time.
pub struct ArtifactClassifier<B: Backend> {
    model: ArtifactCnn<B>,
    device: B::Device,
    num_classes: usize,
    input_size: u32,
    degraded: bool,
}

impl<B: Backend> ArtifactClassifier<B> {
    /// Loads the classifier from a trained checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Unavailable`] if the checkpoint is missing
    /// or corrupt.
    pub fn load(
        path: &Path,
        num_classes: usize,
        input_size: u32,
        device: B::Device,
    ) -> Result<Self, ModelError> {
        let config = ModelConfig {
            num_classes,
            ..ModelConfig::default()
        };

        let model =
            load_checkpoint(path, &device, &config).map_err(|source| ModelError::Unavailable {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            model,
            device,
            num_classes,
            input_size,
            degraded: false,
        })
    }

    /// Creates a classifier with randomly initialized weights.
    ///
    /// Predictions from this classifier are meaningless. It exists so an
    /// operator can explicitly opt in to keeping the service up while a
    /// checkpoint is unavailable; every construction is logged loudly and
    /// the state stays observable through [`Self::is_degraded`].
    #[must_use]
    pub fn degraded(num_classes: usize, input_size: u32, device: B::Device) -> Self {
        warn!(
            num_classes,
            input_size, "running with RANDOM weights; predictions are not meaningful"
        );

        let config = ModelConfig {
            num_classes,
            ..ModelConfig::default()
        };

        Self {
            model: ArtifactCnn::new(&device, &config),
            device,
            num_classes,
            input_size,
            degraded: true,
        }
    }

    /// Returns true if this classifier runs on random weights.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Returns the number of classes the model scores.
    #[must_use]
    pub const fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Returns the square input edge the model expects, in pixels.
    #[must_use]
    pub const fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Verifies the model's output width against the class enumeration.
    ///
    /// Called once at startup so a model/label drift is caught before any
    /// request is served.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CardinalityMismatch`] on drift.
    pub fn ensure_cardinality(&self, expected: usize) -> Result<(), ModelError> {
        if self.num_classes == expected {
            Ok(())
        } else {
            Err(ModelError::CardinalityMismatch {
                expected,
                actual: self.num_classes,
            })
        }
    }

    /// Runs a forward pass and returns the per-class probability vector.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ShapeMismatch`] if the tensor was not
    /// preprocessed to the model's input size, or
    /// [`ModelError::Inference`] if the output cannot be read back.
    pub fn predict(&self, tensor: &ImageTensor) -> Result<Vec<f32>, ModelError> {
        let size = self.input_size as usize;
        let expected = [CHANNELS, size, size];
        if tensor.shape() != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                actual: tensor.shape(),
            });
        }

        let input = Tensor::<B, 1>::from_floats(tensor.data.as_slice(), &self.device)
            .reshape([1, CHANNELS, size, size]);

        let logits = self.model.forward(input);
        let probabilities = softmax(logits, 1);

        probabilities
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| ModelError::Inference(format!("{e:?}")))
    }
}
