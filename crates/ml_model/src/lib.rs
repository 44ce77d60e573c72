//! ML model crate for artifact image classification.
//!
//! This crate uses the Burn deep learning framework to define the
//! classifier network, load trained checkpoints, and run inference. The
//! network is consumed as a black-box scoring function: image tensor in,
//! per-class probability vector out.

use std::path::Path;

use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig};
use burn::nn::{Dropout, DropoutConfig, Gelu, Linear, LinearConfig, PaddingConfig2d, Relu};
use burn::prelude::*;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder, RecorderError};

mod classifier;

pub use classifier::*;

/// Configuration for the artifact classifier network.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Number of output classes.
    pub num_classes: usize,
    /// Number of hidden units in the classifier head.
    pub hidden_size: usize,
    /// Dropout rate applied in the head during training.
    pub dropout: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_classes: 9,
            hidden_size: 128,
            dropout: 0.3,
        }
    }
}

/// The artifact classification network.
///
/// A compact convolutional feature stack followed by global average
/// pooling and a GELU/dropout classifier head. The head mirrors the
/// transfer-learning head the weights were trained with; dropout is only
/// active on autodiff backends, so inference is deterministic.
#[derive(Module, Debug)]
pub struct ArtifactCnn<B: Backend> {
    conv1: Conv2d<B>,
    conv2: Conv2d<B>,
    conv3: Conv2d<B>,
    pool: MaxPool2d,
    global_pool: AdaptiveAvgPool2d,
    hidden: Linear<B>,
    output: Linear<B>,
    activation: Relu,
    head_activation: Gelu,
    dropout: Dropout,
}

impl<B: Backend> ArtifactCnn<B> {
    /// Number of feature channels after the convolutional stack.
    const FEATURE_CHANNELS: usize = 64;

    /// Creates a new network with the given configuration.
    pub fn new(device: &B::Device, config: &ModelConfig) -> Self {
        let conv1 = Conv2dConfig::new([3, 16], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let conv2 = Conv2dConfig::new([16, 32], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let conv3 = Conv2dConfig::new([32, Self::FEATURE_CHANNELS], [3, 3])
            .with_padding(PaddingConfig2d::Same)
            .init(device);
        let pool = MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init();
        let global_pool = AdaptiveAvgPool2dConfig::new([1, 1]).init();
        let hidden = LinearConfig::new(Self::FEATURE_CHANNELS, config.hidden_size).init(device);
        let output = LinearConfig::new(config.hidden_size, config.num_classes).init(device);

        Self {
            conv1,
            conv2,
            conv3,
            pool,
            global_pool,
            hidden,
            output,
            activation: Relu::new(),
            head_activation: Gelu::new(),
            dropout: DropoutConfig::new(config.dropout).init(),
        }
    }

    /// Forward pass through the network.
    ///
    /// # Arguments
    ///
    /// * `input` - Tensor of shape `[batch_size, 3, height, width]`
    ///
    /// # Returns
    ///
    /// Logits of shape `[batch_size, num_classes]`.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self
            .pool
            .forward(self.activation.forward(self.conv1.forward(input)));
        let x = self
            .pool
            .forward(self.activation.forward(self.conv2.forward(x)));
        let x = self
            .pool
            .forward(self.activation.forward(self.conv3.forward(x)));
        let x = self.global_pool.forward(x);
        let x: Tensor<B, 2> = x.flatten(1, 3);
        let x = self.head_activation.forward(self.hidden.forward(x));
        let x = self.dropout.forward(x);
        self.output.forward(x)
    }
}

/// Saves the model weights to disk in named-MessagePack format.
///
/// # Errors
///
/// Returns an error if the record cannot be written.
pub fn save_checkpoint<B: Backend>(
    model: &ArtifactCnn<B>,
    path: &Path,
) -> Result<(), RecorderError> {
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    model.clone().save_file(path.to_path_buf(), &recorder)
}

/// Loads model weights from a checkpoint on disk.
///
/// The network is first constructed with `config`, then its weights are
/// replaced with the recorded ones, so the checkpoint must have been
/// produced by a network of the same architecture.
///
/// # Errors
///
/// Returns an error if the file is missing or the record does not match
/// the architecture.
pub fn load_checkpoint<B: Backend>(
    path: &Path,
    device: &B::Device,
    config: &ModelConfig,
) -> Result<ArtifactCnn<B>, RecorderError> {
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    ArtifactCnn::new(device, config).load_file(path.to_path_buf(), &recorder, device)
}
