//! Archaeological artifact identification pipeline.
//!
//! Library surface of the CLI: the per-request analysis pipeline and its
//! structured outcome.

pub mod pipeline;

/// Backend used for inference.
///
/// The CPU ndarray backend keeps single-image forward passes bit-for-bit
/// reproducible across runs, which the pipeline's contract requires.
pub type InferenceBackend = burn::backend::NdArray;
