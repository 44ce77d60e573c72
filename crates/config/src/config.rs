use std::path::PathBuf;

use anyhow::Context;

/// Default square input edge the classifier was trained with.
const DEFAULT_IMAGE_SIZE: u32 = 224;

/// Default number of predictions shown in ranked output.
const DEFAULT_TOP_K: usize = 5;

/// Application configuration loaded from environment variables.
///
/// Constructed once at startup and passed by reference; no part of the
/// pipeline reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the trained classifier checkpoint.
    pub model_path: PathBuf,

    /// Whether the process may run on randomly initialized weights when
    /// the checkpoint cannot be loaded. Off by default: a missing model
    /// is a startup failure unless explicitly overridden.
    pub allow_degraded_model: bool,

    /// Square edge in pixels that uploaded images are resized to.
    pub image_size: u32,

    /// Directory for generated charts and reports.
    pub output_dir: PathBuf,

    /// Default ranking depth for top-K views.
    pub top_k: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `MODEL_PATH`: checkpoint path (default: `models/artifact_classifier.mpk`)
    /// - `ALLOW_DEGRADED_MODEL`: `1`/`true` to permit running on random
    ///   weights when the checkpoint is missing (default: off)
    /// - `MODEL_IMAGE_SIZE`: square input edge in pixels (default: 224)
    /// - `OUTPUT_DIR`: directory for generated artifacts (default: `generated`)
    /// - `TOP_K`: default ranking depth (default: 5)
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but unparsable.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file, if any
        dotenvy::dotenv().ok();

        let model_path = std::env::var("MODEL_PATH").map_or_else(
            |_| PathBuf::from("models/artifact_classifier.mpk"),
            PathBuf::from,
        );

        let allow_degraded_model = std::env::var("ALLOW_DEGRADED_MODEL")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);

        let image_size = match std::env::var("MODEL_IMAGE_SIZE") {
            Ok(value) => value
                .trim()
                .parse::<u32>()
                .context("MODEL_IMAGE_SIZE must be a positive integer")?,
            Err(_) => DEFAULT_IMAGE_SIZE,
        };

        let output_dir =
            std::env::var("OUTPUT_DIR").map_or_else(|_| PathBuf::from("generated"), PathBuf::from);

        let top_k = match std::env::var("TOP_K") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .context("TOP_K must be a positive integer")?,
            Err(_) => DEFAULT_TOP_K,
        };

        Ok(Self {
            model_path,
            allow_degraded_model,
            image_size,
            output_dir,
            top_k,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/artifact_classifier.mpk"),
            allow_degraded_model: false,
            image_size: DEFAULT_IMAGE_SIZE,
            output_dir: PathBuf::from("generated"),
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.image_size, 224);
        assert_eq!(config.top_k, 5);
        assert!(!config.allow_degraded_model);
        assert_eq!(
            config.model_path,
            PathBuf::from("models/artifact_classifier.mpk")
        );
    }
}
