//! The single-request inference-and-synthesis pipeline.
//!
//! One [`AnalysisPipeline`] is constructed at startup and holds the only
//! shared state: the loaded classifier and the knowledge tables, both
//! read-only. Each request runs the stages strictly in order: decode ->
//! classify -> rank -> enrich (+ optional radiocarbon and site ranking)
//! -> chart -> assemble. A failed stage aborts only its own request.

use std::path::PathBuf;

use anyhow::Context;
use artifact_structs::{
    ArtifactClass, ArtifactDetail, Classification, ClassificationError, Coordinate,
    DatingEstimate, InvalidKError, InvalidPercentageError, KnowledgeBase, Prediction, RankedSite,
    estimate_age, rank_sites,
};
use config::Config;
use image_preprocessor::{PreprocessConfig, PreprocessError, decode_and_normalize};
use ml_model::{ArtifactClassifier, ModelError};
use report_gen::{DocumentError, ReportInput, render_probability_chart, render_report};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::InferenceBackend;

/// Inputs for one analysis request.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    /// Raw uploaded image bytes, format undetermined.
    pub image_bytes: &'a [u8],

    /// How many ranked predictions to keep.
    pub top_k: usize,

    /// Measured C-14 decay percentage, if a sample was taken.
    pub decay_percentage: Option<f64>,

    /// The requester's location, if shared.
    pub observer: Option<Coordinate>,
}

/// Structured result of one analysis request.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    /// Best prediction.
    pub top1: Prediction,

    /// The K best predictions, descending.
    pub top_k: Vec<Prediction>,

    /// Full per-class probabilities in classifier output order.
    pub probabilities: Vec<Prediction>,

    /// Enrichment record for the best prediction.
    pub details: ArtifactDetail,

    /// Where the probability chart was written, when rendering succeeded.
    pub chart_path: Option<PathBuf>,

    /// Radiocarbon estimate, when a decay percentage was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dating: Option<DatingEstimate>,

    /// Reference sites, ranked by distance when a location was supplied.
    pub sites: Vec<RankedSite>,

    /// True when the classifier ran on random weights.
    pub degraded_model: bool,
}

/// Error type for per-request pipeline failures.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    InvalidK(#[from] InvalidKError),

    #[error(transparent)]
    InvalidPercentage(#[from] InvalidPercentageError),
}

/// The assembled pipeline: classifier, preprocessing parameters, and
/// knowledge tables, all immutable after construction.
pub struct AnalysisPipeline {
    classifier: ArtifactClassifier<InferenceBackend>,
    preprocess: PreprocessConfig,
    knowledge: KnowledgeBase,
    output_dir: PathBuf,
}

impl AnalysisPipeline {
    /// Builds the pipeline from configuration, loading model weights.
    ///
    /// By default a missing or corrupt checkpoint is fatal. When
    /// `allow_degraded_model` is set the pipeline instead starts on
    /// random weights; the state is logged and carried into every
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkpoint cannot be loaded in strict
    /// mode, or if the model's output width does not match the class
    /// enumeration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let device = Default::default();

        let classifier = match ArtifactClassifier::load(
            &config.model_path,
            ArtifactClass::COUNT,
            config.image_size,
            device,
        ) {
            Ok(classifier) => {
                info!(path = %config.model_path.display(), "model weights loaded");
                classifier
            }
            Err(error) if config.allow_degraded_model => {
                warn!(
                    path = %config.model_path.display(),
                    %error,
                    "checkpoint unavailable; degraded mode was explicitly enabled"
                );
                ArtifactClassifier::degraded(
                    ArtifactClass::COUNT,
                    config.image_size,
                    Default::default(),
                )
            }
            Err(error) => {
                return Err(error).context(
                    "failed to load model weights (set ALLOW_DEGRADED_MODEL=1 to run anyway)",
                );
            }
        };

        classifier.ensure_cardinality(ArtifactClass::COUNT)?;

        Ok(Self {
            classifier,
            preprocess: PreprocessConfig {
                target_size: config.image_size,
            },
            knowledge: KnowledgeBase::builtin(),
            output_dir: config.output_dir.clone(),
        })
    }

    /// Returns the shared knowledge tables.
    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Returns true when the classifier runs on random weights.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.classifier.is_degraded()
    }

    /// Runs the full analysis for one request.
    ///
    /// Chart rendering is the only non-fatal stage: on failure the
    /// outcome simply carries no chart path.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] naming the failed stage; the pipeline
    /// itself stays usable for subsequent requests.
    pub fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisOutcome, PipelineError> {
        let tensor = decode_and_normalize(request.image_bytes, &self.preprocess)?;
        let scores = self.classifier.predict(&tensor)?;
        let classification = Classification::new(scores)?;

        let top_k = classification.top_k(request.top_k)?;
        let top1 = top_k[0];
        info!(class = %top1.class, probability = top1.probability, "classified image");

        let details = self.knowledge.detail(top1.class).clone();

        let dating = request.decay_percentage.map(estimate_age).transpose()?;
        let sites = rank_sites(self.knowledge.sites(), request.observer);

        let chart_path = match render_probability_chart(&classification) {
            Ok(png) => match self.store_artifact("chart", "png", &png) {
                Ok(path) => Some(path),
                Err(error) => {
                    warn!(%error, "failed to store chart; continuing without it");
                    None
                }
            },
            Err(error) => {
                warn!(%error, "chart rendering failed; continuing without it");
                None
            }
        };

        let probabilities = classification
            .probabilities()
            .iter()
            .enumerate()
            .map(|(index, &probability)| Prediction {
                class: ArtifactClass::from_index(index)
                    .expect("classification length matches the class count"),
                probability,
            })
            .collect();

        Ok(AnalysisOutcome {
            top1,
            top_k,
            probabilities,
            details,
            chart_path,
            dating,
            sites,
            degraded_model: self.classifier.is_degraded(),
        })
    }

    /// Synthesizes the PDF report for a finished analysis.
    ///
    /// An unreadable chart file degrades to a report without the chart
    /// section.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] if the document itself cannot be
    /// built.
    pub fn synthesize_report(&self, outcome: &AnalysisOutcome) -> Result<Vec<u8>, DocumentError> {
        let chart_png = outcome.chart_path.as_ref().and_then(|path| {
            match std::fs::read(path) {
                Ok(bytes) => Some(bytes),
                Err(error) => {
                    warn!(path = %path.display(), %error, "chart file unreadable; omitting chart section");
                    None
                }
            }
        });

        let input = ReportInput {
            top_k: &outcome.top_k,
            detail: &outcome.details,
            chart_png: chart_png.as_deref(),
            dating: outcome.dating,
            sites: &outcome.sites,
            degraded_model: outcome.degraded_model,
        };

        render_report(&input)
    }

    /// Writes a generated artifact under the output directory with a
    /// collision-free name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn store_artifact(&self, stem: &str, extension: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(format!("{stem}-{}.{extension}", Uuid::new_v4()));
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn test_config(dir: &std::path::Path, allow_degraded: bool) -> Config {
        Config {
            model_path: dir.join("missing-model.mpk"),
            allow_degraded_model: allow_degraded,
            image_size: 64,
            output_dir: dir.join("generated"),
            top_k: 5,
        }
    }

    fn sample_image() -> Vec<u8> {
        let img = RgbImage::from_fn(96, 96, |x, y| Rgb([(x * 2) as u8, (y * 2) as u8, 80]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[test]
    fn test_strict_mode_fails_without_weights() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), false);
        assert!(AnalysisPipeline::from_config(&config).is_err());
    }

    #[test]
    fn test_degraded_mode_is_observable() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let pipeline = AnalysisPipeline::from_config(&config).unwrap();
        assert!(pipeline.is_degraded());
    }

    #[test]
    fn test_analyze_produces_complete_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let pipeline = AnalysisPipeline::from_config(&config).unwrap();

        let bytes = sample_image();
        let request = AnalysisRequest {
            image_bytes: &bytes,
            top_k: 3,
            decay_percentage: Some(50.0),
            observer: Some(Coordinate::new(9.9252, 78.1198).unwrap()),
        };

        let outcome = pipeline.analyze(&request).unwrap();

        assert_eq!(outcome.top_k.len(), 3);
        assert_eq!(outcome.top1, outcome.top_k[0]);
        assert_eq!(outcome.probabilities.len(), ArtifactClass::COUNT);
        assert!(outcome.degraded_model);
        assert!(outcome.dating.is_some());
        assert_eq!(outcome.sites.len(), pipeline.knowledge().sites().len());

        let chart_path = outcome.chart_path.as_ref().expect("chart should render");
        let chart_bytes = std::fs::read(chart_path).unwrap();
        assert!(!chart_bytes.is_empty());
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let pipeline = AnalysisPipeline::from_config(&config).unwrap();

        let bytes = sample_image();
        let request = AnalysisRequest {
            image_bytes: &bytes,
            top_k: 5,
            decay_percentage: None,
            observer: None,
        };

        let first = pipeline.analyze(&request).unwrap();
        let second = pipeline.analyze(&request).unwrap();
        assert_eq!(first.top_k, second.top_k);
        assert_eq!(first.probabilities, second.probabilities);
    }

    #[test]
    fn test_analyze_rejects_garbage_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let pipeline = AnalysisPipeline::from_config(&config).unwrap();

        let request = AnalysisRequest {
            image_bytes: b"not an image at all",
            top_k: 5,
            decay_percentage: None,
            observer: None,
        };

        let err = pipeline.analyze(&request).unwrap_err();
        assert!(matches!(err, PipelineError::Preprocess(_)));
    }

    #[test]
    fn test_analyze_rejects_bad_percentage() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let pipeline = AnalysisPipeline::from_config(&config).unwrap();

        let bytes = sample_image();
        let request = AnalysisRequest {
            image_bytes: &bytes,
            top_k: 5,
            decay_percentage: Some(150.0),
            observer: None,
        };

        let err = pipeline.analyze(&request).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPercentage(_)));
    }

    #[test]
    fn test_report_synthesis_from_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let pipeline = AnalysisPipeline::from_config(&config).unwrap();

        let bytes = sample_image();
        let request = AnalysisRequest {
            image_bytes: &bytes,
            top_k: 5,
            decay_percentage: Some(61.0),
            observer: None,
        };

        let outcome = pipeline.analyze(&request).unwrap();
        let pdf = pipeline.synthesize_report(&outcome).unwrap();
        assert_eq!(&pdf[..4], b"%PDF");
    }

    #[test]
    fn test_concurrent_artifacts_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let pipeline = AnalysisPipeline::from_config(&config).unwrap();

        let a = pipeline.store_artifact("chart", "png", b"a").unwrap();
        let b = pipeline.store_artifact("chart", "png", b"b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_outcome_serializes_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), true);
        let pipeline = AnalysisPipeline::from_config(&config).unwrap();

        let bytes = sample_image();
        let request = AnalysisRequest {
            image_bytes: &bytes,
            top_k: 2,
            decay_percentage: None,
            observer: None,
        };

        let outcome = pipeline.analyze(&request).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("top1").is_some());
        assert!(json.get("degraded_model").is_some());
        assert!(json.get("dating").is_none());
    }
}
