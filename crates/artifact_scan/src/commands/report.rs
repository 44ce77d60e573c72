//! Report command - runs the pipeline and writes the PDF report.

use std::path::Path;

use anyhow::{Context, Result};
use artifact_scan::pipeline::{AnalysisPipeline, AnalysisRequest};
use config::Config;
use tracing::info;

use super::observer_from_args;

/// Runs the report command.
///
/// # Errors
///
/// Returns an error if the pipeline cannot start, the analysis fails, or
/// the document cannot be written.
pub fn run(
    config: &Config,
    image: &Path,
    top_k: Option<usize>,
    decay_percent: Option<f64>,
    lat: Option<f64>,
    lon: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    let observer = observer_from_args(lat, lon)?;
    let pipeline = AnalysisPipeline::from_config(config)?;

    let bytes = std::fs::read(image)
        .with_context(|| format!("failed to read image '{}'", image.display()))?;

    let request = AnalysisRequest {
        image_bytes: &bytes,
        top_k: top_k.unwrap_or(config.top_k),
        decay_percentage: decay_percent,
        observer,
    };

    let outcome = pipeline.analyze(&request)?;
    let pdf = pipeline.synthesize_report(&outcome)?;

    let path = match output {
        Some(path) => {
            std::fs::write(path, &pdf)
                .with_context(|| format!("failed to write report to '{}'", path.display()))?;
            path.to_path_buf()
        }
        None => pipeline
            .store_artifact("report", "pdf", &pdf)
            .context("failed to store report")?,
    };

    info!(
        class = %outcome.top1.class,
        report = %path.display(),
        "report written"
    );

    Ok(())
}
