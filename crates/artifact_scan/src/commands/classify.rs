//! Classify command - runs the analysis pipeline on a single image.

use std::path::Path;

use anyhow::{Context, Result};
use artifact_scan::pipeline::{AnalysisPipeline, AnalysisRequest};
use config::Config;
use tracing::info;

use super::observer_from_args;

/// Runs the classify command.
///
/// # Errors
///
/// Returns an error if the pipeline cannot start or the request fails.
pub fn run(
    config: &Config,
    image: &Path,
    top_k: Option<usize>,
    decay_percent: Option<f64>,
    lat: Option<f64>,
    lon: Option<f64>,
    json: bool,
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

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    info!("=== Classification Result ===");
    info!(
        "{} ({:.2}% confidence)",
        outcome.top1.class,
        outcome.top1.probability * 100.0
    );

    info!("Ranked predictions:");
    for (rank, prediction) in outcome.top_k.iter().enumerate() {
        info!(
            "  {}. {:<16} {:.2}%",
            rank + 1,
            prediction.class.to_string(),
            prediction.probability * 100.0
        );
    }

    if let Some(path) = &outcome.chart_path {
        info!(chart = %path.display(), "confidence chart written");
    }

    if let Some(dating) = outcome.dating {
        info!(
            "Radiocarbon estimate: {} years BP (~{})",
            dating.age_bp_rounded(),
            artifact_structs::format_year(dating.calendar_year_rounded() as i32)
        );
    }

    if outcome.degraded_model {
        info!("NOTE: classifier ran on untrained weights; do not trust these results");
    }

    Ok(())
}
