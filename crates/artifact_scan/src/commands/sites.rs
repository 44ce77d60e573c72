//! Sites command - lists reference excavation sites.

use anyhow::Result;
use artifact_structs::{KnowledgeBase, rank_sites};
use tracing::info;

use super::observer_from_args;

/// Runs the sites command.
///
/// # Errors
///
/// Returns an error for invalid coordinates.
pub fn run(lat: Option<f64>, lon: Option<f64>) -> Result<()> {
    let observer = observer_from_args(lat, lon)?;
    let knowledge = KnowledgeBase::builtin();
    let ranked = rank_sites(knowledge.sites(), observer);

    info!("=== Reference Excavation Sites ===");
    for site in &ranked {
        info!("{} ({})", site.site.name, site.distance_km);
        info!("  {}", site.site.significance);
        info!("  Key artifacts: {}", site.site.key_artifacts);
    }

    Ok(())
}
