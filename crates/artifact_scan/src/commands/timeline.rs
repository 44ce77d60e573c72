//! Timeline command - shows the archaeological era reference table.

use artifact_structs::{KnowledgeBase, format_year};
use tracing::info;

/// Runs the timeline command.
pub fn run() {
    let knowledge = KnowledgeBase::builtin();

    info!("=== Archaeological Eras ===");
    for era in knowledge.eras() {
        info!(
            "{} ({} - {})",
            era.name,
            format_year(era.start_year),
            format_year(era.end_year)
        );
        info!("  {}", era.description);
        for event in &era.events {
            info!("    {}: {}", format_year(event.year), event.event);
        }
    }
}
