//! Date command - standalone radiocarbon age estimation.

use anyhow::Result;
use artifact_structs::{estimate_age, format_year};
use tracing::info;

/// Runs the date command.
///
/// # Errors
///
/// Returns an error for percentages outside `(0, 100]`.
pub fn run(percentage: f64) -> Result<()> {
    let estimate = estimate_age(percentage)?;

    info!("=== Radiocarbon Dating ===");
    info!(
        "Remaining C-14: {percentage}% -> {} years BP",
        estimate.age_bp_rounded()
    );
    info!(
        "Approximate calendar year: {}",
        format_year(estimate.calendar_year_rounded() as i32)
    );

    Ok(())
}
