//! CLI command implementations.

pub mod classify;
pub mod date;
pub mod report;
pub mod sites;
pub mod timeline;

use anyhow::bail;
use artifact_structs::Coordinate;

/// Builds the optional observer coordinate from the paired CLI flags.
///
/// # Errors
///
/// Returns an error if only one of the two flags was given or the
/// coordinate is out of range.
pub fn observer_from_args(lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<Option<Coordinate>> {
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Ok(Some(Coordinate::new(latitude, longitude)?)),
        (None, None) => Ok(None),
        _ => bail!("--lat and --lon must be given together"),
    }
}
