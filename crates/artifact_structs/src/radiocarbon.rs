//! Radiocarbon age estimation from a measured C-14 decay percentage.
//!
//! Uses the exponential decay model `age_bp = -lambda * ln(p / 100)` where
//! `lambda` is the C-14 mean life (half-life 5730 years / ln 2). Ages are
//! expressed in years Before Present, anchored at 1950 CE per radiocarbon
//! convention.

use serde::Serialize;

/// Mean life of carbon-14 in years.
pub const MEAN_LIFE_YEARS: f64 = 8267.0;

/// The "present" of years-Before-Present, per radiocarbon convention.
pub const REFERENCE_YEAR: f64 = 1950.0;

/// A radiocarbon dating estimate.
///
/// Both fields keep full precision; use the `*_rounded` accessors for
/// display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatingEstimate {
    /// Estimated age in years Before Present.
    pub age_bp: f64,

    /// Estimated calendar year; negative values are BCE.
    pub calendar_year: f64,
}

impl DatingEstimate {
    /// Age in whole years BP, rounded to the nearest year.
    #[must_use]
    pub fn age_bp_rounded(&self) -> i64 {
        self.age_bp.round() as i64
    }

    /// Calendar year rounded to the nearest year; negative values are BCE.
    #[must_use]
    pub fn calendar_year_rounded(&self) -> i64 {
        self.calendar_year.round() as i64
    }
}

/// Error type for decay percentages outside `(0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("decay percentage must be in (0, 100], got {percentage}")]
pub struct InvalidPercentageError {
    pub percentage: f64,
}

/// Estimates the age of a sample from its remaining C-14 percentage.
///
/// A percentage of exactly 100 yields an age of exactly 0 years BP.
///
/// # Errors
///
/// Returns [`InvalidPercentageError`] for percentages that are
/// non-finite, zero or below, or above 100.
pub fn estimate_age(percentage: f64) -> Result<DatingEstimate, InvalidPercentageError> {
    if !percentage.is_finite() || percentage <= 0.0 || percentage > 100.0 {
        return Err(InvalidPercentageError { percentage });
    }

    let age_bp = -MEAN_LIFE_YEARS * (percentage / 100.0).ln();
    let calendar_year = REFERENCE_YEAR - age_bp;

    Ok(DatingEstimate {
        age_bp,
        calendar_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_percentage_is_age_zero() {
        let estimate = estimate_age(100.0).unwrap();
        assert_eq!(estimate.age_bp, 0.0);
        assert_eq!(estimate.calendar_year, REFERENCE_YEAR);
    }

    #[test]
    fn test_half_percentage_is_one_half_life() {
        let estimate = estimate_age(50.0).unwrap();
        // One half-life: 8267 * ln 2, roughly 5730 years.
        assert!((estimate.age_bp - 5730.2).abs() < 1.0, "got {}", estimate.age_bp);
        assert!((estimate.calendar_year - (REFERENCE_YEAR - estimate.age_bp)).abs() < 1e-9);
        assert_eq!(estimate.calendar_year_rounded(), 1950 - estimate.age_bp_rounded());
    }

    #[test]
    fn test_age_always_non_negative() {
        for percentage in [0.001, 1.0, 25.0, 50.0, 99.9, 100.0] {
            let estimate = estimate_age(percentage).unwrap();
            assert!(estimate.age_bp >= 0.0, "age for {percentage} was negative");
        }
    }

    #[test]
    fn test_lower_percentage_means_older() {
        let older = estimate_age(10.0).unwrap();
        let younger = estimate_age(90.0).unwrap();
        assert!(older.age_bp > younger.age_bp);
        assert!(older.calendar_year < younger.calendar_year);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(estimate_age(0.0).is_err());
        assert!(estimate_age(-5.0).is_err());
        assert!(estimate_age(100.0001).is_err());
        assert!(estimate_age(f64::NAN).is_err());
        assert!(estimate_age(f64::INFINITY).is_err());
    }

    #[test]
    fn test_rounding() {
        let estimate = estimate_age(50.0).unwrap();
        assert_eq!(estimate.age_bp_rounded(), 5730);
        assert_eq!(estimate.calendar_year_rounded(), -3780);
    }
}
