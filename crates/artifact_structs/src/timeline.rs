//! Archaeological era timeline reference data.

use serde::Serialize;

/// A dated milestone within an era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EraEvent {
    /// Year of the event; negative values are BCE.
    pub year: i32,

    /// Short description of the event.
    pub event: String,
}

/// A named span of the archaeological timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEra {
    pub name: String,

    /// First year of the era; negative values are BCE.
    pub start_year: i32,

    /// Last year of the era; negative values are BCE.
    pub end_year: i32,

    /// Hex color used when the era is rendered.
    pub color: String,

    pub description: String,

    /// Milestones within the era, ordered by year.
    pub events: Vec<EraEvent>,
}

/// Formats a signed year for display, e.g. `-3000` -> `3000 BCE`.
#[must_use]
pub fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BCE", -year)
    } else {
        format!("{year} CE")
    }
}

fn era(
    name: &str,
    start_year: i32,
    end_year: i32,
    color: &str,
    description: &str,
    events: Vec<(i32, &str)>,
) -> TimelineEra {
    TimelineEra {
        name: name.to_string(),
        start_year,
        end_year,
        color: color.to_string(),
        description: description.to_string(),
        events: events
            .into_iter()
            .map(|(year, event)| EraEvent {
                year,
                event: event.to_string(),
            })
            .collect(),
    }
}

/// Builds the builtin era table, sorted ascending by start year.
#[must_use]
pub(crate) fn builtin_eras() -> Vec<TimelineEra> {
    let mut eras = vec![
        era(
            "Paleolithic",
            -2_500_000,
            -10_000,
            "#8B4513",
            "The Old Stone Age, characterized by the development of the first stone tools by early humans.",
            vec![
                (-1_760_000, "Acheulean hand-axe industries spread"),
                (-40_000, "Earliest known cave paintings"),
            ],
        ),
        era(
            "Neolithic",
            -10_000,
            -3_000,
            "#CD853F",
            "The New Stone Age, marked by the development of agriculture, pottery, and permanent settlements.",
            vec![
                (-9_000, "First farming villages appear"),
                (-7_000, "Pottery in widespread domestic use"),
            ],
        ),
        era(
            "Bronze Age",
            -3_000,
            -1_200,
            "#B8860B",
            "Characterized by the use of bronze tools and weapons, and the development of early writing systems.",
            vec![
                (-2_600, "Mature Harappan cities flourish"),
                (-1_500, "Bronze casting spreads through peninsular India"),
            ],
        ),
        era(
            "Iron Age",
            -1_200,
            -500,
            "#D2691E",
            "Marked by the widespread use of iron for tools and weapons, and the development of complex societies.",
            vec![
                (-1_000, "Iron smelting established in South India"),
                (-600, "Megalithic burial traditions peak"),
            ],
        ),
        era(
            "Classical Antiquity",
            -500,
            500,
            "#A0522D",
            "The period of cultural history between the 8th century BC and the 6th century AD centered on the Mediterranean Sea.",
            vec![
                (-300, "Early Tamil urban centres of the Sangam age"),
                (100, "Indo-Roman maritime trade peaks"),
            ],
        ),
        era(
            "Medieval Period",
            500,
            1_500,
            "#D2B48C",
            "The Middle Ages, spanning from the fall of the Western Roman Empire to the Renaissance.",
            vec![
                (850, "Pala and Sena stone-carving workshops active"),
                (1_250, "Regional temple economies expand"),
            ],
        ),
    ];

    eras.sort_by_key(|e| e.start_year);
    eras
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eras_sorted_ascending() {
        let eras = builtin_eras();
        assert!(!eras.is_empty());
        for pair in eras.windows(2) {
            assert!(pair[0].start_year <= pair[1].start_year);
        }
    }

    #[test]
    fn test_eras_span_is_positive() {
        for era in builtin_eras() {
            assert!(era.end_year > era.start_year, "{} is inverted", era.name);
        }
    }

    #[test]
    fn test_events_within_era_bounds() {
        for era in builtin_eras() {
            for event in &era.events {
                assert!(
                    event.year >= era.start_year && event.year <= era.end_year,
                    "event '{}' falls outside {}",
                    event.event,
                    era.name
                );
            }
        }
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year(-3000), "3000 BCE");
        assert_eq!(format_year(1250), "1250 CE");
        assert_eq!(format_year(0), "0 CE");
    }
}
