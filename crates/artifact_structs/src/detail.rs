//! Curated descriptive metadata attached to a predicted class.

use serde::Serialize;

/// Static knowledge record for an artifact class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDetail {
    /// What the object is.
    pub description: String,

    /// The historical period(s) it belongs to.
    pub era: String,

    /// What it is typically made of.
    pub material: String,

    /// Why the find matters archaeologically.
    pub significance: String,

    /// How it was used within its culture, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_context: Option<String>,

    /// Manufacturing traces that identify it, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technological_markers: Option<String>,
}

impl ArtifactDetail {
    /// The record returned for labels with no curated information.
    ///
    /// Report generation must never fail because metadata is missing, so
    /// unknown lookups produce this instead of an error.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            description: "No information available".to_string(),
            era: "Unknown".to_string(),
            material: "Unknown".to_string(),
            significance: "Unknown".to_string(),
            cultural_context: None,
            technological_markers: None,
        }
    }

    /// Returns true if this is the "no information" placeholder record.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self == &Self::placeholder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_stable() {
        let placeholder = ArtifactDetail::placeholder();
        assert_eq!(placeholder.description, "No information available");
        assert_eq!(placeholder.era, "Unknown");
        assert!(placeholder.cultural_context.is_none());
        assert!(placeholder.is_placeholder());
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let json = serde_json::to_string(&ArtifactDetail::placeholder()).unwrap();
        assert!(!json.contains("cultural_context"));
        assert!(!json.contains("technological_markers"));
    }
}
