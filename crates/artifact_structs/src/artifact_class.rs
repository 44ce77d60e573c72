//! Artifact class definitions and label mappings.
//!
//! The variant order is significant: it mirrors the class order the
//! classifier was trained with, so variant index N corresponds to entry N
//! of the model's output vector.

use core::fmt;
use core::str::FromStr;

use serde::{Serialize, Serializer};

/// Represents one of the known artifact categories.
///
/// Dataset labels (the strings the training folders were named with) are
/// preserved verbatim via [`ArtifactClass::label`]; a cleaned-up display
/// name is available through `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactClass {
    HuntingTool,
    Kendi,
    Thakli,
    ShellBangle,
    PearlJewellery,
    Alloy,
    Blackstone,
    VattaSillu,
    Pottery,
}

impl ArtifactClass {
    /// Number of known classes. Must match the classifier's output width.
    pub const COUNT: usize = 9;

    /// Returns the position of this class in the classifier's output vector.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::HuntingTool => 0,
            Self::Kendi => 1,
            Self::Thakli => 2,
            Self::ShellBangle => 3,
            Self::PearlJewellery => 4,
            Self::Alloy => 5,
            Self::Blackstone => 6,
            Self::VattaSillu => 7,
            Self::Pottery => 8,
        }
    }

    /// Returns the class at the given classifier output index, if any.
    ///
    /// This is the only index-to-class mapping in the system; keeping it in
    /// one place prevents the enumeration and the model output from
    /// silently drifting apart.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::HuntingTool),
            1 => Some(Self::Kendi),
            2 => Some(Self::Thakli),
            3 => Some(Self::ShellBangle),
            4 => Some(Self::PearlJewellery),
            5 => Some(Self::Alloy),
            6 => Some(Self::Blackstone),
            7 => Some(Self::VattaSillu),
            8 => Some(Self::Pottery),
            _ => None,
        }
    }

    /// Returns the dataset label for this class, exactly as the training
    /// data spelled it.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HuntingTool => "huntingtool",
            Self::Kendi => "Kendi",
            Self::Thakli => "Thakli",
            Self::ShellBangle => "shell bangle",
            Self::PearlJewellery => "pearl jewellery",
            Self::Alloy => "alloy",
            Self::Blackstone => "Blackstone",
            Self::VattaSillu => "vatta_sillu",
            Self::Pottery => "pottery",
        }
    }

    /// Returns an iterator over all classes in classifier output order.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::HuntingTool,
            Self::Kendi,
            Self::Thakli,
            Self::ShellBangle,
            Self::PearlJewellery,
            Self::Alloy,
            Self::Blackstone,
            Self::VattaSillu,
            Self::Pottery,
        ]
        .into_iter()
    }
}

impl fmt::Display for ArtifactClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HuntingTool => "Hunting Tool",
            Self::Kendi => "Kendi",
            Self::Thakli => "Thakli",
            Self::ShellBangle => "Shell Bangle",
            Self::PearlJewellery => "Pearl Jewellery",
            Self::Alloy => "Alloy",
            Self::Blackstone => "Blackstone",
            Self::VattaSillu => "Vatta Sillu",
            Self::Pottery => "Pottery",
        };
        write!(f, "{name}")
    }
}

impl Serialize for ArtifactClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Error type for class parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseClassError {
    /// The invalid input string.
    pub input: String,
}

impl fmt::Display for ParseClassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown artifact class: '{}'", self.input)
    }
}

impl core::error::Error for ParseClassError {}

impl FromStr for ArtifactClass {
    type Err = ParseClassError;

    /// Parses a class from a dataset label or display name.
    ///
    /// Accepts formats like `huntingtool`, `Hunting Tool`, `vatta_sillu`
    /// or `shell-bangle`; case and separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace([' ', '-', '_'], "");

        let class = match normalized.as_str() {
            "huntingtool" => Self::HuntingTool,
            "kendi" => Self::Kendi,
            "thakli" => Self::Thakli,
            "shellbangle" => Self::ShellBangle,
            "pearljewellery" | "pearljewelry" => Self::PearlJewellery,
            "alloy" => Self::Alloy,
            "blackstone" => Self::Blackstone,
            "vattasillu" => Self::VattaSillu,
            "pottery" => Self::Pottery,
            _ => {
                return Err(ParseClassError {
                    input: s.to_string(),
                });
            }
        };

        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_matches_all() {
        assert_eq!(ArtifactClass::all().count(), ArtifactClass::COUNT);
    }

    #[test]
    fn test_index_round_trip() {
        for class in ArtifactClass::all() {
            assert_eq!(ArtifactClass::from_index(class.index()), Some(class));
        }
        assert_eq!(ArtifactClass::from_index(ArtifactClass::COUNT), None);
    }

    #[test]
    fn test_all_ordered_by_index() {
        let classes: Vec<_> = ArtifactClass::all().collect();
        assert_eq!(classes[0], ArtifactClass::HuntingTool);
        assert_eq!(classes[8], ArtifactClass::Pottery);
        for (i, class) in classes.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "huntingtool".parse::<ArtifactClass>().unwrap(),
            ArtifactClass::HuntingTool
        );
        assert_eq!(
            "Hunting Tool".parse::<ArtifactClass>().unwrap(),
            ArtifactClass::HuntingTool
        );
        assert_eq!(
            "shell bangle".parse::<ArtifactClass>().unwrap(),
            ArtifactClass::ShellBangle
        );
        assert_eq!(
            "vatta_sillu".parse::<ArtifactClass>().unwrap(),
            ArtifactClass::VattaSillu
        );
        assert_eq!(
            "Blackstone".parse::<ArtifactClass>().unwrap(),
            ArtifactClass::Blackstone
        );
    }

    #[test]
    fn test_from_str_error() {
        assert!("amphora".parse::<ArtifactClass>().is_err());
        assert!("".parse::<ArtifactClass>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ArtifactClass::HuntingTool.to_string(), "Hunting Tool");
        assert_eq!(ArtifactClass::VattaSillu.to_string(), "Vatta Sillu");
    }

    #[test]
    fn test_serialize_uses_label() {
        let json = serde_json::to_string(&ArtifactClass::ShellBangle).unwrap();
        assert_eq!(json, "\"shell bangle\"");
    }
}
