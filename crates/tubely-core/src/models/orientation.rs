//! Orientation categories used to namespace stored videos by shape.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Classify a raw display aspect ratio as reported by ffprobe.
    ///
    /// Only the exact strings `16:9` and `9:16` are recognised; reduced or
    /// otherwise formatted ratios fall into `Other`.
    pub fn from_aspect_ratio(aspect_ratio: &str) -> Self {
        match aspect_ratio {
            "16:9" => Orientation::Landscape,
            "9:16" => Orientation::Portrait,
            _ => Orientation::Other,
        }
    }

    /// Directory prefix for storage keys, including the trailing slash.
    pub fn directory(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape/",
            Orientation::Portrait => "portrait/",
            Orientation::Other => "other/",
        }
    }
}

impl Display for Orientation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_ratios_are_classified() {
        assert_eq!(Orientation::from_aspect_ratio("16:9"), Orientation::Landscape);
        assert_eq!(Orientation::from_aspect_ratio("9:16"), Orientation::Portrait);
    }

    #[test]
    fn test_everything_else_is_other() {
        for ratio in ["", "4:3", "1:1", "32:18", "16:10", "16/9", " 16:9", "9:16 ", "garbage"] {
            assert_eq!(
                Orientation::from_aspect_ratio(ratio),
                Orientation::Other,
                "ratio {:?}",
                ratio
            );
        }
    }

    #[test]
    fn test_directories() {
        assert_eq!(Orientation::Landscape.directory(), "landscape/");
        assert_eq!(Orientation::Portrait.directory(), "portrait/");
        assert_eq!(Orientation::Other.directory(), "other/");
    }
}
