//! Java language levels.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A Java language level understood by the Android toolchain.
///
/// Variants are declared oldest first so the derived ordering follows release
/// order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum JavaVersion {
    #[display("1.8")]
    #[serde(rename = "1.8")]
    V1_8,
    #[display("11")]
    #[serde(rename = "11")]
    V11,
    #[display("17")]
    #[serde(rename = "17")]
    V17,
    #[display("21")]
    #[serde(rename = "21")]
    V21,
}

impl JavaVersion {
    pub const ALL: [JavaVersion; 4] = [
        JavaVersion::V1_8,
        JavaVersion::V11,
        JavaVersion::V17,
        JavaVersion::V21,
    ];

    /// Major release number (8 for 1.8).
    pub fn major(self) -> u32 {
        match self {
            JavaVersion::V1_8 => 8,
            JavaVersion::V11 => 11,
            JavaVersion::V17 => 17,
            JavaVersion::V21 => 21,
        }
    }

    /// Look up a level by its major release number.
    pub fn from_major(major: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.major() == major)
    }
}

impl std::str::FromStr for JavaVersion {
    type Err = Error;

    /// Accepts `17`, `1.8`, and the Gradle constant spelling `VERSION_17`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix("VERSION_").unwrap_or(trimmed);
        let major = match bare {
            "1.8" | "1_8" => Some(8),
            other => other.parse::<u32>().ok(),
        };

        major
            .and_then(Self::from_major)
            .ok_or_else(|| Error::InvalidInput(format!("unsupported Java version: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spellings() {
        assert_eq!("17".parse::<JavaVersion>().unwrap(), JavaVersion::V17);
        assert_eq!("1.8".parse::<JavaVersion>().unwrap(), JavaVersion::V1_8);
        assert_eq!("8".parse::<JavaVersion>().unwrap(), JavaVersion::V1_8);
        assert_eq!(
            "VERSION_1_8".parse::<JavaVersion>().unwrap(),
            JavaVersion::V1_8
        );
        assert_eq!(
            "VERSION_21".parse::<JavaVersion>().unwrap(),
            JavaVersion::V21
        );
    }

    #[test]
    fn test_reject_unknown_version() {
        assert!("9".parse::<JavaVersion>().is_err());
        assert!("seventeen".parse::<JavaVersion>().is_err());
    }

    #[test]
    fn test_ordering_follows_release_order() {
        assert!(JavaVersion::V1_8 < JavaVersion::V11);
        assert!(JavaVersion::V17 < JavaVersion::V21);
    }

    #[test]
    fn test_display_round_trips() {
        for version in JavaVersion::ALL {
            assert_eq!(version.to_string().parse::<JavaVersion>().unwrap(), version);
        }
    }
}
