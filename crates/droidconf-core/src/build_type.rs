//! Build type profiles.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::descriptor::DEBUG_SIGNING_CONFIG;
use crate::{Error, Result};

/// The fixed set of build types a Flutter Android module may declare.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildTypeName {
    #[display("debug")]
    Debug,
    #[display("profile")]
    Profile,
    #[display("release")]
    Release,
}

impl BuildTypeName {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildTypeName::Debug => "debug",
            BuildTypeName::Profile => "profile",
            BuildTypeName::Release => "release",
        }
    }
}

impl std::str::FromStr for BuildTypeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "debug" => Ok(BuildTypeName::Debug),
            "profile" => Ok(BuildTypeName::Profile),
            "release" => Ok(BuildTypeName::Release),
            other => Err(Error::InvalidInput(format!(
                "unknown build type '{}' (expected debug, profile or release)",
                other
            ))),
        }
    }
}

/// Settings for one build type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTypeProfile {
    pub name: BuildTypeName,
    /// Code shrinking and obfuscation.
    pub minify_enabled: bool,
    /// Unused resource removal; only effective with `minify_enabled`.
    pub shrink_resources: bool,
    /// Name of the signing configuration used for this build type.
    pub signing_config: String,
}

impl BuildTypeProfile {
    /// A profile with every flag off, signed with the debug configuration.
    pub fn new(name: BuildTypeName) -> Self {
        Self {
            name,
            minify_enabled: false,
            shrink_resources: false,
            signing_config: DEBUG_SIGNING_CONFIG.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_type_names() {
        assert_eq!(
            "release".parse::<BuildTypeName>().unwrap(),
            BuildTypeName::Release
        );
        assert!("staging".parse::<BuildTypeName>().is_err());
        assert!("Debug".parse::<BuildTypeName>().is_err());
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = BuildTypeProfile::new(BuildTypeName::Release);
        assert!(!profile.minify_enabled);
        assert!(!profile.shrink_resources);
        assert_eq!(profile.signing_config, "debug");
        assert_eq!(profile.name.to_string(), "release");
    }
}
