//! Dependency declarations.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Error, Result};

/// Scope that feeds the desugaring transform.
pub const CORE_LIBRARY_DESUGARING: &str = "core-library-desugaring";

/// A `group:artifact:version` coordinate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[display("{group}:{artifact}:{version}")]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl std::str::FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Coordinate {
                    group: group.to_string(),
                    artifact: artifact.to_string(),
                    version: version.to_string(),
                })
            }
            _ => Err(Error::InvalidInput(format!(
                "expected group:artifact:version, got '{}'",
                s
            ))),
        }
    }
}

/// Dependencies keyed by scope (`implementation`, `core-library-desugaring`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    scopes: BTreeMap<String, Vec<Coordinate>>,
}

impl DependencySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a coordinate to a scope.
    pub fn add(&mut self, scope: impl Into<String>, coordinate: Coordinate) {
        self.scopes.entry(scope.into()).or_default().push(coordinate);
    }

    /// Coordinates declared for a scope, in declaration order.
    pub fn get(&self, scope: &str) -> &[Coordinate] {
        self.scopes.get(scope).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Iterate scopes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Coordinate])> {
        self.scopes
            .iter()
            .map(|(scope, coords)| (scope.as_str(), coords.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let coord: Coordinate = "com.android.tools:desugar_jdk_libs:2.1.4".parse().unwrap();
        assert_eq!(coord.group, "com.android.tools");
        assert_eq!(coord.artifact, "desugar_jdk_libs");
        assert_eq!(coord.version, "2.1.4");
        assert_eq!(coord.to_string(), "com.android.tools:desugar_jdk_libs:2.1.4");
    }

    #[test]
    fn test_reject_malformed_coordinates() {
        assert!("com.android.tools:desugar_jdk_libs".parse::<Coordinate>().is_err());
        assert!("a::1".parse::<Coordinate>().is_err());
        assert!("a:b:c:d".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_scopes_keep_declaration_order() {
        let mut deps = DependencySpec::new();
        deps.add("implementation", "b:b:1".parse().unwrap());
        deps.add("implementation", "a:a:1".parse().unwrap());

        let coords = deps.get("implementation");
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].group, "b");
        assert!(deps.get(CORE_LIBRARY_DESUGARING).is_empty());
    }
}
