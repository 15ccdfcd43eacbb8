//! Project descriptor definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::build_type::{BuildTypeName, BuildTypeProfile};
use crate::dependency::DependencySpec;
use crate::java::JavaVersion;

/// Name of the signing configuration every project knows about.
///
/// The build toolchain generates the debug keystore itself, so references to
/// it resolve without a declaration.
pub const DEBUG_SIGNING_CONFIG: &str = "debug";

/// Default relative path from the app module to the Flutter project.
pub const DEFAULT_FLUTTER_SOURCE: &str = "../..";

/// A resolved Android application module descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    /// Gradle plugin ids applied to the module, in declaration order.
    pub plugins: Vec<String>,
    /// Package identifier compiled into the binary metadata.
    pub namespace: String,
    /// SDK level the module is compiled against.
    pub compile_sdk: u32,
    /// NDK version, when the module pins one.
    pub ndk_version: Option<String>,
    /// Identity and version metadata.
    pub default_config: DefaultConfig,
    /// Java language levels and desugaring.
    pub compile_options: CompileOptions,
    /// Kotlin compiler options.
    pub kotlin_options: KotlinOptions,
    /// Declared signing configurations, keyed by name.
    pub signing_configs: BTreeMap<String, SigningConfig>,
    /// Build type profiles, keyed by name.
    pub build_types: BTreeMap<BuildTypeName, BuildTypeProfile>,
    /// Flutter plugin settings.
    pub flutter: FlutterConfig,
    /// Declared dependencies.
    pub dependencies: DependencySpec,
}

impl ProjectDescriptor {
    /// Whether `name` refers to a signing configuration this project knows.
    pub fn has_signing_config(&self, name: &str) -> bool {
        name == DEBUG_SIGNING_CONFIG || self.signing_configs.contains_key(name)
    }

    /// Look up a build type profile.
    pub fn build_type(&self, name: BuildTypeName) -> Option<&BuildTypeProfile> {
        self.build_types.get(&name)
    }
}

/// Identity and version metadata shared by every build type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultConfig {
    /// Identifier used by the distribution platform.
    pub application_id: String,
    pub min_sdk: u32,
    pub target_sdk: u32,
    pub version_code: u32,
    pub version_name: String,
}

/// Java compilation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    pub source_compatibility: JavaVersion,
    pub target_compatibility: JavaVersion,
    /// Whether core library desugaring is enabled.
    pub core_library_desugaring: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            source_compatibility: JavaVersion::V1_8,
            target_compatibility: JavaVersion::V1_8,
            core_library_desugaring: false,
        }
    }
}

/// Kotlin compiler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KotlinOptions {
    /// JVM bytecode target; must agree with the Java target compatibility.
    pub jvm_target: JavaVersion,
}

/// Named signing material.
///
/// Only references are resolved here. The material itself is consumed by the
/// packaging toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    pub name: String,
    /// Keystore path, relative to the app module.
    pub store_file: Option<String>,
    pub store_password: Option<String>,
    pub key_alias: Option<String>,
    pub key_password: Option<String>,
}

impl SigningConfig {
    /// Create a signing configuration with no material set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store_file: None,
            store_password: None,
            key_alias: None,
            key_password: None,
        }
    }

    /// Copy of this configuration with passwords replaced by a placeholder.
    pub fn masked(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "****".to_string());
        Self {
            store_password: mask(&self.store_password),
            key_password: mask(&self.key_password),
            ..self.clone()
        }
    }
}

/// Flutter plugin settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlutterConfig {
    /// Path of the Flutter project relative to the app module.
    pub source: String,
}

impl Default for FlutterConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_FLUTTER_SOURCE.to_string(),
        }
    }
}
