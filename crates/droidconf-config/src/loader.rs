//! Descriptor loading from KDL text.

use crate::validate::validate;
use crate::variables::VariableContext;
use crate::{ConfigError, ConfigResult};
use droidconf_core::descriptor::{DEBUG_SIGNING_CONFIG, DEFAULT_FLUTTER_SOURCE};
use droidconf_core::{
    BuildTypeName, BuildTypeProfile, CompileOptions, Coordinate, DefaultConfig, DependencySpec,
    FlutterConfig, JavaVersion, KotlinOptions, ProjectDescriptor, SigningConfig, VersionProvider,
};
use kdl::{KdlDocument, KdlNode, KdlValue};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Conventional descriptor location relative to the project root.
pub const DESCRIPTOR_PATH: &str = "android/app/build.kdl";

/// Load and validate a descriptor from KDL text.
pub fn load(input: &str, provider: &dyn VersionProvider) -> ConfigResult<ProjectDescriptor> {
    DescriptorLoader::new(provider).load(input)
}

/// Resolves descriptors against a version provider and a variable context.
pub struct DescriptorLoader<'a> {
    provider: &'a dyn VersionProvider,
    variables: VariableContext,
}

impl<'a> DescriptorLoader<'a> {
    /// Create a loader whose `${flutter.*}` variables come from `provider`.
    pub fn new(provider: &'a dyn VersionProvider) -> Self {
        Self {
            provider,
            variables: VariableContext::from_provider(provider),
        }
    }

    /// Merge extra variables into the context, replacing any value already
    /// present under the same name.
    pub fn with_variables(mut self, variables: VariableContext) -> Self {
        self.variables.flutter.extend(variables.flutter);
        self.variables.env.extend(variables.env);
        self.variables.custom.extend(variables.custom);
        self
    }

    /// Expose the process environment as `${env.*}`.
    pub fn with_process_env(mut self) -> Self {
        self.variables.populate_env();
        self
    }

    /// Parse, resolve, default and validate a descriptor.
    ///
    /// Fails with the first violation found.
    pub fn load(&self, input: &str) -> ConfigResult<ProjectDescriptor> {
        let descriptor = self.resolve(input)?;
        if let Err(violations) = validate(&descriptor) {
            debug!(count = violations.len(), "Descriptor failed validation");
            if let Some(first) = violations.into_iter().next() {
                return Err(first);
            }
        }
        Ok(descriptor)
    }

    /// Read and load a descriptor file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> ConfigResult<ProjectDescriptor> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let descriptor = self.load(&content)?;
        info!(path = %path.display(), namespace = %descriptor.namespace, "Loaded descriptor");
        Ok(descriptor)
    }

    /// Load the descriptor at its conventional location under `root`.
    pub fn load_project(&self, root: impl AsRef<Path>) -> ConfigResult<ProjectDescriptor> {
        self.load_file(root.as_ref().join(DESCRIPTOR_PATH))
    }

    /// Parse, resolve variables and apply defaults without validating
    /// cross-field invariants.
    pub fn resolve(&self, input: &str) -> ConfigResult<ProjectDescriptor> {
        let doc: KdlDocument = input.parse()?;

        let mut plugins = Vec::new();
        let mut android = None;
        let mut flutter = None;
        let mut dependencies = None;

        for node in doc.nodes() {
            match node.name().value() {
                "plugins" => {
                    for child in child_nodes(node) {
                        match child.name().value() {
                            "id" => plugins.push(self.string(child, "plugins.id")?),
                            other => warn!(node = %other, "Ignoring unknown node in plugins"),
                        }
                    }
                }
                "android" => {
                    set_once(&mut android, self.parse_android(node)?, "android")?;
                }
                "flutter" => {
                    set_once(&mut flutter, self.parse_flutter(node)?, "flutter")?;
                }
                "dependencies" => {
                    set_once(
                        &mut dependencies,
                        self.parse_dependencies(node)?,
                        "dependencies",
                    )?;
                }
                other => debug!(node = %other, "Ignoring unknown top-level node"),
            }
        }

        let android = android.ok_or_else(|| ConfigError::MissingField("android".to_string()))?;

        Ok(ProjectDescriptor {
            plugins,
            namespace: android.namespace,
            compile_sdk: android.compile_sdk,
            ndk_version: android.ndk_version,
            default_config: android.default_config,
            compile_options: android.compile_options,
            kotlin_options: android.kotlin_options,
            signing_configs: android.signing_configs,
            build_types: android.build_types,
            flutter: flutter.unwrap_or_default(),
            dependencies: dependencies.unwrap_or_default(),
        })
    }

    fn parse_android(&self, node: &KdlNode) -> ConfigResult<AndroidSection> {
        let mut namespace = None;
        let mut compile_sdk = None;
        let mut ndk_version = None;
        let mut default_config = None;
        let mut compile_options = None;
        let mut jvm_target = None;
        let mut signing_configs = None;
        let mut build_types = None;

        for child in child_nodes(node) {
            match child.name().value() {
                "namespace" => {
                    let value = self.string(child, "android.namespace")?;
                    set_once(&mut namespace, value, "android.namespace")?;
                }
                "compile-sdk" => {
                    let value = self.integer(child, "android.compile-sdk")?;
                    set_once(&mut compile_sdk, value, "android.compile-sdk")?;
                }
                "ndk-version" => {
                    let value = self.string(child, "android.ndk-version")?;
                    set_once(&mut ndk_version, value, "android.ndk-version")?;
                }
                "default-config" => {
                    let value = self.parse_default_config(child)?;
                    set_once(&mut default_config, value, "android.default-config")?;
                }
                "compile-options" => {
                    let value = self.parse_compile_options(child)?;
                    set_once(&mut compile_options, value, "android.compile-options")?;
                }
                "kotlin-options" => {
                    for option in child_nodes(child) {
                        match option.name().value() {
                            "jvm-target" => {
                                let field = "android.kotlin-options.jvm-target";
                                let value = self.java_version(option, field)?;
                                set_once(&mut jvm_target, value, field)?;
                            }
                            other => {
                                warn!(node = %other, "Ignoring unknown node in kotlin-options")
                            }
                        }
                    }
                }
                "signing-configs" => {
                    let value = self.parse_signing_configs(child)?;
                    set_once(&mut signing_configs, value, "android.signing-configs")?;
                }
                "build-types" => {
                    let value = self.parse_build_types(child)?;
                    set_once(&mut build_types, value, "android.build-types")?;
                }
                other => warn!(node = %other, "Ignoring unknown node in android"),
            }
        }

        let namespace =
            namespace.ok_or_else(|| ConfigError::MissingField("android.namespace".to_string()))?;
        let default_config = default_config.ok_or_else(|| {
            ConfigError::MissingField("android.default-config.application-id".to_string())
        })?;

        let compile_sdk = compile_sdk
            .or_else(|| self.provider.compile_sdk())
            .ok_or_else(|| ConfigError::MissingField("android.compile-sdk".to_string()))?;

        let compile_options = compile_options.unwrap_or_default();
        let kotlin_options = KotlinOptions {
            jvm_target: jvm_target.unwrap_or(compile_options.target_compatibility),
        };

        let build_types: BTreeMap<BuildTypeName, BuildTypeProfile> =
            build_types.unwrap_or_default();
        if !build_types.contains_key(&BuildTypeName::Debug) {
            return Err(ConfigError::MissingField(
                "android.build-types.debug".to_string(),
            ));
        }

        Ok(AndroidSection {
            namespace,
            compile_sdk,
            ndk_version,
            default_config,
            compile_options,
            kotlin_options,
            signing_configs: signing_configs.unwrap_or_default(),
            build_types,
        })
    }

    fn parse_default_config(&self, node: &KdlNode) -> ConfigResult<DefaultConfig> {
        let mut application_id = None;
        let mut min_sdk = None;
        let mut target_sdk = None;
        let mut version_code = None;
        let mut version_name = None;

        for child in child_nodes(node) {
            let name = child.name().value();
            let field = format!("android.default-config.{}", name);
            match name {
                "application-id" => {
                    set_once(&mut application_id, self.string(child, &field)?, &field)?;
                }
                "min-sdk" => {
                    set_once(&mut min_sdk, self.integer(child, &field)?, &field)?;
                }
                "target-sdk" => {
                    set_once(&mut target_sdk, self.integer(child, &field)?, &field)?;
                }
                "version-code" => {
                    set_once(&mut version_code, self.integer(child, &field)?, &field)?;
                }
                "version-name" => {
                    set_once(&mut version_name, self.string(child, &field)?, &field)?;
                }
                other => warn!(node = %other, "Ignoring unknown node in default-config"),
            }
        }

        let missing =
            |name: &str| ConfigError::MissingField(format!("android.default-config.{}", name));

        Ok(DefaultConfig {
            application_id: application_id.ok_or_else(|| missing("application-id"))?,
            min_sdk: min_sdk
                .or_else(|| self.provider.min_sdk())
                .ok_or_else(|| missing("min-sdk"))?,
            target_sdk: target_sdk
                .or_else(|| self.provider.target_sdk())
                .ok_or_else(|| missing("target-sdk"))?,
            version_code: version_code
                .or_else(|| self.provider.version_code())
                .ok_or_else(|| missing("version-code"))?,
            version_name: version_name
                .or_else(|| self.provider.version_name())
                .ok_or_else(|| missing("version-name"))?,
        })
    }

    fn parse_compile_options(&self, node: &KdlNode) -> ConfigResult<CompileOptions> {
        let mut options = CompileOptions::default();
        let mut seen = Vec::new();

        for child in child_nodes(node) {
            let name = child.name().value();
            let field = format!("android.compile-options.{}", name);
            if seen.contains(&name) {
                return Err(ConfigError::Duplicate(field));
            }
            match name {
                "source-compatibility" => {
                    options.source_compatibility = self.java_version(child, &field)?;
                }
                "target-compatibility" => {
                    options.target_compatibility = self.java_version(child, &field)?;
                }
                "core-library-desugaring" => {
                    options.core_library_desugaring = bool_value(child, &field)?;
                }
                other => {
                    warn!(node = %other, "Ignoring unknown node in compile-options");
                    continue;
                }
            }
            seen.push(name);
        }

        Ok(options)
    }

    fn parse_signing_configs(
        &self,
        node: &KdlNode,
    ) -> ConfigResult<BTreeMap<String, SigningConfig>> {
        let mut configs = BTreeMap::new();

        for child in child_nodes(node) {
            let name = child.name().value().to_string();
            let prefix = format!("android.signing-configs.{}", name);
            if configs.contains_key(&name) {
                return Err(ConfigError::Duplicate(prefix));
            }

            let mut config = SigningConfig::new(name.clone());
            for entry in child_nodes(child) {
                let key = entry.name().value();
                let field = format!("{}.{}", prefix, key);
                let slot = match key {
                    "store-file" => &mut config.store_file,
                    "store-password" => &mut config.store_password,
                    "key-alias" => &mut config.key_alias,
                    "key-password" => &mut config.key_password,
                    other => {
                        warn!(
                            node = %other,
                            config = %name,
                            "Ignoring unknown node in signing config"
                        );
                        continue;
                    }
                };
                set_once(slot, self.string(entry, &field)?, &field)?;
            }

            configs.insert(name, config);
        }

        Ok(configs)
    }

    fn parse_build_types(
        &self,
        node: &KdlNode,
    ) -> ConfigResult<BTreeMap<BuildTypeName, BuildTypeProfile>> {
        let mut profiles = BTreeMap::new();

        for child in child_nodes(node) {
            let raw_name = child.name().value();
            let name: BuildTypeName = raw_name
                .parse()
                .map_err(|e: droidconf_core::Error| {
                    ConfigError::invalid("android.build-types", e.to_string())
                })?;
            let prefix = format!("android.build-types.{}", name);
            if profiles.contains_key(&name) {
                return Err(ConfigError::Duplicate(prefix));
            }

            let mut minify = None;
            let mut shrink = None;
            let mut signing = None;
            for entry in child_nodes(child) {
                let key = entry.name().value();
                let field = format!("{}.{}", prefix, key);
                match key {
                    "minify" => set_once(&mut minify, bool_value(entry, &field)?, &field)?,
                    "shrink-resources" => {
                        set_once(&mut shrink, bool_value(entry, &field)?, &field)?;
                    }
                    "signing-config" => {
                        set_once(&mut signing, self.string(entry, &field)?, &field)?;
                    }
                    other => warn!(
                        node = %other,
                        build_type = %name,
                        "Ignoring unknown node in build type"
                    ),
                }
            }

            profiles.insert(
                name,
                BuildTypeProfile {
                    name,
                    minify_enabled: minify.unwrap_or(false),
                    shrink_resources: shrink.unwrap_or(false),
                    signing_config: signing.unwrap_or_else(|| DEBUG_SIGNING_CONFIG.to_string()),
                },
            );
        }

        Ok(profiles)
    }

    fn parse_flutter(&self, node: &KdlNode) -> ConfigResult<FlutterConfig> {
        let mut source = None;

        for child in child_nodes(node) {
            match child.name().value() {
                "source" => {
                    let value = self.string(child, "flutter.source")?;
                    set_once(&mut source, value, "flutter.source")?;
                }
                other => warn!(node = %other, "Ignoring unknown node in flutter"),
            }
        }

        Ok(FlutterConfig {
            source: source.unwrap_or_else(|| DEFAULT_FLUTTER_SOURCE.to_string()),
        })
    }

    fn parse_dependencies(&self, node: &KdlNode) -> ConfigResult<DependencySpec> {
        let mut deps = DependencySpec::new();

        for child in child_nodes(node) {
            let scope = child.name().value();
            let field = format!("dependencies.{}", scope);
            let args = positional_args(child);
            if args.is_empty() {
                return Err(ConfigError::MalformedInput(format!(
                    "{} expects at least one coordinate",
                    field
                )));
            }

            for value in args {
                let raw = value.as_string().ok_or_else(|| {
                    ConfigError::MalformedInput(format!("{} expects string coordinates", field))
                })?;
                let text = self.interpolate(raw, &field)?;
                let coordinate: Coordinate = text.parse().map_err(|e: droidconf_core::Error| {
                    ConfigError::invalid(&field, e.to_string())
                })?;
                deps.add(scope, coordinate);
            }
        }

        Ok(deps)
    }

    // Value extraction

    fn interpolate(&self, raw: &str, field: &str) -> ConfigResult<String> {
        self.variables.try_interpolate(raw).map_err(|var| {
            ConfigError::UnresolvedReference(format!("variable ${{{}}} in {}", var, field))
        })
    }

    fn string(&self, node: &KdlNode, field: &str) -> ConfigResult<String> {
        match first_arg(node) {
            Some(KdlValue::String(raw)) => self.interpolate(raw, field),
            _ => Err(ConfigError::MalformedInput(format!(
                "{} expects a string value",
                field
            ))),
        }
    }

    fn integer(&self, node: &KdlNode, field: &str) -> ConfigResult<u32> {
        match first_arg(node) {
            Some(KdlValue::Integer(value)) => u32::try_from(*value)
                .map_err(|_| ConfigError::invalid(field, format!("{} is out of range", value))),
            Some(KdlValue::String(raw)) => {
                let text = self.interpolate(raw, field)?;
                text.trim().parse::<u32>().map_err(|_| {
                    ConfigError::invalid(field, format!("expected an integer, got '{}'", text))
                })
            }
            _ => Err(ConfigError::MalformedInput(format!(
                "{} expects an integer value",
                field
            ))),
        }
    }

    fn java_version(&self, node: &KdlNode, field: &str) -> ConfigResult<JavaVersion> {
        let text = match first_arg(node) {
            Some(KdlValue::Integer(value)) => value.to_string(),
            Some(KdlValue::String(raw)) => self.interpolate(raw, field)?,
            _ => {
                return Err(ConfigError::MalformedInput(format!(
                    "{} expects a Java version",
                    field
                )));
            }
        };
        text.parse()
            .map_err(|e: droidconf_core::Error| ConfigError::invalid(field, e.to_string()))
    }
}

struct AndroidSection {
    namespace: String,
    compile_sdk: u32,
    ndk_version: Option<String>,
    default_config: DefaultConfig,
    compile_options: CompileOptions,
    kotlin_options: KotlinOptions,
    signing_configs: BTreeMap<String, SigningConfig>,
    build_types: BTreeMap<BuildTypeName, BuildTypeProfile>,
}

// Helper functions for extracting values from KDL nodes

fn child_nodes(node: &KdlNode) -> &[KdlNode] {
    node.children().map(|doc| doc.nodes()).unwrap_or(&[])
}

fn first_arg(node: &KdlNode) -> Option<&KdlValue> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| e.value())
}

fn positional_args(node: &KdlNode) -> Vec<&KdlValue> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .map(|e| e.value())
        .collect()
}

fn bool_value(node: &KdlNode, field: &str) -> ConfigResult<bool> {
    first_arg(node).and_then(|v| v.as_bool()).ok_or_else(|| {
        ConfigError::MalformedInput(format!("{} expects #true or #false", field))
    })
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: &str) -> ConfigResult<()> {
    if slot.is_some() {
        return Err(ConfigError::Duplicate(field.to_string()));
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidconf_core::StaticVersions;
    use droidconf_core::dependency::CORE_LIBRARY_DESUGARING;

    fn provider() -> StaticVersions {
        StaticVersions::new()
            .with_compile_sdk(34)
            .with_min_sdk(21)
            .with_target_sdk(34)
            .with_version_code(1)
            .with_version_name("1.0.0")
            .with_ndk_version("26.3.11579264")
    }

    const EXAMPLE_APP: &str = r#"
        plugins {
            id "com.android.application"
            id "org.jetbrains.kotlin.android"
            id "dev.flutter.flutter-gradle-plugin"
        }

        android {
            namespace "com.example.app"
            compile-sdk "${flutter.compileSdkVersion}"
            ndk-version "${flutter.ndkVersion}"

            default-config {
                application-id "com.example.app"
                min-sdk 21
                target-sdk 34
                version-code "${flutter.versionCode}"
                version-name "${flutter.versionName}"
            }

            compile-options {
                source-compatibility "17"
                target-compatibility "17"
                core-library-desugaring #true
            }

            kotlin-options {
                jvm-target "17"
            }

            build-types {
                release {
                    signing-config "debug"
                    minify #false
                    shrink-resources #false
                }
                debug {
                    signing-config "debug"
                }
            }
        }

        flutter {
            source "../.."
        }

        dependencies {
            core-library-desugaring "com.android.tools:desugar_jdk_libs:2.1.4"
        }
    "#;

    #[test]
    fn test_load_example_app() {
        let descriptor = load(EXAMPLE_APP, &provider()).unwrap();

        assert_eq!(descriptor.plugins.len(), 3);
        assert_eq!(descriptor.namespace, "com.example.app");
        assert_eq!(descriptor.compile_sdk, 34);
        assert_eq!(descriptor.ndk_version.as_deref(), Some("26.3.11579264"));
        assert_eq!(descriptor.default_config.application_id, "com.example.app");
        assert_eq!(descriptor.default_config.min_sdk, 21);
        assert_eq!(descriptor.default_config.target_sdk, 34);
        assert_eq!(descriptor.default_config.version_name, "1.0.0");
        assert_eq!(
            descriptor.compile_options.target_compatibility,
            JavaVersion::V17
        );
        assert!(descriptor.compile_options.core_library_desugaring);
        assert_eq!(descriptor.kotlin_options.jvm_target, JavaVersion::V17);

        assert_eq!(descriptor.build_types.len(), 2);
        for profile in descriptor.build_types.values() {
            assert_eq!(profile.signing_config, "debug");
            assert!(!profile.minify_enabled);
            assert!(!profile.shrink_resources);
        }

        assert_eq!(descriptor.dependencies.get(CORE_LIBRARY_DESUGARING).len(), 1);
        assert_eq!(descriptor.flutter.source, "../..");
    }

    #[test]
    fn test_missing_application_id() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    min-sdk 21
                }
                build-types {
                    debug
                }
            }
        "#;

        let result = load(kdl, &provider());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::MissingField(field) if field == "android.default-config.application-id"
        ));
    }

    #[test]
    fn test_missing_default_config_block() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                build-types {
                    debug
                }
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::MissingField(_)
        ));
    }

    #[test]
    fn test_missing_namespace() {
        let kdl = r#"
            android {
                default-config {
                    application-id "com.example.app"
                }
                build-types {
                    debug
                }
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::MissingField(field) if field == "android.namespace"
        ));
    }

    #[test]
    fn test_missing_debug_build_type() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    application-id "com.example.app"
                }
                build-types {
                    release
                }
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::MissingField(field) if field == "android.build-types.debug"
        ));
    }

    #[test]
    fn test_missing_android_block() {
        let kdl = r#"
            flutter {
                source "../.."
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::MissingField(field) if field == "android"
        ));
    }

    #[test]
    fn test_min_sdk_above_target_sdk() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    application-id "com.example.app"
                    min-sdk 30
                    target-sdk 28
                }
                build-types {
                    debug
                }
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::InvalidVersionOrdering {
                min_sdk: 30,
                target_sdk: 28
            }
        ));
    }

    #[test]
    fn test_unresolved_signing_reference() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    application-id "com.example.app"
                    min-sdk 21
                    target-sdk 34
                }
                build-types {
                    debug {
                        signing-config "debug"
                    }
                    release {
                        signing-config "release"
                        minify #false
                        shrink-resources #false
                    }
                }
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::UnresolvedReference(_)
        ));
    }

    #[test]
    fn test_declared_signing_config_resolves() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    application-id "com.example.app"
                }
                signing-configs {
                    release {
                        store-file "upload-keystore.jks"
                        store-password "${env.STORE_PASSWORD}"
                        key-alias "upload"
                        key-password "${env.KEY_PASSWORD}"
                    }
                }
                build-types {
                    debug
                    release {
                        signing-config "release"
                        minify #true
                        shrink-resources #true
                    }
                }
            }
        "#;

        let variables = crate::VariableContextBuilder::new()
            .with_env("STORE_PASSWORD", "store-secret")
            .with_env("KEY_PASSWORD", "key-secret")
            .build();
        let provider = provider();
        let descriptor = DescriptorLoader::new(&provider)
            .with_variables(variables)
            .load(kdl)
            .unwrap();

        let release = &descriptor.signing_configs["release"];
        assert_eq!(release.store_file.as_deref(), Some("upload-keystore.jks"));
        assert_eq!(release.store_password.as_deref(), Some("store-secret"));
        assert_eq!(release.key_password.as_deref(), Some("key-secret"));

        let profile = descriptor.build_type(BuildTypeName::Release).unwrap();
        assert_eq!(profile.signing_config, "release");
        assert!(profile.minify_enabled);
        assert!(profile.shrink_resources);
    }

    #[test]
    fn test_extra_variables_override_provider() {
        let variables = crate::VariableContextBuilder::new()
            .with_flutter("versionCode", "42")
            .with_custom("desugar_version", "2.0.4")
            .build();
        let kdl = EXAMPLE_APP.replace(
            "desugar_jdk_libs:2.1.4",
            "desugar_jdk_libs:${desugar_version}",
        );

        let provider = provider();
        let descriptor = DescriptorLoader::new(&provider)
            .with_variables(variables)
            .load(&kdl)
            .unwrap();

        assert_eq!(descriptor.default_config.version_code, 42);
        assert_eq!(descriptor.compile_sdk, 34);
        assert_eq!(
            descriptor.dependencies.get("core-library-desugaring")[0].version,
            "2.0.4"
        );
    }

    #[test]
    fn test_defaults_from_provider() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    application-id "com.example.app"
                }
                build-types {
                    debug
                }
            }
        "#;

        let descriptor = load(kdl, &provider()).unwrap();
        assert_eq!(descriptor.compile_sdk, 34);
        assert_eq!(descriptor.ndk_version, None);
        assert_eq!(descriptor.default_config.min_sdk, 21);
        assert_eq!(descriptor.default_config.version_code, 1);
        assert_eq!(descriptor.compile_options, CompileOptions::default());
        assert_eq!(descriptor.kotlin_options.jvm_target, JavaVersion::V1_8);
        assert_eq!(descriptor.flutter, FlutterConfig::default());
        assert!(descriptor.dependencies.is_empty());

        let debug = descriptor.build_type(BuildTypeName::Debug).unwrap();
        assert_eq!(debug, &BuildTypeProfile::new(BuildTypeName::Debug));
    }

    #[test]
    fn test_missing_value_without_provider() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    application-id "com.example.app"
                }
                build-types {
                    debug
                }
            }
        "#;

        let provider = StaticVersions::new()
            .with_min_sdk(21)
            .with_target_sdk(34)
            .with_version_code(1)
            .with_version_name("1.0");
        assert!(matches!(
            load(kdl, &provider).unwrap_err(),
            ConfigError::MissingField(field) if field == "android.compile-sdk"
        ));
    }

    #[test]
    fn test_unresolved_provider_variable() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    application-id "com.example.app"
                    version-code "${flutter.versionCode}"
                }
                build-types {
                    debug
                }
            }
        "#;

        let provider = StaticVersions::new()
            .with_compile_sdk(34)
            .with_min_sdk(21)
            .with_target_sdk(34)
            .with_version_name("1.0");
        let err = load(kdl, &provider).unwrap_err();
        assert!(
            matches!(&err, ConfigError::UnresolvedReference(msg) if msg.contains("flutter.versionCode"))
        );
    }

    #[test]
    fn test_non_numeric_sdk() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                compile-sdk "thirty-four"
                default-config {
                    application-id "com.example.app"
                }
                build-types {
                    debug
                }
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_unknown_build_type() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    application-id "com.example.app"
                }
                build-types {
                    debug
                    staging
                }
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::InvalidValue { field, .. } if field == "android.build-types"
        ));
    }

    #[test]
    fn test_duplicate_build_type() {
        let kdl = r#"
            android {
                namespace "com.example.app"
                default-config {
                    application-id "com.example.app"
                }
                build-types {
                    debug
                    debug
                }
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::Duplicate(_)
        ));
    }

    #[test]
    fn test_malformed_kdl() {
        let result = load("android {", &provider());
        assert!(matches!(result.unwrap_err(), ConfigError::MalformedInput(_)));
    }

    #[test]
    fn test_wrong_value_shape() {
        let kdl = r#"
            android {
                namespace 42
                default-config {
                    application-id "com.example.app"
                }
                build-types {
                    debug
                }
            }
        "#;

        assert!(matches!(
            load(kdl, &provider()).unwrap_err(),
            ConfigError::MalformedInput(_)
        ));
    }

    #[test]
    fn test_mismatched_namespace_and_application_id() {
        let kdl = r#"
            android {
                namespace "com.example.flutter_onesignal_example"
                default-config {
                    application-id "com.example.hr_management_system"
                }
                build-types {
                    debug
                }
            }
        "#;

        let descriptor = load(kdl, &provider()).unwrap();
        assert_ne!(
            descriptor.namespace,
            descriptor.default_config.application_id
        );
    }

    #[test]
    fn test_load_project_from_conventional_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DESCRIPTOR_PATH);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, EXAMPLE_APP).unwrap();

        let provider = provider();
        let descriptor = DescriptorLoader::new(&provider)
            .load_project(dir.path())
            .unwrap();
        assert_eq!(descriptor.namespace, "com.example.app");
    }

    #[test]
    fn test_load_demo_project() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/flutter_app");
        let provider = droidconf_core::LocalProperties::for_project(&root).unwrap();
        let descriptor = DescriptorLoader::new(&provider)
            .load_project(&root)
            .unwrap();

        assert_eq!(descriptor.namespace, "com.example.flutter_onesignal_example");
        assert_eq!(
            descriptor.default_config.application_id,
            "com.example.hr_management_system"
        );
        assert_eq!(descriptor.default_config.version_name, "1.0.0");
        assert_eq!(
            descriptor.compile_sdk,
            droidconf_core::provider::FLUTTER_COMPILE_SDK
        );
        assert_eq!(
            descriptor.build_type(BuildTypeName::Release).unwrap().signing_config,
            "debug"
        );
    }

    #[test]
    fn test_load_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider();
        let result = DescriptorLoader::new(&provider).load_project(dir.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }
}
