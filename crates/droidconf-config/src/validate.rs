//! Cross-field validation of resolved descriptors.

use crate::ConfigError;
use droidconf_core::dependency::CORE_LIBRARY_DESUGARING;
use droidconf_core::descriptor::DEBUG_SIGNING_CONFIG;
use droidconf_core::identifier::check_package_name;
use droidconf_core::{BuildTypeName, ProjectDescriptor};

/// Highest version code the distribution platform accepts.
pub const MAX_VERSION_CODE: u32 = 2_100_000_000;

/// Check every invariant of a descriptor.
///
/// Returns all violations, in a stable order, rather than stopping at the
/// first one.
pub fn validate(descriptor: &ProjectDescriptor) -> Result<(), Vec<ConfigError>> {
    let mut violations = Vec::new();

    check_identity(descriptor, &mut violations);
    check_versions(descriptor, &mut violations);
    check_compile_options(descriptor, &mut violations);
    check_build_types(descriptor, &mut violations);
    check_signing_configs(descriptor, &mut violations);
    check_dependencies(descriptor, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_identity(descriptor: &ProjectDescriptor, violations: &mut Vec<ConfigError>) {
    // Namespace and application id may differ; each only has to be well-formed.
    if let Err(message) = check_package_name(&descriptor.namespace) {
        violations.push(ConfigError::invalid("android.namespace", message));
    }
    if let Err(message) = check_package_name(&descriptor.default_config.application_id) {
        violations.push(ConfigError::invalid(
            "android.default-config.application-id",
            message,
        ));
    }

    if descriptor.flutter.source.trim().is_empty() {
        violations.push(ConfigError::invalid("flutter.source", "must not be empty"));
    }
}

fn check_versions(descriptor: &ProjectDescriptor, violations: &mut Vec<ConfigError>) {
    let config = &descriptor.default_config;

    if descriptor.compile_sdk == 0 {
        violations.push(ConfigError::invalid(
            "android.compile-sdk",
            "SDK level must be positive",
        ));
    }
    if config.min_sdk == 0 {
        violations.push(ConfigError::invalid(
            "android.default-config.min-sdk",
            "SDK level must be positive",
        ));
    }
    if config.min_sdk > config.target_sdk {
        violations.push(ConfigError::InvalidVersionOrdering {
            min_sdk: config.min_sdk,
            target_sdk: config.target_sdk,
        });
    }

    if config.version_code == 0 || config.version_code > MAX_VERSION_CODE {
        violations.push(ConfigError::invalid(
            "android.default-config.version-code",
            format!(
                "{} is outside 1..={}",
                config.version_code, MAX_VERSION_CODE
            ),
        ));
    }
    if config.version_name.trim().is_empty() {
        violations.push(ConfigError::invalid(
            "android.default-config.version-name",
            "must not be empty",
        ));
    }

    if descriptor
        .ndk_version
        .as_deref()
        .is_some_and(|ndk| ndk.trim().is_empty())
    {
        violations.push(ConfigError::invalid(
            "android.ndk-version",
            "must not be empty",
        ));
    }
}

fn check_compile_options(descriptor: &ProjectDescriptor, violations: &mut Vec<ConfigError>) {
    let options = &descriptor.compile_options;

    if options.target_compatibility < options.source_compatibility {
        violations.push(ConfigError::invalid(
            "android.compile-options.target-compatibility",
            format!(
                "target {} is older than source {}",
                options.target_compatibility, options.source_compatibility
            ),
        ));
    }

    if descriptor.kotlin_options.jvm_target != options.target_compatibility {
        violations.push(ConfigError::invalid(
            "android.kotlin-options.jvm-target",
            format!(
                "{} does not match Java target compatibility {}",
                descriptor.kotlin_options.jvm_target, options.target_compatibility
            ),
        ));
    }
}

fn check_build_types(descriptor: &ProjectDescriptor, violations: &mut Vec<ConfigError>) {
    if !descriptor.build_types.contains_key(&BuildTypeName::Debug) {
        violations.push(ConfigError::MissingField(
            "android.build-types.debug".to_string(),
        ));
    }

    for (name, profile) in &descriptor.build_types {
        let prefix = format!("android.build-types.{}", name);

        if profile.name != *name {
            violations.push(ConfigError::invalid(
                &prefix,
                format!("profile is named '{}'", profile.name),
            ));
        }

        if !descriptor.has_signing_config(&profile.signing_config) {
            violations.push(ConfigError::UnresolvedReference(format!(
                "{}.signing-config names unknown signing configuration '{}'",
                prefix, profile.signing_config
            )));
        }

        if profile.shrink_resources && !profile.minify_enabled {
            violations.push(ConfigError::invalid(
                format!("{}.shrink-resources", prefix),
                "resource shrinking requires minify",
            ));
        }
    }
}

fn check_signing_configs(descriptor: &ProjectDescriptor, violations: &mut Vec<ConfigError>) {
    for (name, config) in &descriptor.signing_configs {
        let prefix = format!("android.signing-configs.{}", name);

        if config.name != *name {
            violations.push(ConfigError::invalid(
                &prefix,
                format!("configuration is named '{}'", config.name),
            ));
        }

        // The debug keystore is generated by the toolchain when not spelled out.
        if name == DEBUG_SIGNING_CONFIG {
            continue;
        }
        if config.store_file.is_none() {
            violations.push(ConfigError::MissingField(format!("{}.store-file", prefix)));
        }
        if config.key_alias.is_none() {
            violations.push(ConfigError::MissingField(format!("{}.key-alias", prefix)));
        }
    }
}

fn check_dependencies(descriptor: &ProjectDescriptor, violations: &mut Vec<ConfigError>) {
    if descriptor.compile_options.core_library_desugaring
        && descriptor
            .dependencies
            .get(CORE_LIBRARY_DESUGARING)
            .is_empty()
    {
        violations.push(ConfigError::MissingField(format!(
            "dependencies.{}",
            CORE_LIBRARY_DESUGARING
        )));
    }

    for (scope, coordinates) in descriptor.dependencies.iter() {
        if scope.trim().is_empty() {
            violations.push(ConfigError::invalid(
                "dependencies",
                "scope name must not be empty",
            ));
        }

        for coordinate in coordinates {
            let parts = [
                ("group", &coordinate.group),
                ("artifact", &coordinate.artifact),
                ("version", &coordinate.version),
            ];
            for (part, value) in parts {
                if value.is_empty() || value.contains(':') {
                    violations.push(ConfigError::invalid(
                        format!("dependencies.{}", scope),
                        format!(
                            "{} of '{}' must be non-empty and free of ':'",
                            part, coordinate
                        ),
                    ));
                }
            }
        }
    }
}
