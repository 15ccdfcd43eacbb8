//! Resolved descriptor display.

use super::Project;
use anyhow::{Context, Result};
use droidconf_core::ProjectDescriptor;
use std::path::Path;

/// Load a descriptor and print it with signing passwords masked.
pub fn show(project: &Project, path: Option<&Path>, json: bool) -> Result<()> {
    let (path, content) = project.read(path)?;
    let descriptor = project
        .loader()
        .load(&content)
        .with_context(|| format!("Failed to load descriptor: {}", path.display()))?;
    let descriptor = masked(descriptor);

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        print_summary(&descriptor);
    }

    Ok(())
}

/// Replace every signing password with a placeholder.
pub fn masked(mut descriptor: ProjectDescriptor) -> ProjectDescriptor {
    for config in descriptor.signing_configs.values_mut() {
        *config = config.masked();
    }
    descriptor
}

fn print_summary(descriptor: &ProjectDescriptor) {
    let config = &descriptor.default_config;
    let options = &descriptor.compile_options;

    println!("Namespace:       {}", descriptor.namespace);
    println!("Application ID:  {}", config.application_id);
    println!(
        "Version:         {} ({})",
        config.version_name, config.version_code
    );
    println!(
        "SDK:             min {} / target {} / compile {}",
        config.min_sdk, config.target_sdk, descriptor.compile_sdk
    );
    if let Some(ndk) = &descriptor.ndk_version {
        println!("NDK:             {}", ndk);
    }
    println!(
        "Java:            source {} / target {} / kotlin {}{}",
        options.source_compatibility,
        options.target_compatibility,
        descriptor.kotlin_options.jvm_target,
        if options.core_library_desugaring {
            " (desugaring)"
        } else {
            ""
        }
    );

    println!("\nBuild types:");
    for profile in descriptor.build_types.values() {
        println!(
            "  {:<8} signing={} minify={} shrink-resources={}",
            profile.name, profile.signing_config, profile.minify_enabled, profile.shrink_resources
        );
    }

    if !descriptor.dependencies.is_empty() {
        println!("\nDependencies:");
        for (scope, coordinates) in descriptor.dependencies.iter() {
            for coordinate in coordinates {
                println!("  {} {}", scope, coordinate);
            }
        }
    }
}
