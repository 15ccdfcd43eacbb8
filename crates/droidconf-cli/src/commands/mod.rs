//! CLI command implementations.

pub mod export;
pub mod show;

use anyhow::{Context, Result};
use droidconf_config::{
    ConfigError, DESCRIPTOR_PATH, DescriptorLoader, VariableContext, VariableContextBuilder,
    validate as check,
};
use droidconf_core::{LocalProperties, VersionProvider};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A Flutter project and the version values its tooling supplies.
pub struct Project {
    root: PathBuf,
    provider: LocalProperties,
    variables: VariableContext,
}

impl Project {
    pub fn open(root: &Path) -> Result<Self> {
        let provider = LocalProperties::for_project(root)
            .with_context(|| format!("Failed to read local.properties under {}", root.display()))?;
        if let Some(path) = provider.path() {
            debug!(path = %path.display(), "Using version values from local.properties");
        }
        Ok(Self {
            root: root.to_path_buf(),
            provider,
            variables: VariableContext::new(),
        })
    }

    /// Add `NAME=VALUE` variables given on the command line.
    pub fn with_defines(mut self, defines: &[String]) -> Result<Self> {
        self.variables = parse_defines(defines)?;
        Ok(self)
    }

    /// Explicit descriptor path, or the conventional one under the root.
    pub fn descriptor_path(&self, path: Option<&Path>) -> PathBuf {
        path.map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.join(DESCRIPTOR_PATH))
    }

    pub fn loader(&self) -> DescriptorLoader<'_> {
        DescriptorLoader::new(&self.provider)
            .with_process_env()
            .with_variables(self.variables.clone())
    }

    pub fn read(&self, path: Option<&Path>) -> Result<(PathBuf, String)> {
        let path = self.descriptor_path(path);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read descriptor: {}", path.display()))?;
        Ok((path, content))
    }

    pub fn provider(&self) -> &dyn VersionProvider {
        &self.provider
    }
}

/// `flutter.<key>` and `env.<key>` land in their namespaces; bare names are
/// custom variables.
fn parse_defines(defines: &[String]) -> Result<VariableContext> {
    let mut builder = VariableContextBuilder::new();

    for define in defines {
        let Some((name, value)) = define.split_once('=') else {
            anyhow::bail!("Invalid define '{}', expected NAME=VALUE", define);
        };
        builder = match name.split_once('.') {
            Some(("flutter", key)) if !key.is_empty() => builder.with_flutter(key, value),
            Some(("env", key)) if !key.is_empty() => builder.with_env(key, value),
            None if !name.is_empty() => builder.with_custom(name, value),
            _ => anyhow::bail!(
                "Invalid define '{}', expected NAME, flutter.NAME or env.NAME",
                define
            ),
        };
    }

    Ok(builder.build())
}

/// Resolve a descriptor and collect every invariant it violates.
pub fn violations(project: &Project, path: Option<&Path>) -> Result<Vec<ConfigError>> {
    let (path, content) = project.read(path)?;

    let descriptor = project
        .loader()
        .resolve(&content)
        .with_context(|| format!("Configuration error in {}", path.display()))?;

    Ok(check(&descriptor).err().unwrap_or_default())
}

pub fn validate(project: &Project, path: Option<&Path>) -> Result<()> {
    let violations = violations(project, path)?;
    if violations.is_empty() {
        println!("Configuration is valid");
        return Ok(());
    }

    for violation in &violations {
        println!("Configuration error: {}", violation);
    }
    anyhow::bail!(
        "{} violation(s) in {}",
        violations.len(),
        project.descriptor_path(path).display()
    );
}

pub fn versions(project: &Project, path: Option<&Path>) -> Result<()> {
    let provider = project.provider();
    let rows = [
        ("compileSdkVersion", provider.compile_sdk().map(|v| v.to_string())),
        ("minSdkVersion", provider.min_sdk().map(|v| v.to_string())),
        ("targetSdkVersion", provider.target_sdk().map(|v| v.to_string())),
        ("versionCode", provider.version_code().map(|v| v.to_string())),
        ("versionName", provider.version_name()),
        ("ndkVersion", provider.ndk_version()),
    ];

    // Referencing the descriptor is optional here; a missing file just means
    // no usage markers.
    let referenced = match project.read(path) {
        Ok((_, content)) => VariableContext::references(&content),
        Err(e) => {
            debug!(error = %e, "Descriptor not readable, skipping reference scan");
            Vec::new()
        }
    };

    for (name, value) in rows {
        let key = format!("flutter.{}", name);
        let marker = if referenced.contains(&key) { "*" } else { " " };
        println!(
            "{} {:<26} {}",
            marker,
            key,
            value.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
