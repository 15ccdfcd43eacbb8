//! Canonical descriptor export.

use super::Project;
use anyhow::{Context, Result};
use droidconf_config::serialize;
use std::path::Path;
use tracing::info;

/// Load a descriptor and write its canonical form with every variable resolved.
pub fn export(project: &Project, path: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let (path, content) = project.read(path)?;
    let descriptor = project
        .loader()
        .load(&content)
        .with_context(|| format!("Failed to load descriptor: {}", path.display()))?;

    let text = serialize(&descriptor);

    match output {
        Some(output) => {
            std::fs::write(output, &text)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(path = %output.display(), "Wrote canonical descriptor");
        }
        None => print!("{}", text),
    }

    Ok(())
}
