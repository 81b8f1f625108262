//! Machine-readable export of a documentation project.
//!
//! The exported structure mirrors the document model: books keyed by name,
//! each holding chapters and their sections with flattened request and
//! response rows.

use crate::schema::Project;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a project to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(project: &Project) -> Result<String> {
    debug!("Serializing project {} to YAML", project.id);
    serde_yaml::to_string(project).context("Failed to serialize project to YAML")
}

/// Serializes a project to pretty-printed JSON.
///
/// Field order follows the document model, so diffs between runs stay small.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(project: &Project) -> Result<String> {
    debug!("Serializing project {} to JSON", project.id);
    serde_json::to_string_pretty(project).context("Failed to serialize project to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// Overwrites the file if it already exists.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
