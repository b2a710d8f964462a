//! # Descriptor File Loading
//!
//! Reads descriptor files from disk. Both shapes collaborators produce are
//! accepted: a `{"treeNodes": [...]}` document or a bare descriptor array,
//! written as JSON (`.json`) or YAML (`.yaml`, `.yml`).

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use dmt_core::{DescriptorInput, NodeDescriptor};
use dmt_tree::Tree;

/// Supported descriptor file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Format by file extension (case-insensitive).
    pub fn of(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => bail!(
                "{}: unsupported descriptor file type (expected .json, .yaml or .yml)",
                path.display()
            ),
        }
    }
}

/// Parse descriptor file content of the given format.
pub fn parse_descriptors(content: &str, format: Format) -> Result<Vec<NodeDescriptor>> {
    let value: Value = match format {
        Format::Json => serde_json::from_str(content).context("invalid JSON")?,
        Format::Yaml => serde_yaml::from_str(content).context("invalid YAML")?,
    };
    let input: DescriptorInput = serde_json::from_value(value)
        .context("expected a descriptor list or a document with a treeNodes list")?;
    Ok(input.into_descriptors())
}

/// Read the descriptors of a file.
pub fn read_descriptors(path: &Path) -> Result<Vec<NodeDescriptor>> {
    let format = Format::of(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading descriptor file: {}", path.display()))?;
    let descriptors = parse_descriptors(&content, format)
        .with_context(|| format!("parsing descriptor file: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        descriptors = descriptors.len(),
        "loaded descriptors"
    );
    Ok(descriptors)
}

/// Read and build a tree. A rejected schema keeps its
/// [`ValidationReport`](dmt_core::ValidationReport) in the error chain.
pub fn load_tree(path: &Path) -> Result<Tree> {
    let descriptors = read_descriptors(path)?;
    Tree::build(descriptors)
        .with_context(|| format!("{} is not a valid data model tree", path.display()))
}
