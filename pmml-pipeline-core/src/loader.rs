//! Descriptor loading from YAML and JSON.

use crate::descriptor::PipelineDescriptor;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Parse a YAML string into a PipelineDescriptor.
///
/// Only decoding happens here; shape and arity checks run during compilation.
pub fn parse_pipeline_yaml(yaml_str: &str) -> Result<PipelineDescriptor> {
    let descriptor: PipelineDescriptor = serde_yaml::from_str(yaml_str)?;
    Ok(descriptor)
}

/// Parse a JSON string into a PipelineDescriptor.
pub fn parse_pipeline_json(json_str: &str) -> Result<PipelineDescriptor> {
    let descriptor: PipelineDescriptor = serde_json::from_str(json_str)?;
    Ok(descriptor)
}

/// Load a descriptor file, choosing the format from its extension.
pub fn load_pipeline_file(path: impl AsRef<Path>) -> Result<PipelineDescriptor> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pipeline descriptor {}", path.display()))?;

    let descriptor = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => parse_pipeline_yaml(&contents),
        Some("json") => parse_pipeline_json(&contents),
        other => bail!(
            "Unsupported pipeline descriptor extension {:?} for {}",
            other.unwrap_or(""),
            path.display()
        ),
    }
    .with_context(|| format!("Failed to parse pipeline descriptor {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        transformers = descriptor.transformers.len(),
        estimator = %descriptor.estimator.name,
        "loaded pipeline descriptor"
    );
    Ok(descriptor)
}
