use anyhow::Context;
use std::path::Path;
use tracing::info;

use super::types::Manifest;

/// Serialization format of a manifest document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// `.yaml` / `.yml` are YAML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => ManifestFormat::Yaml,
            _ => ManifestFormat::Json,
        }
    }
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: impl AsRef<Path>) -> anyhow::Result<Manifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest = parse_manifest(&content, ManifestFormat::from_path(path))
        .with_context(|| format!("Invalid manifest {}", path.display()))?;

    info!(
        manifest = %path.display(),
        actions = manifest.actions.len(),
        interceptors = manifest.interceptors.len(),
        stacks = manifest.stacks.len(),
        aop_rules = manifest.aop.len(),
        "Manifest loaded"
    );
    Ok(manifest)
}

/// Parse manifest text.
pub fn parse_manifest(content: &str, format: ManifestFormat) -> anyhow::Result<Manifest> {
    let manifest = match format {
        ManifestFormat::Yaml => serde_yaml::from_str(content)?,
        ManifestFormat::Json => serde_json::from_str(content)?,
    };
    Ok(manifest)
}
