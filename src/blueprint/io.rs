//! Blueprint loading from YAML or JSON files.

use super::types::Blueprint;
use crate::error::{ForgeError, Result};
use std::path::Path;

/// On-disk encoding of a blueprint file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlueprintFormat {
    Yaml,
    Json,
}

impl BlueprintFormat {
    /// Pick the format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl Blueprint {
    /// Load and validate a blueprint file.
    ///
    /// Files with an unrecognized extension are parsed as YAML, which also
    /// accepts JSON documents.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path.as_ref(), |_| {})
    }

    /// Load a blueprint file, letting `prepare` fill in defaults before validation.
    pub(crate) fn load_with(path: &Path, prepare: impl FnOnce(&mut Blueprint)) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ForgeError::UserError(format!(
                "failed to read blueprint '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut blueprint = match BlueprintFormat::from_path(path) {
            Some(BlueprintFormat::Json) => Self::parse_json(&content),
            _ => Self::parse_yaml(&content),
        }
        .map_err(|e| ForgeError::UserError(format!("{} ({})", e, path.display())))?;

        prepare(&mut blueprint);
        blueprint
            .validate()
            .map_err(|e| ForgeError::UserError(format!("{} ({})", e, path.display())))?;

        tracing::debug!(
            path = %path.display(),
            id = %blueprint.id,
            rules = blueprint.rules.len(),
            tests = blueprint.tests.len(),
            "loaded blueprint"
        );
        Ok(blueprint)
    }

    /// Parse a blueprint from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let blueprint = Self::parse_yaml(yaml)?;
        blueprint.validate()?;
        Ok(blueprint)
    }

    /// Parse a blueprint from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let blueprint = Self::parse_json(json)?;
        blueprint.validate()?;
        Ok(blueprint)
    }

    fn parse_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| ForgeError::UserError(format!("failed to parse blueprint YAML: {}", e)))
    }

    fn parse_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ForgeError::UserError(format!("failed to parse blueprint JSON: {}", e)))
    }

    /// Serialize to pretty JSON (the shape the `/execute` boundary accepts).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ForgeError::UserError(format!("failed to serialize blueprint: {}", e)))
    }
}
