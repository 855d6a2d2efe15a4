//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for promptforge.
///
/// This struct represents the contents of `promptforge.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Provider settings
    // =========================================================================
    /// Which provider to call.
    #[serde(default)]
    pub provider: ProviderKind,

    /// Chat-completions URL for the `http` provider.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name sent to the provider (also `{model}` in `command`).
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the bearer token for the `http` provider.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-call timeout for either provider.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Command template for the `command` provider (shell-words parsed; no shell).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Extra environment variables for the `command` provider.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    // =========================================================================
    // Store settings
    // =========================================================================
    /// Directory searched by `test` and `blueprint` commands.
    #[serde(default = "default_blueprints_dir")]
    pub blueprints_dir: String,

    /// Glob patterns selecting blueprint files (empty means `*.yaml`, `*.yml`, `*.json`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blueprint_patterns: Vec<String>,

    // =========================================================================
    // Run log
    // =========================================================================
    /// NDJSON file that executions and test runs are appended to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_url: default_api_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
            command: None,
            environment: BTreeMap::new(),
            blueprints_dir: default_blueprints_dir(),
            blueprint_patterns: Vec::new(),
            events_file: None,
        }
    }
}
