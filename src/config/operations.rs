//! Config loading, validation, and provider construction.

use super::model::Config;
use super::types::ProviderKind;
use crate::error::{ForgeError, Result};
use crate::model::{CommandModelClient, HttpModelClient, ModelClient};
use std::path::Path;
use std::time::Duration;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "promptforge.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ForgeError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ForgeError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path`, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as null.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| ForgeError::UserError(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ForgeError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `timeout_seconds` must be positive
    /// - `model` must be non-empty
    /// - `api_url` must be an http(s) URL when the provider is `http`
    /// - `command` must be set and non-blank when the provider is `command`
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(ForgeError::UserError(
                "config validation failed: timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ForgeError::UserError(
                "config validation failed: model must not be empty".to_string(),
            ));
        }

        match self.provider {
            ProviderKind::Http => {
                if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
                    return Err(ForgeError::UserError(format!(
                        "config validation failed: api_url must be an http(s) URL (found '{}')",
                        self.api_url
                    )));
                }
            }
            ProviderKind::Command => {
                if self.command.as_deref().is_none_or(|c| c.trim().is_empty()) {
                    return Err(ForgeError::UserError(
                        "config validation failed: provider 'command' requires a command"
                            .to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Construct the configured model client.
    ///
    /// For the `http` provider the API key is read from `api_key_env`; a
    /// missing key is not an error here, since some endpoints need none.
    pub fn model_client(&self) -> Result<Box<dyn ModelClient>> {
        match self.provider {
            ProviderKind::Http => {
                let api_key = std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.is_empty());
                if api_key.is_none() {
                    tracing::warn!(env = %self.api_key_env, "API key variable is not set");
                }
                let client =
                    HttpModelClient::new(&self.api_url, &self.model, api_key, self.timeout())?;
                Ok(Box::new(client))
            }
            ProviderKind::Command => {
                let command = self.command.clone().ok_or_else(|| {
                    ForgeError::UserError("provider 'command' requires a command".to_string())
                })?;
                let client = CommandModelClient::new(command, &self.model, self.timeout())
                    .with_environment(self.environment.clone().into_iter().collect());
                Ok(Box::new(client))
            }
        }
    }
}
