//! Configuration types and defaults for promptforge.
//!
//! This module defines enums, constants, and default value functions
//! used by the Config struct.

use serde::{Deserialize, Serialize};

/// Which model provider the CLI constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI-compatible chat-completions endpoint (default).
    #[default]
    Http,
    /// External command reading the request on stdin.
    Command,
}

impl ProviderKind {
    /// Parse a provider kind from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "http" => Some(Self::Http),
            "command" => Some(Self::Command),
            _ => None,
        }
    }
}

/// Groq's OpenAI-compatible chat-completions endpoint.
pub const GROQ_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

// Default value functions for serde
pub(crate) fn default_api_url() -> String {
    GROQ_CHAT_COMPLETIONS_URL.to_string()
}
pub(crate) fn default_model() -> String {
    "llama3-70b-8192".to_string()
}
pub(crate) fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}
pub(crate) fn default_timeout_seconds() -> u64 {
    60
}
pub(crate) fn default_blueprints_dir() -> String {
    "blueprints".to_string()
}
