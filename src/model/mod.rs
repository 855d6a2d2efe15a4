//! Language model providers.
//!
//! The executor only sees the [`ModelClient`] trait: one synchronous call
//! that returns the completion text, or nothing. Providers do not retry;
//! retries in promptforge are semantic and live in the executor.
//!
//! - **Http**: OpenAI-compatible chat-completions endpoint (Groq by default)
//! - **Command**: any CLI that reads the request as JSON on stdin and prints
//!   the completion on stdout

mod command;
mod http;

pub use command::CommandModelClient;
pub use http::HttpModelClient;

use crate::error::ForgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sampling temperature used for every attempt.
pub const DETERMINISTIC_TEMPERATURE: f32 = 0.0;

/// Requested shape of the completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonObject,
}

/// One model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

impl ModelRequest {
    /// A JSON-object request at temperature 0.
    pub fn json(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: DETERMINISTIC_TEMPERATURE,
            response_format: ResponseFormat::JsonObject,
        }
    }
}

/// What the provider returned. `content` is `None` when nothing came back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub content: Option<String>,
}

impl ModelResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn empty() -> Self {
        Self { content: None }
    }

    /// The content if it is present and non-empty.
    pub fn usable_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

/// Provider-level failure. Always fatal for an execution.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The provider could not be configured (missing key, bad command).
    #[error("provider misconfigured: {0}")]
    Config(String),

    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Http(String),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider's envelope could not be decoded.
    #[error("could not decode provider response: {0}")]
    Decode(String),

    /// The provider command failed to run or exited unsuccessfully.
    #[error("provider command failed: {0}")]
    Process(String),

    /// The provider command exceeded its timeout.
    #[error("provider command timed out after {0}s")]
    Timeout(u64),
}

impl From<ModelError> for ForgeError {
    fn from(err: ModelError) -> Self {
        ForgeError::Transport(err.to_string())
    }
}

/// A language model that can complete one request.
///
/// Implementations must be shareable across threads; an executor holds no
/// other state, so independent executions can run in parallel.
pub trait ModelClient: Send + Sync {
    fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError>;
}

impl<T: ModelClient + ?Sized> ModelClient for Box<T> {
    fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        (**self).complete(request)
    }
}

impl<T: ModelClient + ?Sized> ModelClient for &T {
    fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        (**self).complete(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_request_defaults() {
        let req = ModelRequest::json("sys", "TASK: x");
        assert_eq!(req.temperature, 0.0);
        assert_eq!(req.response_format, ResponseFormat::JsonObject);
    }

    #[test]
    fn test_request_serializes_in_camel_case() {
        let req = ModelRequest::json("sys", "user");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "systemPrompt": "sys",
                "userPrompt": "user",
                "temperature": 0.0,
                "responseFormat": "json_object"
            })
        );
    }

    #[test]
    fn test_usable_content() {
        assert_eq!(ModelResponse::text("{}").usable_content(), Some("{}"));
        assert_eq!(ModelResponse::text("").usable_content(), None);
        assert_eq!(ModelResponse::empty().usable_content(), None);
    }

    #[test]
    fn test_model_error_becomes_transport_failure() {
        let err: ForgeError = ModelError::Status {
            status: 503,
            body: "overloaded".to_string(),
        }
        .into();
        assert!(matches!(err, ForgeError::Transport(_)));
        assert!(err.to_string().contains("HTTP 503"));
    }
}
