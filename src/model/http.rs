//! OpenAI-compatible chat-completions client.
//!
//! Sends `system` + `user` messages with `response_format: json_object` and
//! returns `choices[0].message.content`. Works with Groq, OpenAI, OpenRouter
//! and local servers that speak the same wire format.

use super::{ModelClient, ModelError, ModelRequest, ModelResponse, ResponseFormat};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ResponseFormatSpec {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormatSpec,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessage>,
}

/// Blocking HTTP client for a chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    client: Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpModelClient {
    /// Build a client with a whole-request timeout.
    pub fn new(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            model: model.into(),
            api_key,
        })
    }

    fn request_body<'a>(&'a self, request: &ModelRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(request.system_prompt.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(request.user_prompt.clone()),
                },
            ],
            temperature: request.temperature,
            response_format: ResponseFormatSpec {
                kind: match request.response_format {
                    ResponseFormat::JsonObject => "json_object",
                },
            },
        }
    }
}

impl ModelClient for HttpModelClient {
    fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        let mut builder = self.client.post(&self.api_url).json(&self.request_body(request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        tracing::debug!(url = %self.api_url, model = %self.model, "sending chat completion");

        let response = builder
            .send()
            .map_err(|e| ModelError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ModelError::Http(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

/// Extract the first choice's message content from a completion body.
fn parse_completion(body: &str) -> Result<ModelResponse, ModelError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Decode(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    Ok(ModelResponse { content })
}
