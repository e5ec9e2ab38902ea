//! OpenAI Backend Implementation
//!
//! Completion backend for OpenAI-compatible chat-completion endpoints.
//!
//! # Chat Completions API
//!
//! `POST /v1/chat/completions` with a JSON body of the form
//!
//! ```text
//! { "model": ..., "messages": [{"role": "system", ...}, {"role": "user", ...}],
//!   "temperature": 0.8, "max_tokens": 100 }
//! ```
//!
//! and a bearer token. The answer text lives at `choices[0].message.content`.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::traits::{CompletionBackend, CompletionRequest};
use crate::error::FetchError;

/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI backend client
pub struct OpenAiBackend {
    /// Full chat-completions URL
    endpoint: String,
    /// Bearer token
    api_key: Option<SecretString>,
    /// HTTP client
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiBackend {
    /// Create a new OpenAI backend
    pub fn new(endpoint: impl Into<String>, api_key: Option<SecretString>) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key,
            http_client,
        })
    }

    /// Endpoint this backend posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a bearer token is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the JSON body for a request
    fn build_body(request: &CompletionRequest) -> ChatRequest<'_> {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: (request.max_tokens > 0).then_some(request.max_tokens),
        }
    }

    /// Pull the assistant text out of a response body
    fn extract_content(body: &str) -> Result<String, FetchError> {
        let response: ChatResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::Malformed("response has no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| FetchError::Malformed("first choice has no content".to_string()))
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, FetchError> {
        let api_key = self.api_key.as_ref().ok_or(FetchError::MissingApiKey)?;

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(&Self::build_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }

        tracing::debug!(bytes = body.len(), "Received completion");
        Self::extract_content(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_backend_creation() {
        let backend = OpenAiBackend::new(DEFAULT_ENDPOINT, None).unwrap();
        assert_eq!(backend.endpoint(), DEFAULT_ENDPOINT);
        assert!(!backend.has_api_key());
        assert_eq!(backend.name(), "OpenAI");
    }

    #[test]
    fn test_build_body() {
        let request = CompletionRequest::new("Write about Nova", "gpt-3.5-turbo")
            .with_system("You are an oracle")
            .with_temperature(0.8)
            .with_max_tokens(100);

        let body = serde_json::to_value(OpenAiBackend::build_body(&request)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "You are an oracle"},
                    {"role": "user", "content": "Write about Nova"},
                ],
                "temperature": 0.8f32,
                "max_tokens": 100,
            })
        );
    }

    #[test]
    fn test_build_body_without_system_or_limit() {
        let request = CompletionRequest::new("Hi", "m");
        let body = serde_json::to_value(OpenAiBackend::build_body(&request)).unwrap();

        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"a\nb\nc\nd"}}]}"#;
        assert_eq!(OpenAiBackend::extract_content(body).unwrap(), "a\nb\nc\nd");
    }

    #[test]
    fn test_extract_content_malformed() {
        for body in [
            "not json",
            r#"{"choices":[]}"#,
            r#"{"error":{"message":"quota"}}"#,
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        ] {
            let err = OpenAiBackend::extract_content(body).unwrap_err();
            assert!(matches!(err, FetchError::Malformed(_)), "body: {body}");
        }
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() {
        let backend = OpenAiBackend::new("http://127.0.0.1:9/unused", None).unwrap();
        let err = backend
            .complete(&CompletionRequest::new("x", "m"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::MissingApiKey));
    }
}
