//! Completion Backend Traits
//!
//! Trait definitions for text-generation backends. The poem source only
//! needs "send a prompt, get text back"; provider details (wire format,
//! auth) stay inside each implementation.

use async_trait::async_trait;

use crate::error::FetchError;

/// A single completion request
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    /// The user prompt
    pub prompt: String,
    /// Model to use (backend-specific identifier)
    pub model: String,
    /// System prompt (optional, sent before the user prompt)
    pub system: Option<String>,
    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,
    /// Maximum tokens in the response (0 = backend default)
    pub max_tokens: u32,
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            model: String::new(),
            system: None,
            temperature: 0.8,
            max_tokens: 0,
        }
    }
}

impl CompletionRequest {
    /// Create a new request with prompt and model
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set system prompt
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set max tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Completion backend trait
///
/// Implement this trait to generate poems from a different provider.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Get the backend name (e.g., "OpenAI")
    fn name(&self) -> &str;

    /// Send a request and wait for the complete response text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new("Hello", "gpt-3.5-turbo")
            .with_temperature(0.8)
            .with_system("You are an oracle")
            .with_max_tokens(100);

        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.model, "gpt-3.5-turbo");
        assert!((request.temperature - 0.8).abs() < f32::EPSILON);
        assert_eq!(request.system, Some("You are an oracle".to_string()));
        assert_eq!(request.max_tokens, 100);
    }

    #[test]
    fn test_temperature_is_clamped() {
        let request = CompletionRequest::new("x", "m").with_temperature(5.0);
        assert!((request.temperature - 2.0).abs() < f32::EPSILON);
    }
}
