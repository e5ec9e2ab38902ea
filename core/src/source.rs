//! Poem Source
//!
//! Asks a [`CompletionBackend`] for a four-line prophecy woven around a name.
//!
//! The fallible path is [`PoemSource::try_generate`]; [`PoemSource::generate`]
//! absorbs every failure into a random fallback poem, so callers always get a
//! valid [`Poem`] back.

use std::time::Duration;

use crate::backend::{CompletionBackend, CompletionRequest};
use crate::error::FetchError;
use crate::poem::Poem;
use crate::script;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Request parameters for poem generation
#[derive(Clone, Debug)]
pub struct SourceSettings {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Response token cap
    pub max_tokens: u32,
    /// Upper bound on a single request
    pub timeout: Duration,
    /// Skip the remote call entirely
    pub offline: bool,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.8,
            max_tokens: 100,
            timeout: DEFAULT_TIMEOUT,
            offline: false,
        }
    }
}

/// Produces poems from a completion backend, with local fallback
pub struct PoemSource<B: CompletionBackend> {
    backend: B,
    settings: SourceSettings,
}

impl<B: CompletionBackend> PoemSource<B> {
    /// Create a new poem source
    pub fn new(backend: B, settings: SourceSettings) -> Self {
        Self { backend, settings }
    }

    /// Build the completion request for `name`
    pub fn request_for(&self, name: &str) -> CompletionRequest {
        CompletionRequest::new(script::poem_prompt(name), &self.settings.model)
            .with_system(script::SYSTEM_PROMPT)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens)
    }

    /// Request a poem, reporting any failure
    pub async fn try_generate(&self, name: &str) -> Result<Poem, FetchError> {
        if self.settings.offline {
            return Err(FetchError::Offline);
        }

        let request = self.request_for(name);
        let timeout = self.settings.timeout;
        let text = tokio::time::timeout(timeout, self.backend.complete(&request))
            .await
            .map_err(|_| FetchError::Timeout(timeout))??;

        Poem::from_completion(&text)
    }

    /// Request a poem, falling back to a random fixed poem on any failure
    pub async fn generate(&self, name: &str) -> Poem {
        match self.try_generate(name).await {
            Ok(poem) => {
                tracing::info!(backend = self.backend.name(), "Generated poem");
                poem
            }
            Err(FetchError::Offline) => {
                tracing::debug!("Offline mode, using fallback poem");
                Poem::random_fallback()
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "Poem generation failed, using fallback poem"
                );
                Poem::random_fallback()
            }
        }
    }
}
