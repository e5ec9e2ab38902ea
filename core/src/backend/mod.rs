//! Completion Backend Integration
//!
//! Abstracted access to text-generation endpoints through a common trait,
//! so the poem source can run against the real API or a test double.
//!
//! # Available Backends
//!
//! - **OpenAI**: chat-completions compatible endpoint (default)
//!
//! # Usage
//!
//! ```ignore
//! use doomsday_core::backend::{CompletionBackend, CompletionRequest, OpenAiBackend};
//!
//! let backend = OpenAiBackend::new(endpoint, Some(api_key))?;
//! let request = CompletionRequest::new("Write a line", "gpt-3.5-turbo");
//! let text = backend.complete(&request).await?;
//! ```

mod openai;
mod traits;

pub use openai::{OpenAiBackend, DEFAULT_ENDPOINT};
pub use traits::{CompletionBackend, CompletionRequest};
