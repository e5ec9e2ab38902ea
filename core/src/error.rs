//! Poem fetch errors
//!
//! Every way a remote poem request can fail. None of these reach the user:
//! the poem source turns each of them into a fallback poem.

use std::time::Duration;

use thiserror::Error;

use crate::poem::POEM_LINES;

/// Errors from requesting a generated poem
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("Completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("Completion endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: reqwest::StatusCode,
        /// Response body (possibly empty)
        body: String,
    },

    /// Payload did not have the expected shape
    #[error("Malformed completion payload: {0}")]
    Malformed(String),

    /// Completion did not contain enough non-blank lines
    #[error("Completion had {found} usable lines, expected {}", POEM_LINES)]
    TooFewLines {
        /// Non-blank lines found
        found: usize,
    },

    /// No API key configured
    #[error("No API key configured")]
    MissingApiKey,

    /// Remote generation disabled
    #[error("Offline mode - remote generation skipped")]
    Offline,

    /// Request did not settle in time
    #[error("Completion request timed out after {0:?}")]
    Timeout(Duration),
}
