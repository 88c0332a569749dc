//! Two-tier summary generation.
//!
//! Tier 1 sends a clinical prompt to a remote text-generation endpoint.
//! Tier 2 composes a fixed-format summary from the rule-based inference.
//! Any tier-1 failure falls through to tier 2; `SummaryGenerator::generate`
//! itself cannot fail.

pub mod client;
pub mod fallback;
pub mod generator;
pub mod openai;
pub mod prompt;
pub mod proxy;

pub use client::*;
pub use fallback::*;
pub use generator::*;
pub use openai::*;
pub use prompt::*;
pub use proxy::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("API key not configured")]
    MissingCredential,

    #[error("Remote summary is disabled")]
    Disabled,

    #[error("Summary endpoint is not reachable at {0}")]
    Connection(String),

    #[error("Summary request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Summary endpoint returned error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed summary response: {0}")]
    MalformedResponse(String),

    #[error("Summary endpoint returned an empty summary")]
    EmptySummary,
}

impl SummaryError {
    /// Configuration problems, as opposed to a remote that misbehaved.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::Disabled)
    }

    pub(crate) fn from_reqwest(e: reqwest::Error, base_url: &str, timeout_secs: u64) -> Self {
        if e.is_connect() {
            Self::Connection(base_url.to_string())
        } else if e.is_timeout() {
            Self::Timeout(timeout_secs)
        } else {
            Self::HttpClient(e.to_string())
        }
    }
}

/// Build the shared HTTP client for remote summary calls.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, SummaryError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SummaryError::HttpClient(e.to_string()))
}

/// Trim the returned body and reject whitespace-only text.
pub(crate) fn non_empty_summary(text: &str) -> Result<String, SummaryError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(SummaryError::EmptySummary)
    } else {
        Ok(trimmed.to_string())
    }
}
