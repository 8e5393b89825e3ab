//! Error types for the review collection pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Errors that can occur while generating, searching, or writing reviews.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Required configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream service answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Request could not be signed.
    #[error("Failed to sign request: {0}")]
    Signing(String),

    /// Model output did not contain the expected JSON.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a fetched page.
    #[error("Failed to parse page: {0}")]
    Parse(String),
}

impl ReviewError {
    /// Returns true for failures talking to an external service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ReviewError::Http(_) | ReviewError::Status { .. } | ReviewError::Signing(_)
        )
    }
}
