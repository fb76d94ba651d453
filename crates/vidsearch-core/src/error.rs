//! Error types for the video search client
//!
//! These errors never cross the public query boundary: the client folds
//! them into an error page (see [`crate::types::ApiError`]). They are still
//! returned by the lower layers so [`crate::Transport`] implementations and
//! the parser can use `?` freely.

use thiserror::Error;

/// Error type for transport and parsing operations
#[derive(Error, Debug)]
pub enum VidsearchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body was not a readable XML document
    #[error("Failed to parse XML: {0}")]
    ParseError(String),

    /// Request URL could not be built from the configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Rate limited by server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Endpoint not found on server
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<xmltree::ParseError> for VidsearchError {
    fn from(error: xmltree::ParseError) -> Self {
        VidsearchError::ParseError(error.to_string())
    }
}

/// Result type alias for transport and parsing operations
pub type Result<T> = std::result::Result<T, VidsearchError>;
