//! Error types shared by the catalogue client and the rating storage.

use thiserror::Error;

/// Errors produced while fetching the catalogue or touching local storage.
///
/// None of these are fatal to the UI: callers log them and fall back to an
/// empty or unchanged state.
#[derive(Debug, Error)]
pub enum FoodyError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code.
    #[error("Catalogue endpoint returned {status}: {body}")]
    Status {
        /// Response status code
        status: reqwest::StatusCode,
        /// Response body (may be empty)
        body: String,
    },

    /// The response or a stored value was not the JSON shape we expect.
    #[error("Malformed JSON: {0}")]
    Decode(String),

    /// Reading or writing a storage file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used across the crate's library-style modules.
pub type Result<T> = std::result::Result<T, FoodyError>;
