//! Error types for sigstore-types

use thiserror::Error;

/// Errors produced while reading transparency log entries
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is absent from the entry
    #[error("missing required field: {0}")]
    MissingField(String),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sigstore-types
pub type Result<T> = std::result::Result<T, Error>;
