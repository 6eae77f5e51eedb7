//! Error types for sigstore-rekor

use thiserror::Error;

/// Errors from decoding Rekor log entries
#[derive(Error, Debug)]
pub enum Error {
    /// A hex or base64 field could not be decoded
    #[error("decoding {field}: {reason}")]
    Decode {
        /// Name of the wire field
        field: &'static str,
        /// Decoder error
        reason: String,
    },

    /// A required field is absent or empty
    #[error("missing required field: {0}")]
    MissingField(String),

    /// JSON parsing failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sigstore-rekor
pub type Result<T> = std::result::Result<T, Error>;
