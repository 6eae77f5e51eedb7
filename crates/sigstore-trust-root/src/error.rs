//! Error types for sigstore-trust-root

use thiserror::Error;

/// Errors from trusted root handling and TUF synchronization
#[derive(Error, Debug)]
pub enum Error {
    /// Cache kind value is not recognized
    #[error("unknown cache type: {0}")]
    UnknownCacheType(String),

    /// Disk cache selected without a location
    #[error("unknown cache location: disk cache requires a path")]
    MissingCacheLocation,

    /// Remote repository URI cannot be used
    #[error("invalid remote URI {uri}: {reason}")]
    InvalidRemoteUri {
        /// The URI as configured
        uri: String,
        /// Why it was rejected
        reason: String,
    },

    /// Remote metadata failed signature, threshold, version or expiry checks
    #[error("TUF metadata verification failed: {0}")]
    MetadataVerificationFailed(String),

    /// Fetching from the remote failed
    #[error("TUF transport error: {0}")]
    Transport(String),

    /// Operation requires a successful `initialize`
    #[error("trust root client must be initialized before usage")]
    NotInitialized,

    /// Target is not listed in the verified targets metadata
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// Other TUF client error
    #[error("TUF error: {0}")]
    Tuf(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sigstore-trust-root
pub type Result<T> = std::result::Result<T, Error>;
