//! Error types for sigstore-verify

use thiserror::Error;

/// Errors from inclusion promise verification
#[derive(Error, Debug)]
pub enum Error {
    /// Entry carries no log id, or the log id has no key id
    #[error("missing log ID: {0}")]
    MissingLogId(String),

    /// Entry carries no signed entry timestamp
    #[error("missing inclusion promise")]
    MissingInclusionPromise,

    /// Entry's log id is not among the trusted log keys
    #[error("untrusted log: {0}")]
    UntrustedLog(String),

    /// Signed entry timestamp does not verify under the log's key
    #[error("SET verification failed: {0}")]
    SignatureInvalid(String),

    /// Payload cannot be serialized to its canonical form
    #[error("canonicalizing payload: {0}")]
    Encoding(String),

    /// Verification context was cancelled or its deadline passed
    #[error("verification cancelled")]
    Cancelled,

    /// Trusted root could not be obtained
    #[error("trusted root: {0}")]
    TrustRoot(#[from] sigstore_trust_root::Error),
}

impl Error {
    /// Whether the entry lacked a required field (log id or inclusion promise)
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Error::MissingLogId(_) | Error::MissingInclusionPromise)
    }
}

/// Result type for sigstore-verify
pub type Result<T> = std::result::Result<T, Error>;
