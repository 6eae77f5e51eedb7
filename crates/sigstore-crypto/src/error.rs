//! Error types for sigstore-crypto

use thiserror::Error;

/// Errors from key handling and signature verification
#[derive(Error, Debug)]
pub enum Error {
    /// Key cannot be serialized to or parsed from its canonical encoding
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Key algorithm is not supported for verification
    #[error("unsupported key: {0}")]
    UnsupportedKey(String),

    /// Cryptographic signature check failed
    #[error("invalid signature: {0}")]
    SignatureInvalid(String),
}

/// Result type for sigstore-crypto
pub type Result<T> = std::result::Result<T, Error>;
