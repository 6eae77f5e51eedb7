//! Cryptographic primitives for Sigstore verification
//!
//! This crate provides:
//! - [`PublicKey`], the verification capability for transparency log keys
//!   (ECDSA P-256 with SHA-256 and Ed25519)
//! - [`compute_log_id`], the SHA-256 log identity of a DER-encoded key
//! - [`TrustedLogKeys`], the mapping from log identity to key that the
//!   inclusion promise verifier consults
//!
//! # Example
//!
//! ```
//! use sigstore_crypto::{compute_log_id, PublicKey};
//!
//! let pem = "-----BEGIN PUBLIC KEY-----
//! MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE2G2Y+2tabdTV5BcGiBIx0a9fAFwr
//! kBbmLSGtks4L3qX6yYY0zufBnhC8Ur/iy55GhWP/9A/bY2LhC30M9+RYtw==
//! -----END PUBLIC KEY-----";
//! let key = PublicKey::from_pem(pem).unwrap();
//! assert_eq!(
//!     compute_log_id(&key).unwrap(),
//!     "c0d23d6ad406973f9559f3ba2d1ca01f84147d8ffc5b8445c224f98b9591801d"
//! );
//! ```

pub mod error;
pub mod hash;
pub mod key;
pub mod keyring;

pub use error::{Error, Result};
pub use hash::sha256;
pub use key::{compute_log_id, PublicKey, SigningScheme};
pub use keyring::TrustedLogKeys;
