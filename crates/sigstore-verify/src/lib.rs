//! Sigstore transparency log entry verification
//!
//! This crate verifies the inclusion promise (Signed Entry Timestamp) of Rekor
//! transparency log entries against a set of trusted log keys.
//!
//! # Example
//!
//! ```no_run
//! use sigstore_verify::{verify_inclusion_promise, VerificationContext};
//! use sigstore_verify::trust_root::{TrustedRoot, TrustedRootExt};
//! use std::time::Duration;
//!
//! # fn example(entry: sigstore_verify::types::TransparencyLogEntry) -> Result<(), Box<dyn std::error::Error>> {
//! let trusted_root = TrustedRoot::from_file("trusted_root.json")?;
//! let keys = trusted_root.tlog_keys();
//!
//! let ctx = VerificationContext::new().with_timeout(Duration::from_secs(5));
//! verify_inclusion_promise(&entry, &keys, &ctx)?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod tlog;

// Re-export core types that users need
pub use sigstore_crypto as crypto;
pub use sigstore_trust_root as trust_root;
pub use sigstore_types as types;

pub use context::VerificationContext;
pub use error::{Error, Result};
pub use sigstore_crypto::compute_log_id;
pub use tlog::{get_log_id, verify_inclusion_promise, LogEntryVerifier, VerificationPayload};
