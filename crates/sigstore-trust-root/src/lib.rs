//! Sigstore trusted root parsing and management
//!
//! This crate provides the trust anchors used to verify Rekor transparency log
//! entries. The trusted root lists every Rekor and Certificate Transparency
//! log with its public key; [`TrustedRootExt::tlog_keys`] turns it into the
//! key map consumed by inclusion promise verification.
//!
//! # Features
//!
//! - `tuf` (default) - Enable TUF (The Update Framework) support for securely fetching
//!   the trusted root from a Sigstore TUF repository with [`TrustRootClient`].
//!
//! # Example
//!
//! Load a trusted root that was obtained out of band:
//!
//! ```no_run
//! use sigstore_trust_root::{TrustedRoot, TrustedRootExt};
//!
//! let root = TrustedRoot::from_file("trusted_root.json").unwrap();
//! for log_id in root.tlog_keys().log_ids() {
//!     println!("trusted log {}", log_id);
//! }
//! ```

pub mod error;
pub mod trusted_root;

#[cfg(feature = "tuf")]
pub mod options;
#[cfg(feature = "tuf")]
pub mod store;
#[cfg(feature = "tuf")]
pub mod tuf;

pub use error::{Error, Result};
pub use trusted_root::{
    CertificateAuthority, ProtoLogId, ProtoPublicKey, TimeRange, TransparencyLogInstance,
    TrustedRoot, TrustedRootExt, TrustedRootProvider,
};

#[cfg(feature = "tuf")]
pub use options::{
    CacheKind, ClientOptions, RepositoryOptions, DEFAULT_TUF_URL, STAGING_TUF_URL,
    TRUSTED_ROOT_TARGET,
};
#[cfg(feature = "tuf")]
pub use store::{LocalStore, RemoteStore};
#[cfg(feature = "tuf")]
pub use tuf::TrustRootClient;
