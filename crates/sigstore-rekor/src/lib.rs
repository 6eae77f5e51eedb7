//! Rekor transparency log entries
//!
//! This crate holds the Rekor v1 API entry shape and converts it into the
//! [`TransparencyLogEntry`](sigstore_types::TransparencyLogEntry) consumed by
//! the inclusion promise verifier.

pub mod body;
pub mod entry;
pub mod error;

pub use body::ProposedEntry;
pub use entry::{
    entries_from_response, log_entries, InclusionProof, LogEntry, LogEntryResponse, Verification,
};
pub use error::{Error, Result};
