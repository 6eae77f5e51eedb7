//! Core types for Sigstore transparency log verification
//!
//! Transparency log entry types are re-exported from the official Sigstore
//! protobuf specs, with extension traits providing the accessors the
//! verifier needs.

pub mod error;
pub mod tlog;

pub use error::{Error, Result};
pub use tlog::{
    log_id_text, InclusionPromise, InclusionProof, KindVersion, LogId, TransparencyLogEntry,
    TransparencyLogEntryExt,
};
