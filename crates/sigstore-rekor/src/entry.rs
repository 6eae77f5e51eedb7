//! Rekor log entry types

use crate::body::ProposedEntry;
use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use sigstore_types::{InclusionPromise, LogId, TransparencyLogEntry};
use std::collections::HashMap;

/// A log entry from Rekor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// UUID of the entry (the key in the response map, see [`log_entries`])
    #[serde(skip)]
    pub uuid: String,
    /// Body of the entry (base64 encoded)
    pub body: String,
    /// Integrated time (Unix timestamp)
    pub integrated_time: i64,
    /// Log ID (SHA-256 of the public key, hex encoded)
    #[serde(rename = "logID")]
    pub log_id: String,
    /// Log index
    pub log_index: i64,
    /// Verification data
    #[serde(default)]
    pub verification: Option<Verification>,
}

/// Verification data for a log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// Inclusion proof
    #[serde(default)]
    pub inclusion_proof: Option<InclusionProof>,
    /// Signed entry timestamp (SET), base64 encoded
    #[serde(default)]
    pub signed_entry_timestamp: Option<String>,
}

/// Inclusion proof for a log entry (V1 API - uses i64 for indices)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    /// Checkpoint (signed tree head)
    pub checkpoint: String,
    /// Hashes in the proof path, hex encoded
    pub hashes: Vec<String>,
    /// Log index
    pub log_index: i64,
    /// Root hash, hex encoded
    pub root_hash: String,
    /// Tree size
    pub tree_size: i64,
}

/// Response from creating or fetching log entries (map of UUID to LogEntry)
pub type LogEntryResponse = HashMap<String, LogEntry>;

impl LogEntry {
    /// Convert the API entry into a transparency log entry
    ///
    /// The hex log ID, base64 SET and base64 body are decoded, and the kind
    /// and version are read from the decoded body. An entry without a SET
    /// converts to one without an inclusion promise.
    pub fn to_transparency_log_entry(&self) -> Result<TransparencyLogEntry> {
        if self.log_id.is_empty() {
            return Err(Error::MissingField("logID".to_string()));
        }
        let key_id = hex::decode(&self.log_id).map_err(|e| Error::Decode {
            field: "logID",
            reason: e.to_string(),
        })?;

        let inclusion_promise = match self
            .verification
            .as_ref()
            .and_then(|v| v.signed_entry_timestamp.as_deref())
        {
            Some(set) => Some(InclusionPromise {
                signed_entry_timestamp: base64::engine::general_purpose::STANDARD
                    .decode(set)
                    .map_err(|e| Error::Decode {
                        field: "signedEntryTimestamp",
                        reason: e.to_string(),
                    })?,
            }),
            None => None,
        };

        let body = base64::engine::general_purpose::STANDARD
            .decode(&self.body)
            .map_err(|e| Error::Decode {
                field: "body",
                reason: e.to_string(),
            })?;
        let kind_version = ProposedEntry::from_json_bytes(&body)?.kind_version()?;

        Ok(TransparencyLogEntry {
            log_index: self.log_index,
            log_id: Some(LogId { key_id }),
            kind_version: Some(kind_version),
            integrated_time: self.integrated_time,
            inclusion_promise,
            canonicalized_body: body,
            ..Default::default()
        })
    }
}

/// Convert every entry of a Rekor response, ordered by log index
pub fn entries_from_response(response: &LogEntryResponse) -> Result<Vec<TransparencyLogEntry>> {
    let mut entries = response
        .values()
        .map(LogEntry::to_transparency_log_entry)
        .collect::<Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.log_index);
    Ok(entries)
}

/// Take the entries of a Rekor response, with `uuid` set from the map key
pub fn log_entries(response: LogEntryResponse) -> Vec<LogEntry> {
    let mut entries: Vec<_> = response
        .into_iter()
        .map(|(uuid, mut entry)| {
            entry.uuid = uuid;
            entry
        })
        .collect();
    entries.sort_by_key(|e| e.log_index);
    entries
}
