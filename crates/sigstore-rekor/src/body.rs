//! Rekor entry bodies
//!
//! The canonicalized body of a Rekor entry is the JSON proposed entry that was
//! submitted to the log. Only its type tag is interpreted here; the `spec`
//! payload is left to kind-specific validation.

use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use sigstore_types::KindVersion;

/// A proposed entry as stored in a Rekor entry body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedEntry {
    /// Version of the entry kind's schema
    pub api_version: String,
    /// Entry kind, e.g. `hashedrekord`, `dsse`, `intoto`
    pub kind: String,
    /// Kind-specific content
    #[serde(default)]
    pub spec: serde_json::Value,
}

impl ProposedEntry {
    /// Parse a proposed entry from its JSON bytes
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Parse a proposed entry from base64-encoded JSON
    pub fn from_base64_json(body: &str) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(body)
            .map_err(|e| Error::Decode {
                field: "body",
                reason: e.to_string(),
            })?;
        Self::from_json_bytes(&bytes)
    }

    /// Get the kind and version of this entry
    pub fn kind_version(&self) -> Result<KindVersion> {
        if self.kind.is_empty() {
            return Err(Error::MissingField("kind".to_string()));
        }
        if self.api_version.is_empty() {
            return Err(Error::MissingField("apiVersion".to_string()));
        }
        Ok(KindVersion {
            kind: self.kind.clone(),
            version: self.api_version.clone(),
        })
    }
}
