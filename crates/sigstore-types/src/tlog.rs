//! Transparency log entry types
//!
//! This module re-exports the protobuf transparency log entry and provides
//! the accessors used by inclusion promise verification.

use crate::error::{Error, Result};
use base64::Engine;

// Re-export protobuf types
pub use sigstore_protobuf_specs::dev::sigstore::{
    common::v1::LogId,
    rekor::v1::{InclusionPromise, InclusionProof, KindVersion, TransparencyLogEntry},
};

/// Extension trait for TransparencyLogEntry
pub trait TransparencyLogEntryExt {
    /// Parse an entry from its protobuf JSON form
    fn from_json(json: &str) -> Result<TransparencyLogEntry>;

    /// Serialize the entry to its protobuf JSON form
    fn to_json(&self) -> Result<String>;

    /// Get the hex-encoded key id the entry declares for its log
    ///
    /// This decodes data already present in the entry; it never derives
    /// anything from a public key.
    fn log_id_hex(&self) -> Result<String>;

    /// Get the log key id as base64 string
    fn log_key_id(&self) -> Option<String>;

    /// Get the protobuf text rendering of the entry's log id
    fn log_id_text(&self) -> Option<String>;

    /// Get the signed entry timestamp bytes, if the entry carries a promise
    fn signed_entry_timestamp(&self) -> Option<&[u8]>;

    /// Get the entry kind (e.g. `hashedrekord`)
    fn kind(&self) -> Option<&str>;

    /// Get the entry kind's API version
    fn version(&self) -> Option<&str>;
}

impl TransparencyLogEntryExt for TransparencyLogEntry {
    fn from_json(json: &str) -> Result<TransparencyLogEntry> {
        serde_json::from_str(json).map_err(Error::Json)
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Json)
    }

    fn log_id_hex(&self) -> Result<String> {
        let log_id = self
            .log_id
            .as_ref()
            .ok_or_else(|| Error::MissingField("log_id".to_string()))?;

        if log_id.key_id.is_empty() {
            return Err(Error::MissingField("log_id.key_id".to_string()));
        }

        Ok(hex::encode(&log_id.key_id))
    }

    fn log_key_id(&self) -> Option<String> {
        self.log_id
            .as_ref()
            .map(|id| base64::engine::general_purpose::STANDARD.encode(&id.key_id))
    }

    fn log_id_text(&self) -> Option<String> {
        self.log_id.as_ref().map(log_id_text)
    }

    fn signed_entry_timestamp(&self) -> Option<&[u8]> {
        self.inclusion_promise
            .as_ref()
            .map(|p| p.signed_entry_timestamp.as_slice())
    }

    fn kind(&self) -> Option<&str> {
        self.kind_version.as_ref().map(|kv| kv.kind.as_str())
    }

    fn version(&self) -> Option<&str> {
        self.kind_version.as_ref().map(|kv| kv.version.as_str())
    }
}

/// Render a log id in compact protobuf text format
///
/// The result is `key_id:"<escaped bytes>"`, or the empty string when the key
/// id is empty (text format omits default-valued fields). Bytes are escaped the
/// way the Go protobuf text encoder escapes them: invalid UTF-8 and control
/// characters become `\xNN`, C1 controls become `\u00NN`, everything else is
/// emitted verbatim.
pub fn log_id_text(log_id: &LogId) -> String {
    if log_id.key_id.is_empty() {
        return String::new();
    }

    let mut out = String::from("key_id:\"");
    escape_text_bytes(&log_id.key_id, &mut out);
    out.push('"');
    out
}

fn escape_text_bytes(bytes: &[u8], out: &mut String) {
    let mut i = 0;
    while i < bytes.len() {
        let Some((c, width)) = decode_char(&bytes[i..]) else {
            push_hex_escape(u32::from(bytes[i]), out);
            i += 1;
            continue;
        };

        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => push_hex_escape(c as u32, out),
            c if (0x80..=0x9f).contains(&(c as u32)) => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
        i += width;
    }
}

fn push_hex_escape(value: u32, out: &mut String) {
    out.push_str(&format!("\\x{:02x}", value));
}

/// Decode the first UTF-8 scalar value in `bytes`, if it is well formed
fn decode_char(bytes: &[u8]) -> Option<(char, usize)> {
    let width = match bytes[0] {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return None,
    };
    let chunk = bytes.get(..width)?;
    let s = std::str::from_utf8(chunk).ok()?;
    s.chars().next().map(|c| (c, width))
}
