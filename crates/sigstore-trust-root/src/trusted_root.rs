//! Trusted root types and parsing
//!
//! This module re-exports the official Sigstore protobuf types and provides
//! extension methods for extracting verification keys.

use crate::{Error, Result};
use sigstore_crypto::{compute_log_id, PublicKey, TrustedLogKeys};

// Re-export protobuf types
pub use sigstore_protobuf_specs::dev::sigstore::{
    common::v1::{LogId as ProtoLogId, PublicKey as ProtoPublicKey, TimeRange},
    trustroot::v1::{CertificateAuthority, TransparencyLogInstance, TrustedRoot},
};

/// Source of the Sigstore trusted root consumed by verifiers
pub trait TrustedRootProvider {
    /// Get the trusted root
    fn trusted_root(&self) -> Result<TrustedRoot>;
}

impl TrustedRootProvider for TrustedRoot {
    fn trusted_root(&self) -> Result<TrustedRoot> {
        Ok(self.clone())
    }
}

/// Extension trait for TrustedRoot with helper methods
pub trait TrustedRootExt {
    /// Parse a trusted root from JSON
    fn from_json(json: &str) -> Result<TrustedRoot>;

    /// Load a trusted root from a file
    fn from_file(path: impl AsRef<std::path::Path>) -> Result<TrustedRoot>;

    /// Get the Rekor transparency log keys, keyed by hex log identity
    fn tlog_keys(&self) -> TrustedLogKeys;

    /// Get the Certificate Transparency log keys, keyed by hex log identity
    fn ctlog_keys(&self) -> TrustedLogKeys;

    /// Check if a Rekor log identity (hex) has a usable key in the trusted root
    fn has_tlog_key(&self, log_id: &str) -> bool;
}

impl TrustedRootExt for TrustedRoot {
    fn from_json(json: &str) -> Result<TrustedRoot> {
        Ok(serde_json::from_str(json)?)
    }

    fn from_file(path: impl AsRef<std::path::Path>) -> Result<TrustedRoot> {
        let json = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_json(&json)
    }

    fn tlog_keys(&self) -> TrustedLogKeys {
        collect_log_keys(&self.tlogs)
    }

    fn ctlog_keys(&self) -> TrustedLogKeys {
        collect_log_keys(&self.ctlogs)
    }

    fn has_tlog_key(&self, log_id: &str) -> bool {
        self.tlog_keys().contains(log_id)
    }
}

/// Build the key map for a set of log instances
///
/// Each key is indexed by its recomputed log identity. Instances without a
/// decodable key, or whose declared key id disagrees with the recomputed
/// identity, are skipped.
fn collect_log_keys(instances: &[TransparencyLogInstance]) -> TrustedLogKeys {
    let mut keys = TrustedLogKeys::new();

    for instance in instances {
        let Some(raw_bytes) = instance
            .public_key
            .as_ref()
            .and_then(|pk| pk.raw_bytes.as_ref())
        else {
            tracing::warn!(base_url = %instance.base_url, "skipping log without public key");
            continue;
        };

        let key = match PublicKey::from_der(raw_bytes) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(base_url = %instance.base_url, error = %e, "skipping log key");
                continue;
            }
        };

        let log_id = match compute_log_id(&key) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(base_url = %instance.base_url, error = %e, "skipping log key");
                continue;
            }
        };

        if let Some(declared) = instance.log_id.as_ref().filter(|id| !id.key_id.is_empty()) {
            let declared = hex::encode(&declared.key_id);
            if declared != log_id {
                tracing::warn!(
                    base_url = %instance.base_url,
                    declared = %declared,
                    computed = %log_id,
                    "skipping log whose declared ID does not match its key"
                );
                continue;
            }
        }

        keys.insert_with_id(log_id, key);
    }

    keys
}
