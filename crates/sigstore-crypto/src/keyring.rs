//! Trusted transparency log keys

use crate::error::Result;
use crate::key::{compute_log_id, PublicKey};
use std::collections::HashMap;

/// Mapping from hex-encoded log identity to the log's verification key
///
/// Built from a trusted root and passed by value or reference into each
/// verification call. Verification only reads it.
#[derive(Debug, Clone, Default)]
pub struct TrustedLogKeys {
    keys: HashMap<String, PublicKey>,
}

impl TrustedLogKeys {
    /// Create an empty key map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key under its computed log identity and return that identity
    pub fn insert(&mut self, key: PublicKey) -> Result<String> {
        let log_id = compute_log_id(&key)?;
        tracing::debug!(log_id = %log_id, scheme = key.scheme().as_str(), "trusting log key");
        self.keys.insert(log_id.clone(), key);
        Ok(log_id)
    }

    /// Add a key under an explicit log identity
    pub fn insert_with_id(&mut self, log_id: impl Into<String>, key: PublicKey) {
        self.keys.insert(log_id.into(), key);
    }

    /// Look up the key for a hex-encoded log identity
    pub fn get(&self, log_id: &str) -> Option<&PublicKey> {
        self.keys.get(log_id)
    }

    /// Check if a log identity is trusted
    pub fn contains(&self, log_id: &str) -> bool {
        self.keys.contains_key(log_id)
    }

    /// Iterate over the trusted log identities
    pub fn log_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Number of trusted logs
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if no log is trusted
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<(String, PublicKey)> for TrustedLogKeys {
    fn from_iter<I: IntoIterator<Item = (String, PublicKey)>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> PublicKey {
        PublicKey::from(*p256::ecdsa::SigningKey::from_slice(&[seed; 32])
            .unwrap()
            .verifying_key())
    }

    #[test]
    fn test_insert_uses_computed_log_id() {
        let mut keys = TrustedLogKeys::new();
        let log_id = keys.insert(key(0x11)).unwrap();

        assert_eq!(log_id, compute_log_id(&key(0x11)).unwrap());
        assert!(keys.contains(&log_id));
        assert_eq!(keys.get(&log_id), Some(&key(0x11)));
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_empty() {
        let keys = TrustedLogKeys::new();
        assert!(keys.is_empty());
        assert_eq!(keys.len(), 0);
        assert!(keys.get("c0d23d6a").is_none());
    }

    #[test]
    fn test_from_iter() {
        let keys: TrustedLogKeys = vec![
            ("aa".to_string(), key(0x11)),
            ("bb".to_string(), key(0x22)),
        ]
        .into_iter()
        .collect();
        let mut ids: Vec<_> = keys.log_ids().collect();
        ids.sort();
        assert_eq!(ids, vec!["aa", "bb"]);
        assert_eq!(keys.len(), 2);
        assert!(!keys.is_empty());
    }
}
