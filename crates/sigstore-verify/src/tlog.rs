//! Transparency log verification
//!
//! This module handles verification of the inclusion promise (SET, Signed
//! Entry Timestamp) a Rekor log attaches to each entry. The SET is the log's
//! signature over the RFC 8785 canonical JSON of [`VerificationPayload`].

use crate::context::VerificationContext;
use crate::error::{Error, Result};
use base64::Engine;
use serde::Serialize;
use sigstore_crypto::TrustedLogKeys;
use sigstore_trust_root::{TrustedRootExt, TrustedRootProvider};
use sigstore_types::{log_id_text, TransparencyLogEntry, TransparencyLogEntryExt};

/// The summary of an entry that the log signs to produce its SET
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationPayload {
    /// Base64 (standard alphabet) of the canonicalized body
    pub body: String,
    #[serde(rename = "integratedTime")]
    pub integrated_time: i64,
    #[serde(rename = "logIndex")]
    pub log_index: i64,
    /// Protobuf text rendering of the entry's log id
    #[serde(rename = "logID")]
    pub log_id: String,
}

impl VerificationPayload {
    /// Build the payload for an entry
    ///
    /// The log id is rendered in protobuf text form, not as the hex key id
    /// used to look up the log's key.
    pub fn from_entry(entry: &TransparencyLogEntry) -> Result<Self> {
        let log_id = entry
            .log_id
            .as_ref()
            .ok_or_else(|| Error::MissingLogId("entry has no log ID".to_string()))?;

        Ok(Self {
            body: base64::engine::general_purpose::STANDARD.encode(&entry.canonicalized_body),
            integrated_time: entry.integrated_time,
            log_index: entry.log_index,
            log_id: log_id_text(log_id),
        })
    }

    /// Serialize to RFC 8785 canonical JSON, the exact bytes the log signed
    pub fn canonicalize(&self) -> Result<Vec<u8>> {
        serde_json_canonicalizer::to_vec(self).map_err(|e| Error::Encoding(e.to_string()))
    }
}

/// Get the hex-encoded log id an entry declares
pub fn get_log_id(entry: &TransparencyLogEntry) -> Result<String> {
    entry
        .log_id_hex()
        .map_err(|e| Error::MissingLogId(e.to_string()))
}

/// Verify an entry's inclusion promise against the trusted log keys
///
/// Checks run in order and the first failure is returned: the entry must
/// carry a log id, the payload must canonicalize, the log must be trusted,
/// the entry must carry a promise, and the promise must verify over the
/// canonical payload under the log's key.
pub fn verify_inclusion_promise(
    entry: &TransparencyLogEntry,
    trusted_keys: &TrustedLogKeys,
    ctx: &VerificationContext,
) -> Result<()> {
    ctx.check()?;

    if entry.log_id.is_none() {
        return Err(Error::MissingLogId("entry has no log ID".to_string()));
    }

    let payload = VerificationPayload::from_entry(entry)?;
    let canonical_json = payload.canonicalize()?;

    let log_id = get_log_id(entry)?;
    let log_key = trusted_keys
        .get(&log_id)
        .ok_or_else(|| Error::UntrustedLog(log_id.clone()))?;

    let signature = entry
        .signed_entry_timestamp()
        .ok_or(Error::MissingInclusionPromise)?;

    ctx.check()?;
    let verified = log_key
        .verify(&canonical_json, signature)
        .map_err(|e| Error::SignatureInvalid(e.to_string()));
    ctx.check()?;
    verified?;

    tracing::debug!(
        log_id = %log_id,
        log_index = entry.log_index,
        "verified inclusion promise"
    );
    Ok(())
}

/// Verifier holding a snapshot of trusted log keys
///
/// Verification only reads the key map, so one verifier can be shared across
/// threads and called concurrently.
#[derive(Debug, Clone, Default)]
pub struct LogEntryVerifier {
    trusted_keys: TrustedLogKeys,
}

impl LogEntryVerifier {
    /// Create a verifier for the given keys
    pub fn new(trusted_keys: TrustedLogKeys) -> Self {
        Self { trusted_keys }
    }

    /// Create a verifier trusting the Rekor logs of a trusted root
    pub fn from_provider(provider: &impl TrustedRootProvider) -> Result<Self> {
        let trusted_root = provider.trusted_root()?;
        Ok(Self::new(trusted_root.tlog_keys()))
    }

    /// Get the trusted log keys
    pub fn trusted_keys(&self) -> &TrustedLogKeys {
        &self.trusted_keys
    }

    /// Verify an entry's inclusion promise
    pub fn verify(&self, entry: &TransparencyLogEntry, ctx: &VerificationContext) -> Result<()> {
        verify_inclusion_promise(entry, &self.trusted_keys, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigstore_crypto::{compute_log_id, PublicKey};
    use sigstore_types::{InclusionPromise, KindVersion, LogId};
    use tokio_util::sync::CancellationToken;

    const BODY: &[u8] = br#"{"apiVersion":"0.0.1","kind":"hashedrekord","spec":{}}"#;

    fn signing_key() -> p256::ecdsa::SigningKey {
        p256::ecdsa::SigningKey::from_slice(&[0x42; 32]).unwrap()
    }

    fn public_key() -> PublicKey {
        PublicKey::from(*signing_key().verifying_key())
    }

    fn unsigned_entry(key: &PublicKey) -> TransparencyLogEntry {
        let log_id = compute_log_id(key).unwrap();
        TransparencyLogEntry {
            log_index: 25579,
            log_id: Some(LogId {
                key_id: hex::decode(log_id).unwrap(),
            }),
            kind_version: Some(KindVersion {
                kind: "hashedrekord".to_string(),
                version: "0.0.1".to_string(),
            }),
            integrated_time: 1661794812,
            canonicalized_body: BODY.to_vec(),
            ..Default::default()
        }
    }

    fn sign_ecdsa(entry: &mut TransparencyLogEntry) {
        use p256::ecdsa::signature::Signer;

        let message = VerificationPayload::from_entry(entry)
            .unwrap()
            .canonicalize()
            .unwrap();
        let signature: p256::ecdsa::Signature = signing_key().sign(&message);
        entry.inclusion_promise = Some(InclusionPromise {
            signed_entry_timestamp: signature.to_der().as_bytes().to_vec(),
        });
    }

    fn signed_entry() -> TransparencyLogEntry {
        let mut entry = unsigned_entry(&public_key());
        sign_ecdsa(&mut entry);
        entry
    }

    fn trusted() -> TrustedLogKeys {
        let mut keys = TrustedLogKeys::new();
        keys.insert(public_key()).unwrap();
        keys
    }

    fn verify(entry: &TransparencyLogEntry, keys: &TrustedLogKeys) -> Result<()> {
        verify_inclusion_promise(entry, keys, &VerificationContext::new())
    }

    #[test]
    fn test_canonical_payload() {
        let payload = VerificationPayload {
            body: "e30=".to_string(),
            integrated_time: 1,
            log_index: 2,
            log_id: log_id_text(&LogId { key_id: vec![0x01] }),
        };
        assert_eq!(
            String::from_utf8(payload.canonicalize().unwrap()).unwrap(),
            r#"{"body":"e30=","integratedTime":1,"logID":"key_id:\"\\x01\"","logIndex":2}"#
        );
    }

    #[test]
    fn test_payload_uses_text_log_id() {
        let entry = TransparencyLogEntry {
            log_id: Some(LogId {
                key_id: b"foo".to_vec(),
            }),
            canonicalized_body: b"{}".to_vec(),
            ..Default::default()
        };
        let payload = VerificationPayload::from_entry(&entry).unwrap();
        assert_eq!(payload.log_id, "key_id:\"foo\"");
        assert_eq!(payload.body, "e30=");
        assert_eq!(get_log_id(&entry).unwrap(), hex::encode(b"foo"));
    }

    #[test]
    fn test_valid_set() {
        let entry = signed_entry();
        verify(&entry, &trusted()).unwrap();

        let verifier = LogEntryVerifier::new(trusted());
        verifier.verify(&entry, &VerificationContext::new()).unwrap();
    }

    #[test]
    fn test_verifier_from_trusted_root() {
        use sigstore_trust_root::{ProtoPublicKey, TransparencyLogInstance, TrustedRoot};

        let trusted_root = TrustedRoot {
            tlogs: vec![TransparencyLogInstance {
                base_url: "https://rekor.example.com".to_string(),
                public_key: Some(ProtoPublicKey {
                    raw_bytes: Some(public_key().to_der().unwrap()),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        };

        let verifier = LogEntryVerifier::from_provider(&trusted_root).unwrap();
        assert_eq!(verifier.trusted_keys().len(), 1);
        verifier
            .verify(&signed_entry(), &VerificationContext::new())
            .unwrap();

        let empty = LogEntryVerifier::from_provider(&TrustedRoot::default()).unwrap();
        assert!(matches!(
            empty.verify(&signed_entry(), &VerificationContext::new()),
            Err(Error::UntrustedLog(_))
        ));
    }

    #[test]
    fn test_empty_key_map_is_untrusted() {
        assert!(matches!(
            verify(&signed_entry(), &TrustedLogKeys::new()),
            Err(Error::UntrustedLog(_))
        ));
    }

    #[test]
    fn test_missing_log_id() {
        let mut entry = signed_entry();
        entry.log_id = None;
        for keys in [trusted(), TrustedLogKeys::new()] {
            let err = verify(&entry, &keys).unwrap_err();
            assert!(matches!(err, Error::MissingLogId(_)));
            assert!(err.is_missing_field());
        }

        entry.log_id = Some(LogId::default());
        assert!(matches!(
            verify(&entry, &trusted()),
            Err(Error::MissingLogId(_))
        ));
    }

    #[test]
    fn test_missing_inclusion_promise() {
        let entry = unsigned_entry(&public_key());
        let err = verify(&entry, &trusted()).unwrap_err();
        assert!(matches!(err, Error::MissingInclusionPromise));
        assert!(err.is_missing_field());
    }

    #[test]
    fn test_untrusted_log_checked_before_promise() {
        let entry = unsigned_entry(&public_key());
        assert!(matches!(
            verify(&entry, &TrustedLogKeys::new()),
            Err(Error::UntrustedLog(_))
        ));
    }

    #[test]
    fn test_malformed_set() {
        let mut entry = signed_entry();
        entry.inclusion_promise = Some(InclusionPromise {
            signed_entry_timestamp: b"foo".to_vec(),
        });
        assert!(matches!(
            verify(&entry, &trusted()),
            Err(Error::SignatureInvalid(_))
        ));
    }

    #[test]
    fn test_corrupted_set() {
        let mut entry = signed_entry();
        if let Some(promise) = entry.inclusion_promise.as_mut() {
            let last = promise.signed_entry_timestamp.len() - 1;
            promise.signed_entry_timestamp[last] ^= 0x01;
        }
        assert!(matches!(
            verify(&entry, &trusted()),
            Err(Error::SignatureInvalid(_))
        ));
    }

    #[test]
    fn test_tampered_fields() {
        let keys = trusted();

        let mut entry = signed_entry();
        entry.log_index += 1;
        assert!(matches!(verify(&entry, &keys), Err(Error::SignatureInvalid(_))));

        let mut entry = signed_entry();
        entry.integrated_time -= 1;
        assert!(matches!(verify(&entry, &keys), Err(Error::SignatureInvalid(_))));

        let mut entry = signed_entry();
        entry.canonicalized_body.push(b' ');
        assert!(matches!(verify(&entry, &keys), Err(Error::SignatureInvalid(_))));

        let mut entry = signed_entry();
        if let Some(log_id) = entry.log_id.as_mut() {
            log_id.key_id[0] ^= 0xff;
        }
        assert!(matches!(verify(&entry, &keys), Err(Error::UntrustedLog(_))));
    }

    #[test]
    fn test_signature_from_other_key() {
        // Entry signed by a different key but claiming the trusted log
        let mut entry = unsigned_entry(&public_key());
        let other = p256::ecdsa::SigningKey::from_slice(&[0x24; 32]).unwrap();
        let message = VerificationPayload::from_entry(&entry)
            .unwrap()
            .canonicalize()
            .unwrap();
        let signature: p256::ecdsa::Signature =
            p256::ecdsa::signature::Signer::sign(&other, &message);
        entry.inclusion_promise = Some(InclusionPromise {
            signed_entry_timestamp: signature.to_bytes().to_vec(),
        });
        assert!(matches!(
            verify(&entry, &trusted()),
            Err(Error::SignatureInvalid(_))
        ));
    }

    #[test]
    fn test_cancelled_context() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = VerificationContext::new().with_cancellation(token);

        assert!(matches!(
            verify_inclusion_promise(&signed_entry(), &trusted(), &ctx),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_ed25519_log() {
        use ed25519_dalek::Signer;

        let signing_key = ed25519_dalek::SigningKey::from_bytes(&[7; 32]);
        let key = PublicKey::from(signing_key.verifying_key());
        let mut keys = TrustedLogKeys::new();
        keys.insert(key.clone()).unwrap();

        let mut entry = unsigned_entry(&key);
        let message = VerificationPayload::from_entry(&entry)
            .unwrap()
            .canonicalize()
            .unwrap();
        entry.inclusion_promise = Some(InclusionPromise {
            signed_entry_timestamp: signing_key.sign(&message).to_bytes().to_vec(),
        });

        verify(&entry, &keys).unwrap();

        entry.log_index += 1;
        assert!(matches!(verify(&entry, &keys), Err(Error::SignatureInvalid(_))));
    }

    #[test]
    fn test_rekor_api_entry() {
        use base64::engine::general_purpose::STANDARD;

        let unsigned = unsigned_entry(&public_key());
        let message = VerificationPayload::from_entry(&unsigned)
            .unwrap()
            .canonicalize()
            .unwrap();
        let signature: p256::ecdsa::Signature =
            p256::ecdsa::signature::Signer::sign(&signing_key(), &message);

        let api_entry: sigstore_rekor::LogEntry = serde_json::from_value(serde_json::json!({
            "body": STANDARD.encode(BODY),
            "integratedTime": unsigned.integrated_time,
            "logID": compute_log_id(&public_key()).unwrap(),
            "logIndex": unsigned.log_index,
            "verification": {
                "signedEntryTimestamp": STANDARD.encode(signature.to_der().as_bytes()),
            },
        }))
        .unwrap();

        let entry = api_entry.to_transparency_log_entry().unwrap();
        verify(&entry, &trusted()).unwrap();
    }
}
