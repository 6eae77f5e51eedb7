//! Transparency log public keys
//!
//! A [`PublicKey`] is the verification capability a trusted root hands to the
//! inclusion promise verifier. Keys travel as DER-encoded SubjectPublicKeyInfo,
//! which is also the encoding their log identity is computed over.

use crate::error::{Error, Result};
use crate::hash::sha256;
use p256::ecdsa::signature::Verifier as _;
use spki::{DecodePublicKey, EncodePublicKey};

/// Signature scheme of a log key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// ECDSA over NIST P-256 with SHA-256
    EcdsaP256Sha256,
    /// Ed25519
    Ed25519,
}

impl SigningScheme {
    /// Get the scheme name as used in trusted root key details
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningScheme::EcdsaP256Sha256 => "PKIX_ECDSA_P256_SHA_256",
            SigningScheme::Ed25519 => "PKIX_ED25519",
        }
    }
}

/// A public key able to verify signatures from a transparency log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// ECDSA P-256 verifying key
    EcdsaP256(p256::ecdsa::VerifyingKey),
    /// Ed25519 verifying key
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    /// Parse a DER-encoded SubjectPublicKeyInfo
    ///
    /// The key type is detected from the encoded algorithm.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        if let Ok(key) = p256::ecdsa::VerifyingKey::from_public_key_der(der) {
            return Ok(PublicKey::EcdsaP256(key));
        }
        if let Ok(key) = ed25519_dalek::VerifyingKey::from_public_key_der(der) {
            return Ok(PublicKey::Ed25519(key));
        }

        let spki = spki::SubjectPublicKeyInfoRef::try_from(der)
            .map_err(|e| Error::Encoding(format!("failed to parse SPKI: {}", e)))?;
        Err(Error::UnsupportedKey(format!(
            "unsupported key algorithm {}",
            spki.algorithm.oid
        )))
    }

    /// Parse a PEM-encoded public key (`-----BEGIN PUBLIC KEY-----`)
    pub fn from_pem(pem: &str) -> Result<Self> {
        if let Ok(key) = p256::ecdsa::VerifyingKey::from_public_key_pem(pem) {
            return Ok(PublicKey::EcdsaP256(key));
        }
        ed25519_dalek::VerifyingKey::from_public_key_pem(pem)
            .map(PublicKey::Ed25519)
            .map_err(|e| Error::Encoding(format!("failed to parse PEM public key: {}", e)))
    }

    /// Serialize the key as DER-encoded SubjectPublicKeyInfo
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let document = match self {
            PublicKey::EcdsaP256(key) => key.to_public_key_der(),
            PublicKey::Ed25519(key) => key.to_public_key_der(),
        }
        .map_err(|e| Error::Encoding(format!("failed to encode public key: {}", e)))?;

        Ok(document.as_bytes().to_vec())
    }

    /// Get the signing scheme of this key
    pub fn scheme(&self) -> SigningScheme {
        match self {
            PublicKey::EcdsaP256(_) => SigningScheme::EcdsaP256Sha256,
            PublicKey::Ed25519(_) => SigningScheme::Ed25519,
        }
    }

    /// Verify `signature` over `message`
    ///
    /// ECDSA signatures are accepted DER-encoded or as fixed-size `r || s`.
    /// Any failure, including a malformed signature, is
    /// [`Error::SignatureInvalid`].
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        match self {
            PublicKey::EcdsaP256(key) => {
                let sig = p256::ecdsa::Signature::from_der(signature)
                    .or_else(|_| p256::ecdsa::Signature::from_slice(signature))
                    .map_err(|e| {
                        Error::SignatureInvalid(format!("malformed ECDSA signature: {}", e))
                    })?;
                key.verify(message, &sig)
                    .map_err(|e| Error::SignatureInvalid(format!("ECDSA P-256: {}", e)))
            }
            PublicKey::Ed25519(key) => {
                let sig = ed25519_dalek::Signature::from_slice(signature).map_err(|e| {
                    Error::SignatureInvalid(format!("malformed Ed25519 signature: {}", e))
                })?;
                key.verify_strict(message, &sig)
                    .map_err(|e| Error::SignatureInvalid(format!("Ed25519: {}", e)))
            }
        }
    }
}

impl From<p256::ecdsa::VerifyingKey> for PublicKey {
    fn from(key: p256::ecdsa::VerifyingKey) -> Self {
        PublicKey::EcdsaP256(key)
    }
}

impl From<ed25519_dalek::VerifyingKey> for PublicKey {
    fn from(key: ed25519_dalek::VerifyingKey) -> Self {
        PublicKey::Ed25519(key)
    }
}

/// Compute the log identity of a public key
///
/// The identity is the hex-encoded SHA-256 digest of the key's DER
/// SubjectPublicKeyInfo encoding, the same value a log advertises as its
/// log ID.
pub fn compute_log_id(key: &PublicKey) -> Result<String> {
    let der = key.to_der()?;
    Ok(hex::encode(sha256(&der)))
}
