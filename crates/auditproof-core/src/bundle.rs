//! # Proof and Signature Bundles
//!
//! The data handed to the verifier by the audit service. Bundles are read
//! only: the verifier never mutates or normalizes them in place.
//!
//! Field names are accepted both in snake_case and in the camelCase spelling
//! the audit API emits (`eventId`, `merkleRoot`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::canonical::CanonicalBytes;
use crate::error::{CanonicalizationError, CryptoError};

/// One append-only audit-log entry: an arbitrary JSON record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaf(pub Value);

impl Leaf {
    /// Wrap a JSON value as a leaf.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Build a leaf from any serializable record.
    pub fn from_serializable(record: &impl Serialize) -> Result<Self, CanonicalizationError> {
        Ok(Self(serde_json::to_value(record)?))
    }

    /// The record as a JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Canonical bytes hashed into the leaf digest.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(&self.0)
    }
}

impl From<Value> for Leaf {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Opaque audit event identifier. Informational only, never hashed.
///
/// The audit API has emitted both string and integer ids; both are accepted
/// and held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => EventId(s),
            Raw::Unsigned(n) => EventId(n.to_string()),
            Raw::Signed(n) => EventId(n.to_string()),
        })
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An inclusion proof for one leaf against a claimed Merkle root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofBundle {
    /// Identifier of the audit event. Not part of the hash computation.
    #[serde(default, alias = "eventId", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    /// Root the bundle claims the leaf belongs to (hex, optional `0x`).
    #[serde(alias = "merkleRoot")]
    pub merkle_root: String,
    /// Sibling hashes, from the leaf's direct sibling up to the root.
    #[serde(default)]
    pub path: Vec<String>,
    /// Zero-based index of the leaf in the tree's leaf level.
    pub position: u64,
    /// The audit record itself.
    pub leaf: Leaf,
}

impl ProofBundle {
    /// Parse a bundle from the audit API's JSON body.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A proof bundle as published alongside a signed snapshot root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedProofBundle {
    /// The inclusion proof.
    #[serde(flatten)]
    pub proof: ProofBundle,
    /// Base64 RSA-PKCS1v15/SHA-256 signature over `proof.merkle_root`.
    #[serde(default, alias = "rootSignature", skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl SignedProofBundle {
    /// Parse a signed bundle from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Signature material for this bundle's root under the given key.
    pub fn signature_bundle(&self, public_key: Option<&str>) -> SignatureBundle {
        SignatureBundle {
            root: self.proof.merkle_root.clone(),
            signature: self.signature.clone(),
            public_key: public_key.map(str::to_string),
        }
    }
}

impl From<ProofBundle> for SignedProofBundle {
    fn from(proof: ProofBundle) -> Self {
        Self {
            proof,
            signature: None,
        }
    }
}

/// Inputs to snapshot signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureBundle {
    /// The signed message: the root string exactly as published.
    pub root: String,
    /// Base64-encoded signature.
    #[serde(default)]
    pub signature: Option<String>,
    /// Base64 of the PEM-armored SPKI public key.
    #[serde(default, alias = "publicKey")]
    pub public_key: Option<String>,
}

impl SignatureBundle {
    /// Return `(signature, public_key)` when both are present and non-empty.
    ///
    /// # Errors
    ///
    /// `CryptoError::MissingMaterial` naming the first absent artifact.
    pub fn material(&self) -> Result<(&str, &str), CryptoError> {
        let signature = non_empty(self.signature.as_deref())
            .ok_or(CryptoError::MissingMaterial("signature"))?;
        let public_key = non_empty(self.public_key.as_deref())
            .ok_or(CryptoError::MissingMaterial("public key"))?;
        Ok((signature, public_key))
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
