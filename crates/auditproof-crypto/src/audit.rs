//! # Audit Verifier — Inclusion plus Root Authenticity
//!
//! Combines the two checks a client runs on a bundle from the audit service:
//!
//! 1. The event is included in the bundle's claimed root
//!    ([`MerkleVerifier`]).
//! 2. The claimed root was signed by the trusted authority
//!    ([`SignatureVerifier`]), so a compromised service cannot fabricate a
//!    root that happens to include a forged event.
//!
//! `AuditVerifier` is an explicit context object. Callers construct it from a
//! [`TrustConfig`] and own its lifetime; there is no lazily-initialized
//! global instance.

use auditproof_core::{RootComparison, SignedProofBundle, TrustConfig};
use serde::{Deserialize, Serialize};

use crate::merkle::{roots_match, MerkleVerifier};
use crate::sha256::{DigestBackend, Sha2Backend};
use crate::signature::{RsaBackend, SignatureBackend, SignatureVerifier};

/// Outcome of the inclusion check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InclusionStatus {
    /// The recomputed root equals the claimed root.
    Verified,
    /// The proof is well formed but reduces to a different root.
    RootMismatch {
        /// The root the leaf and path actually reduce to.
        computed: String,
    },
    /// The proof could not be evaluated (bad sibling hex, bad leaf).
    Malformed {
        /// Why the bundle was rejected.
        reason: String,
    },
}

/// Outcome of the root signature check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    /// The root signature verified under the trusted key.
    Verified,
    /// A signature was present but did not verify.
    Invalid,
    /// The bundle carries no signature.
    Missing,
    /// No trusted key is configured, so the signature was not checked.
    NotConfigured,
}

/// Result of verifying one [`SignedProofBundle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Event id from the bundle, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Root the bundle claims.
    pub merkle_root: String,
    /// Inclusion outcome.
    pub inclusion: InclusionStatus,
    /// Root signature outcome.
    pub signature: SignatureStatus,
    /// Whether a verified signature was required.
    pub signature_required: bool,
}

impl VerificationReport {
    /// True when inclusion verified and the signature requirement is met.
    ///
    /// A present-but-invalid signature always fails, even when signatures
    /// are optional.
    pub fn is_trusted(&self) -> bool {
        if self.inclusion != InclusionStatus::Verified {
            return false;
        }
        match self.signature {
            SignatureStatus::Verified => true,
            SignatureStatus::Invalid => false,
            SignatureStatus::Missing | SignatureStatus::NotConfigured => !self.signature_required,
        }
    }
}

/// Verifies signed proof bundles against a trusted authority key.
#[derive(Debug, Clone)]
pub struct AuditVerifier<D = Sha2Backend, B = RsaBackend> {
    merkle: MerkleVerifier<D>,
    signatures: SignatureVerifier<B>,
    public_key: Option<String>,
    require_signature: bool,
}

impl AuditVerifier {
    /// Build a verifier with the RustCrypto backends.
    pub fn from_config(config: &TrustConfig) -> Self {
        Self::with_backends(config, Sha2Backend, RsaBackend)
    }
}

impl<D: DigestBackend, B: SignatureBackend> AuditVerifier<D, B> {
    /// Build a verifier with caller-supplied backends.
    pub fn with_backends(config: &TrustConfig, digest: D, signatures: B) -> Self {
        Self {
            merkle: MerkleVerifier::with_backend(digest)
                .with_root_comparison(config.root_comparison),
            signatures: SignatureVerifier::with_backend(signatures),
            public_key: config.public_key.clone(),
            require_signature: config.require_signature,
        }
    }

    /// The underlying inclusion verifier.
    pub fn merkle(&self) -> &MerkleVerifier<D> {
        &self.merkle
    }

    /// The underlying signature verifier.
    pub fn signatures(&self) -> &SignatureVerifier<B> {
        &self.signatures
    }

    /// Root comparison policy in effect.
    pub fn root_comparison(&self) -> RootComparison {
        self.merkle.root_comparison()
    }

    /// Whether a trusted authority key is configured.
    pub fn has_trusted_key(&self) -> bool {
        self.public_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Verify inclusion and, when possible, the root signature.
    pub fn verify(&self, bundle: &SignedProofBundle) -> VerificationReport {
        let proof = &bundle.proof;
        let inclusion = match self
            .merkle
            .compute_root(&proof.leaf, &proof.path, proof.position)
        {
            Ok(computed) if roots_match(&computed, &proof.merkle_root, self.root_comparison()) => {
                InclusionStatus::Verified
            }
            Ok(computed) => InclusionStatus::RootMismatch {
                computed: computed.to_prefixed_hex(),
            },
            Err(e) => {
                tracing::warn!(
                    event_id = ?proof.event_id,
                    error = %e,
                    "malformed proof bundle"
                );
                InclusionStatus::Malformed {
                    reason: e.to_string(),
                }
            }
        };

        let signature = if !self.has_trusted_key() {
            SignatureStatus::NotConfigured
        } else if bundle
            .signature
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            SignatureStatus::Missing
        } else if self
            .signatures
            .verify(&bundle.signature_bundle(self.public_key.as_deref()))
        {
            SignatureStatus::Verified
        } else {
            SignatureStatus::Invalid
        };

        let report = VerificationReport {
            event_id: proof.event_id.as_ref().map(|id| id.to_string()),
            merkle_root: proof.merkle_root.clone(),
            inclusion,
            signature,
            signature_required: self.require_signature,
        };
        tracing::info!(
            event_id = ?report.event_id,
            inclusion = ?report.inclusion,
            signature = ?report.signature,
            trusted = report.is_trusted(),
            "audit bundle verified"
        );
        report
    }
}
