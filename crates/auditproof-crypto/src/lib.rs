//! # auditproof-crypto — Audit Proof Verifiers
//!
//! Client-side verification of proofs published by the audit-log service:
//!
//! - **Merkle inclusion**: recompute a root from a canonical audit event and
//!   its sibling path ([`MerkleVerifier`], [`verify_inclusion`],
//!   [`verify_proof_bundle`]).
//! - **Snapshot signatures**: RSASSA-PKCS1-v1_5 / SHA-256 over the published
//!   root string ([`SignatureVerifier`], [`verify_snapshot_signature`]).
//! - **Combined verification**: [`AuditVerifier`] runs both against a
//!   [`TrustConfig`](auditproof_core::TrustConfig) and returns a
//!   [`VerificationReport`].
//!
//! ## Backends
//!
//! Hashing and RSA verification sit behind the [`DigestBackend`] and
//! [`SignatureBackend`] traits. The defaults use RustCrypto (`sha2`, `rsa`).
//!
//! ## Crate Policy
//!
//! - Depends only on `auditproof-core` internally.
//! - No global state. Verifiers are `Send + Sync` and may be shared freely.
//! - Tests use real SHA-256 and real RSA keys.

pub mod audit;
pub mod merkle;
pub mod sha256;
pub mod signature;

pub use audit::{AuditVerifier, InclusionStatus, SignatureStatus, VerificationReport};
pub use merkle::{roots_match, verify_inclusion, verify_proof_bundle, MerkleVerifier};
pub use sha256::{DigestBackend, Sha2Backend};
pub use signature::{
    decode_public_key, verify_snapshot_signature, RsaBackend, SignatureBackend,
    SignatureVerifier,
};
