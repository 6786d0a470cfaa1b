//! # auditproof-core — Foundational Types for Audit-Proof Verification
//!
//! This crate defines the data a client needs to check that an audit-log
//! event is included in a Merkle root published by the audit service. It
//! depends on nothing internal; `auditproof-crypto` builds the verifiers on
//! top of it.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every leaf hash flows through
//!    `CanonicalBytes::new()`. Key order in the incoming record never
//!    changes the hash.
//!
//! 2. **One hex convention.** [`Digest32`] decodes with or without `0x` and
//!    always encodes as `0x` + lowercase hex, matching the service's output
//!    byte-for-byte.
//!
//! 3. **Read-only bundles.** [`ProofBundle`], [`SignedProofBundle`] and
//!    [`SignatureBundle`] are plain data parsed from the audit API.
//!
//! 4. **Explicit trust configuration.** [`TrustConfig`] carries the authority
//!    key and comparison policy; nothing is held in process-global state.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod bundle;
pub mod canonical;
pub mod config;
pub mod digest;
pub mod error;

// Re-export primary types for ergonomic imports.
pub use bundle::{EventId, Leaf, ProofBundle, SignatureBundle, SignedProofBundle};
pub use canonical::CanonicalBytes;
pub use config::{RootComparison, TrustConfig, PUBLIC_KEY_ENV};
pub use digest::{
    decode_prefixed_hex, encode_prefixed_hex, sha256_canonical, strip_hex_prefix, Digest32,
};
pub use error::{CanonicalizationError, ConfigError, CryptoError};
