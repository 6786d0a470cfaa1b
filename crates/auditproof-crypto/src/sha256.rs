//! # SHA-256 Digest Backend
//!
//! The Merkle verifier never calls a hash function directly. It is handed a
//! [`DigestBackend`], so the algorithm is independent of which SHA-256
//! implementation a platform provides (RustCrypto here, a hardware or FFI
//! backend elsewhere) and can be exercised with instrumented backends in
//! tests.

use std::sync::Arc;

use auditproof_core::{CanonicalBytes, Digest32};
use sha2::{Digest, Sha256};

/// A SHA-256 capability.
///
/// Implementations must be pure: the same input always yields the same
/// digest, with no shared mutable state between calls.
pub trait DigestBackend: Send + Sync {
    /// SHA-256 of `data`.
    fn sha256(&self, data: &[u8]) -> Digest32;

    /// SHA-256 of `first || second`.
    ///
    /// The default copies both halves into one buffer; backends with a
    /// streaming interface should override it.
    fn sha256_concat(&self, first: &[u8], second: &[u8]) -> Digest32 {
        let mut buf = Vec::with_capacity(first.len() + second.len());
        buf.extend_from_slice(first);
        buf.extend_from_slice(second);
        self.sha256(&buf)
    }

    /// SHA-256 of a leaf's canonical bytes.
    fn leaf_digest(&self, data: &CanonicalBytes) -> Digest32 {
        self.sha256(data.as_bytes())
    }
}

/// RustCrypto `sha2` backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha2Backend;

impl DigestBackend for Sha2Backend {
    fn sha256(&self, data: &[u8]) -> Digest32 {
        finalize(Sha256::new_with_prefix(data))
    }

    fn sha256_concat(&self, first: &[u8], second: &[u8]) -> Digest32 {
        let mut hasher = Sha256::new();
        hasher.update(first);
        hasher.update(second);
        finalize(hasher)
    }
}

impl<T: DigestBackend + ?Sized> DigestBackend for Arc<T> {
    fn sha256(&self, data: &[u8]) -> Digest32 {
        (**self).sha256(data)
    }

    fn sha256_concat(&self, first: &[u8], second: &[u8]) -> Digest32 {
        (**self).sha256_concat(first, second)
    }
    fn leaf_digest(&self, data: &CanonicalBytes) -> Digest32 {
        (**self).leaf_digest(data)
    }
}

impl<T: DigestBackend + ?Sized> DigestBackend for &T {
    fn sha256(&self, data: &[u8]) -> Digest32 {
        (**self).sha256(data)
    }

    fn sha256_concat(&self, first: &[u8], second: &[u8]) -> Digest32 {
        (**self).sha256_concat(first, second)
    }
    fn leaf_digest(&self, data: &CanonicalBytes) -> Digest32 {
        (**self).leaf_digest(data)
    }
}

fn finalize(hasher: Sha256) -> Digest32 {
    let hash = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Digest32::from_bytes(bytes)
}
