//! # Merkle Inclusion Proofs
//!
//! Recomputes a Merkle root from an audit event and its authentication path
//! and compares it with the root the audit service published.
//!
//! ## Algorithm
//!
//! - Leaf: `SHA256(canonical_bytes(leaf))`.
//! - Node: `SHA256(left || right)`. At each level an even `position` means
//!   the running hash is the left child, odd means it is the right child;
//!   `position` is then halved.
//! - The final hash is encoded as `0x` + lowercase hex and compared with the
//!   expected root.
//!
//! ## Compatibility Caveat
//!
//! Leaf and node hashes are not domain-separated (no `0x00`/`0x01` prefix,
//! unlike RFC 6962). A 64-byte leaf whose canonical bytes equal the
//! concatenation of two node hashes would hash like an internal node. The
//! construction is kept as is because every root the audit service has
//! already published depends on it.
//!
//! ## Error Contract
//!
//! A sibling that is not valid hex or not 32 bytes is a
//! [`CryptoError::MalformedSibling`], distinct from `Ok(false)` (a well-formed
//! proof whose root does not match). Malformed input is never a pass.

use auditproof_core::{
    strip_hex_prefix, CryptoError, Digest32, Leaf, ProofBundle, RootComparison,
};

use crate::sha256::{DigestBackend, Sha2Backend};

/// Verifies Merkle inclusion proofs.
///
/// Holds only the injected digest backend and the comparison policy; any
/// number of verifications may run concurrently on one instance.
#[derive(Debug, Clone, Default)]
pub struct MerkleVerifier<D = Sha2Backend> {
    digest: D,
    comparison: RootComparison,
}

impl MerkleVerifier {
    /// Verifier backed by RustCrypto `sha2` with exact root comparison.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: DigestBackend> MerkleVerifier<D> {
    /// Verifier using a caller-supplied digest backend.
    pub fn with_backend(digest: D) -> Self {
        Self {
            digest,
            comparison: RootComparison::default(),
        }
    }

    /// Set the root comparison policy.
    pub fn with_root_comparison(mut self, comparison: RootComparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// The active root comparison policy.
    pub fn root_comparison(&self) -> RootComparison {
        self.comparison
    }

    /// Hash of the leaf's canonical bytes.
    pub fn leaf_hash(&self, leaf: &Leaf) -> Result<Digest32, CryptoError> {
        let canonical = leaf
            .canonical_bytes()
            .map_err(|e| CryptoError::MalformedLeaf(e.to_string()))?;
        Ok(self.digest.leaf_digest(&canonical))
    }

    /// Fold `path` into the leaf hash and return the resulting root.
    pub fn compute_root(
        &self,
        leaf: &Leaf,
        path: &[String],
        position: u64,
    ) -> Result<Digest32, CryptoError> {
        let mut current = self.leaf_hash(leaf)?;
        let mut position = position;
        for (index, sibling_hex) in path.iter().enumerate() {
            let sibling =
                Digest32::from_hex(sibling_hex).map_err(|e| CryptoError::MalformedSibling {
                    index,
                    source: Box::new(e),
                })?;
            current = if position % 2 == 0 {
                self.digest.sha256_concat(current.as_bytes(), sibling.as_bytes())
            } else {
                self.digest.sha256_concat(sibling.as_bytes(), current.as_bytes())
            };
            position /= 2;
        }
        Ok(current)
    }

    /// Check that `leaf` at `position` reduces to `expected_root` via `path`.
    ///
    /// # Errors
    ///
    /// [`CryptoError::MalformedSibling`] if any path element fails to decode.
    pub fn verify_inclusion(
        &self,
        leaf: &Leaf,
        path: &[String],
        position: u64,
        expected_root: &str,
    ) -> Result<bool, CryptoError> {
        let computed = self.compute_root(leaf, path, position)?;
        let matched = roots_match(&computed, expected_root, self.comparison);
        tracing::debug!(
            path_len = path.len(),
            position,
            computed = %computed,
            expected = expected_root,
            matched,
            "merkle inclusion checked"
        );
        Ok(matched)
    }

    /// [`MerkleVerifier::verify_inclusion`] over a bundle's fields.
    pub fn verify_proof_bundle(&self, bundle: &ProofBundle) -> Result<bool, CryptoError> {
        self.verify_inclusion(
            &bundle.leaf,
            &bundle.path,
            bundle.position,
            &bundle.merkle_root,
        )
    }
}

/// Compare a recomputed root with the root text a bundle claims.
pub fn roots_match(computed: &Digest32, expected_root: &str, comparison: RootComparison) -> bool {
    let computed_hex = computed.to_prefixed_hex();
    match comparison {
        RootComparison::Exact => computed_hex == expected_root,
        RootComparison::CaseInsensitive => {
            let expected = expected_root.trim();
            let expected = expected
                .strip_prefix("0x")
                .or_else(|| expected.strip_prefix("0X"))
                .unwrap_or(expected);
            strip_hex_prefix(&computed_hex).eq_ignore_ascii_case(expected)
        }
    }
}

/// Verify an inclusion proof with the default backend and exact comparison.
pub fn verify_inclusion(
    leaf: &Leaf,
    path: &[String],
    position: u64,
    expected_root: &str,
) -> Result<bool, CryptoError> {
    MerkleVerifier::new().verify_inclusion(leaf, path, position, expected_root)
}

/// Verify a [`ProofBundle`] with the default backend and exact comparison.
pub fn verify_proof_bundle(bundle: &ProofBundle) -> Result<bool, CryptoError> {
    MerkleVerifier::new().verify_proof_bundle(bundle)
}
