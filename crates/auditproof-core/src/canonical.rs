//! # Canonical Serialization — JCS-Compatible Leaf Encoding
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! that are hashed into a Merkle leaf.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which serializes the value
//! with sorted keys and compact separators. Any function that hashes a leaf
//! must accept `&CanonicalBytes`, so two semantically identical audit events
//! with different key insertion order always hash identically.
//!
//! ## Compatibility with the audit service
//!
//! The audit service hashes each event as its JSON stringification with keys
//! sorted ascending. RFC 8785 (JSON Canonicalization Scheme) produces the same
//! bytes for that shape:
//!
//! 1. **Sorted keys**: by UTF-16 code unit, the order a JavaScript sort uses.
//! 2. **Compact separators**: no whitespace anywhere.
//! 3. **ECMAScript number formatting**: `1.5`, `100` (not `100.0`), `1e+21`.
//!    Non-finite floats cannot be represented and serialize as `null`, which
//!    is also what the service's stringifier emits.
//! 4. **Minimal string escaping**: non-ASCII passes through as UTF-8.
//!
//! Nested objects are sorted recursively. For the flat records the audit log
//! emits this is byte-identical to a top-level sort.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Object keys are sorted, recursively.
/// - Serialization uses compact separators and is valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (e.g. a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let bytes = serialize_canonical(&value)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// View the canonical bytes as text. JCS output is always UTF-8.
    pub fn as_str(&self) -> &str {
        // serde_jcs produces a String, so the bytes are valid UTF-8.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for CanonicalBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize a JSON value in JCS-canonical form (RFC 8785).
fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let s = serde_jcs::to_string(value)?;
    Ok(s.into_bytes())
}
