//! # Digests — 32-byte SHA-256 Values and the `0x` Hex Convention
//!
//! Every hash that crosses the audit service boundary (leaf hashes, sibling
//! hashes, Merkle roots) is a 32-byte SHA-256 output written as lowercase hex.
//!
//! ## Hex Convention
//!
//! - Decoders accept an optional `0x` prefix and strip it.
//! - Encoders always emit `0x` followed by lowercase hex digits.
//!
//! Following the convention in both directions lets a recomputed root be
//! compared against the service's published root byte-for-byte.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CryptoError;

/// Hex prefix emitted on every encoded digest.
pub const HEX_PREFIX: &str = "0x";

/// Length in bytes of a SHA-256 digest.
pub const DIGEST_LEN: usize = 32;

/// A raw 32-byte SHA-256 digest.
///
/// Serializes as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest32(pub [u8; DIGEST_LEN]);

impl Digest32 {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Render as `0x` + lowercase hex.
    pub fn to_prefixed_hex(&self) -> String {
        encode_prefixed_hex(&self.0)
    }

    /// Parse from hex, with or without the `0x` prefix.
    ///
    /// # Errors
    ///
    /// `CryptoError::HexDecode` on non-hex characters or odd length,
    /// `CryptoError::InvalidDigestLength` if the bytes are not 32 long.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = decode_prefixed_hex(hex)?;
        let arr: [u8; DIGEST_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidDigestLength(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for Digest32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Digest32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest32({})", self.to_prefixed_hex())
    }
}

impl std::fmt::Display for Digest32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_prefixed_hex())
    }
}

impl Serialize for Digest32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_prefixed_hex())
    }
}

impl<'de> Deserialize<'de> for Digest32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Strip a leading `0x` if present.
pub fn strip_hex_prefix(hex: &str) -> &str {
    hex.strip_prefix(HEX_PREFIX).unwrap_or(hex)
}

/// Encode bytes as `0x` + lowercase hex.
pub fn encode_prefixed_hex(bytes: &[u8]) -> String {
    format!("{HEX_PREFIX}{}", hex::encode(bytes))
}

/// Decode hex text into bytes, accepting an optional `0x` prefix.
///
/// Upper- and lowercase digits are both accepted; the value is the same.
pub fn decode_prefixed_hex(hex: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(strip_hex_prefix(hex)).map_err(|e| CryptoError::HexDecode(e.to_string()))
}

/// Compute SHA-256 of a leaf's canonical bytes.
///
/// Accepts only `&CanonicalBytes` so that no leaf hash can be computed over
/// a non-canonical serialization.
pub fn sha256_canonical(data: &CanonicalBytes) -> Digest32 {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; DIGEST_LEN];
    bytes.copy_from_slice(&hash);
    Digest32(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sha256_vector() {
        // SHA256("{}")
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(
            sha256_canonical(&cb).to_prefixed_hex(),
            "0x44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_prefixed_hex_roundtrip() {
        let d = Digest32([0xab; 32]);
        let hex = d.to_prefixed_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 2 + 64);
        assert_eq!(Digest32::from_hex(&hex).unwrap(), d);
    }

    #[test]
    fn test_from_hex_accepts_unprefixed_and_uppercase() {
        let d = Digest32::from_hex(&"AB".repeat(32)).unwrap();
        assert_eq!(d, Digest32([0xab; 32]));
    }

    #[test]
    fn test_from_hex_rejects_odd_length() {
        let err = Digest32::from_hex("0xabc").unwrap_err();
        assert!(matches!(err, CryptoError::HexDecode(_)));
    }

    #[test]
    fn test_from_hex_rejects_non_hex() {
        let err = Digest32::from_hex(&"zz".repeat(32)).unwrap_err();
        assert!(matches!(err, CryptoError::HexDecode(_)));
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        let err = Digest32::from_hex(&"00".repeat(31)).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidDigestLength(31)));
    }

    #[test]
    fn test_strip_prefix_only_strips_once() {
        assert_eq!(strip_hex_prefix("0x0xab"), "0xab");
        assert_eq!(strip_hex_prefix("ab"), "ab");
    }

    #[test]
    fn test_serde_uses_prefixed_hex() {
        let d = Digest32([1; 32]);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(32)));
        let back: Digest32 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
