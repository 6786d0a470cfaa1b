//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout auditproof. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Decode failures on proof material carry the offending position so a
//!   corrupt bundle can be told apart from a tampered one.
//! - Signature verification never surfaces these errors to its caller; they
//!   exist for diagnostics and for the Merkle path, where they are part of
//!   the contract.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic decoding or verification.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// A digest decoded to the wrong number of bytes.
    #[error("invalid digest length: expected 32 bytes, got {0}")]
    InvalidDigestLength(usize),

    /// A sibling in a Merkle path could not be decoded.
    #[error("malformed sibling at path index {index}: {source}")]
    MalformedSibling {
        /// Zero-based index of the sibling in the path.
        index: usize,
        /// The underlying decode failure.
        #[source]
        source: Box<CryptoError>,
    },

    /// The leaf record has no canonical encoding.
    #[error("malformed leaf: {0}")]
    MalformedLeaf(String),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// PEM armor or body is malformed.
    #[error("invalid PEM: {0}")]
    InvalidPem(String),

    /// Public key could not be imported.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Signature bytes are malformed or do not verify.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Signature or public key absent.
    #[error("missing verification material: {0}")]
    MissingMaterial(&'static str),
}

/// Error loading or validating trust configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// YAML parse failure.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Semantically invalid configuration.
    #[error("invalid config: {0}")]
    Invalid(String),
}
