//! # Snapshot Root Signatures — RSASSA-PKCS1-v1_5 with SHA-256
//!
//! Confirms that a published Merkle root string was signed by the holder of
//! the audit authority's RSA key.
//!
//! ## Input Contract
//!
//! - `root`: the signed message, exactly as published (UTF-8).
//! - `signature`: base64 of the raw PKCS#1 v1.5 signature.
//! - `public_key`: base64 of a PEM-armored SPKI (`BEGIN PUBLIC KEY`) RSA key,
//!   at most 4096 bits.
//!
//! Both base64 inputs may be line-wrapped; ASCII whitespace is ignored.
//!
//! ## Failure Contract
//!
//! Verification returns `bool` and never errors or panics. Missing material,
//! malformed base64/PEM/DER, a non-RSA key, and a bad signature all yield
//! `false`. The specific reason is logged at `debug` level and is also
//! available through [`SignatureVerifier::check`] for diagnostics.

use std::sync::Arc;

use auditproof_core::{CryptoError, SignatureBundle};
use base64::Engine;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha2::Sha256;

const PEM_BEGIN: &str = "-----BEGIN PUBLIC KEY-----";
const PEM_END: &str = "-----END PUBLIC KEY-----";

/// An RSA-PKCS1v15/SHA-256 verification capability over SPKI DER keys.
///
/// The key is import-only for verification: implementations must not expose
/// signing or encryption with it.
pub trait SignatureBackend: Send + Sync {
    /// Verify `signature` over `message` with the SPKI DER-encoded key.
    fn verify_pkcs1v15_sha256(
        &self,
        spki_der: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError>;
}

/// RustCrypto `rsa` backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RsaBackend;

impl SignatureBackend for RsaBackend {
    fn verify_pkcs1v15_sha256(
        &self,
        spki_der: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        // Moduli above 4096 bits fail here (`rsa` limit), although
        // WebCrypto and OpenSSL accept them.
        let public_key = RsaPublicKey::from_public_key_der(spki_der)
            .map_err(|e| CryptoError::InvalidPublicKey(format!("SPKI import failed: {e}")))?;
        let verifying_key = VerifyingKey::<Sha256>::new(public_key);
        let signature = Signature::try_from(signature).map_err(|e| {
            CryptoError::VerificationFailed(format!("malformed PKCS#1 signature: {e}"))
        })?;
        verifying_key.verify(message, &signature).map_err(|_| {
            CryptoError::VerificationFailed("RSA PKCS#1 SHA-256 signature invalid".to_string())
        })
    }
}

impl<T: SignatureBackend + ?Sized> SignatureBackend for Arc<T> {
    fn verify_pkcs1v15_sha256(
        &self,
        spki_der: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        (**self).verify_pkcs1v15_sha256(spki_der, message, signature)
    }
}

/// Verifies snapshot root signatures.
///
/// Stateless apart from the injected backend; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct SignatureVerifier<B = RsaBackend> {
    backend: B,
}

impl SignatureVerifier {
    /// Verifier backed by the RustCrypto `rsa` crate.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: SignatureBackend> SignatureVerifier<B> {
    /// Verifier using a caller-supplied backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Verify `signature_b64` over `root` with `public_key_pem_b64`.
    ///
    /// Absent or empty material returns `false` without doing any
    /// cryptographic work.
    pub fn verify_snapshot_signature(
        &self,
        root: &str,
        signature_b64: Option<&str>,
        public_key_pem_b64: Option<&str>,
    ) -> bool {
        let bundle = SignatureBundle {
            root: root.to_string(),
            signature: signature_b64.map(str::to_string),
            public_key: public_key_pem_b64.map(str::to_string),
        };
        self.verify(&bundle)
    }

    /// Verify a [`SignatureBundle`], mapping every failure to `false`.
    pub fn verify(&self, bundle: &SignatureBundle) -> bool {
        match self.check(bundle) {
            Ok(()) => {
                tracing::debug!(root = %bundle.root, "snapshot signature verified");
                true
            }
            Err(e) => {
                tracing::debug!(root = %bundle.root, reason = %e, "snapshot signature rejected");
                false
            }
        }
    }

    /// Verify a [`SignatureBundle`], returning why verification failed.
    pub fn check(&self, bundle: &SignatureBundle) -> Result<(), CryptoError> {
        let (signature_b64, public_key_b64) = bundle.material()?;
        let spki_der = decode_public_key(public_key_b64)?;
        let signature = decode_base64(signature_b64)
            .map_err(|e| CryptoError::Base64Decode(format!("signature: {e}")))?;
        self.backend
            .verify_pkcs1v15_sha256(&spki_der, bundle.root.as_bytes(), &signature)
    }
}

/// Decode a base64-wrapped PEM public key down to SPKI DER bytes.
///
/// The armor lines are removed wherever they appear and all whitespace is
/// dropped, so single-line PEM text is accepted as well.
pub fn decode_public_key(public_key_pem_b64: &str) -> Result<Vec<u8>, CryptoError> {
    let pem_bytes = decode_base64(public_key_pem_b64)
        .map_err(|e| CryptoError::Base64Decode(format!("public key: {e}")))?;
    let pem = String::from_utf8(pem_bytes)
        .map_err(|_| CryptoError::InvalidPem("armored key is not UTF-8".to_string()))?;
    let body: String = pem
        .replace(PEM_BEGIN, "")
        .replace(PEM_END, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if body.is_empty() {
        return Err(CryptoError::InvalidPem("empty key body".to_string()));
    }
    decode_base64(&body).map_err(|e| CryptoError::InvalidPem(format!("key body: {e}")))
}

/// Decode standard base64, ignoring ASCII whitespace anywhere in the input
/// (`base64` and `openssl base64` wrap their output).
fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD.decode(compact)
}

/// Verify a snapshot signature with the default RustCrypto backend.
///
/// Returns `false` when either artifact is missing or anything fails to
/// decode or verify.
pub fn verify_snapshot_signature(
    root: &str,
    signature_b64: Option<&str>,
    public_key_pem_b64: Option<&str>,
) -> bool {
    SignatureVerifier::new().verify_snapshot_signature(root, signature_b64, public_key_pem_b64)
}
