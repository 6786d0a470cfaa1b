//! # Signature Subcommand
//!
//! Checks a snapshot root signature on its own, without an inclusion proof.
//! Useful when auditing published snapshots rather than individual events.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use auditproof_core::{SignatureBundle, TrustConfig, PUBLIC_KEY_ENV};
use auditproof_crypto::SignatureVerifier;

use crate::{EXIT_UNVERIFIED, EXIT_VERIFIED};

/// Arguments for `auditproof signature`.
#[derive(Args, Debug)]
pub struct SignatureArgs {
    /// The Merkle root exactly as published (e.g. `0x…`).
    #[arg(long)]
    pub root: String,

    /// Base64 RSASSA-PKCS1-v1_5 / SHA-256 signature over the root.
    #[arg(long, value_name = "BASE64")]
    pub signature: String,

    /// Base64 of the authority's PEM public key.
    #[arg(long, value_name = "BASE64", conflicts_with = "public_key_file")]
    pub public_key: Option<String>,

    /// PEM file holding the authority's public key.
    #[arg(long, value_name = "PATH")]
    pub public_key_file: Option<PathBuf>,
}

/// Execute the signature subcommand.
pub fn run_signature(args: &SignatureArgs, config: &TrustConfig) -> Result<u8> {
    let flag_key =
        crate::public_key_from_flags(args.public_key.as_deref(), args.public_key_file.as_ref())?;
    let Some(public_key) = flag_key.or_else(|| config.public_key.clone()) else {
        bail!(
            "no public key: pass --public-key or --public-key-file, set {PUBLIC_KEY_ENV}, \
             or configure public_key"
        );
    };

    let bundle = SignatureBundle {
        root: args.root.clone(),
        signature: Some(args.signature.clone()),
        public_key: Some(public_key),
    };

    match SignatureVerifier::new().check(&bundle) {
        Ok(()) => {
            println!("OK: signature over {} verified", args.root);
            Ok(EXIT_VERIFIED)
        }
        Err(e) => {
            tracing::debug!(error = %e, "snapshot signature rejected");
            println!("FAIL: signature over {} did not verify: {e}", args.root);
            Ok(EXIT_UNVERIFIED)
        }
    }
}
