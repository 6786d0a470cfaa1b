//! # Verify Subcommand
//!
//! Verifies a proof bundle returned by the audit service: Merkle inclusion
//! of the event under the claimed root, and the authority's signature over
//! that root when a trusted key is available.
//!
//! Key precedence: `--public-key`/`--public-key-file`, then
//! `AUDITPROOF_PUBLIC_KEY`, then the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use auditproof_core::{RootComparison, SignedProofBundle, TrustConfig};
use auditproof_crypto::{AuditVerifier, InclusionStatus, SignatureStatus, VerificationReport};

use crate::{EXIT_UNVERIFIED, EXIT_VERIFIED};

/// Arguments for `auditproof verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Proof bundle JSON (`-` reads standard input).
    #[arg(value_name = "BUNDLE")]
    pub bundle: PathBuf,

    /// Base64 of the authority's PEM public key.
    #[arg(long, value_name = "BASE64", conflicts_with = "public_key_file")]
    pub public_key: Option<String>,

    /// PEM file holding the authority's public key.
    #[arg(long, value_name = "PATH")]
    pub public_key_file: Option<PathBuf>,

    /// Fail unless the root signature verifies.
    #[arg(long)]
    pub require_signature: bool,

    /// Root comparison mode (`exact` or `case_insensitive`).
    #[arg(long, value_name = "MODE")]
    pub root_comparison: Option<RootComparison>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs, config: &TrustConfig) -> Result<u8> {
    let text = crate::read_input(&args.bundle)?;
    let bundle = SignedProofBundle::from_json(&text)
        .with_context(|| format!("invalid proof bundle: {}", args.bundle.display()))?;

    let config = effective_config(args, config)?;
    let report = AuditVerifier::from_config(&config).verify(&bundle);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        );
    } else {
        print_report(&args.bundle, &report);
    }

    Ok(if report.is_trusted() {
        EXIT_VERIFIED
    } else {
        EXIT_UNVERIFIED
    })
}

fn effective_config(args: &VerifyArgs, config: &TrustConfig) -> Result<TrustConfig> {
    let key = crate::public_key_from_flags(args.public_key.as_deref(), args.public_key_file.as_ref())?;
    let mut config = config.clone().with_public_key_override(key);
    if args.require_signature {
        config.require_signature = true;
    }
    if let Some(mode) = args.root_comparison {
        config.root_comparison = mode;
    }
    Ok(config)
}

fn print_report(source: &Path, report: &VerificationReport) {
    let label = report
        .event_id
        .clone()
        .unwrap_or_else(|| source.display().to_string());

    match &report.inclusion {
        InclusionStatus::Verified => {
            println!("OK: {label} is included in {}", report.merkle_root)
        }
        InclusionStatus::RootMismatch { computed } => {
            println!("FAIL: {label} does not reduce to the claimed root");
            println!("  Claimed:  {}", report.merkle_root);
            println!("  Computed: {computed}");
        }
        InclusionStatus::Malformed { reason } => {
            println!("FAIL: {label} has a malformed proof: {reason}")
        }
    }

    let signature = match report.signature {
        SignatureStatus::Verified => "OK: root signature verified",
        SignatureStatus::Invalid => "FAIL: root signature is invalid",
        SignatureStatus::Missing if report.signature_required => {
            "FAIL: root signature required but missing"
        }
        SignatureStatus::Missing => "SKIP: bundle carries no root signature",
        SignatureStatus::NotConfigured if report.signature_required => {
            "FAIL: root signature required but no public key configured"
        }
        SignatureStatus::NotConfigured => "SKIP: no public key configured",
    };
    println!("{signature}");
}
