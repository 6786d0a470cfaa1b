//! # Inspect Subcommand
//!
//! Prints the canonical form and leaf hash of an audit event, and
//! optionally the root it reduces to under a given path. Used to debug
//! root mismatches against the audit service.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use auditproof_core::Leaf;
use auditproof_crypto::MerkleVerifier;

/// Arguments for `auditproof inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Audit event JSON (`-` reads standard input).
    #[arg(value_name = "LEAF")]
    pub leaf: PathBuf,

    /// Sibling hash, leaf level first. Repeat for each level.
    #[arg(long = "sibling", value_name = "HEX")]
    pub path: Vec<String>,

    /// Leaf position in the tree.
    #[arg(long, default_value_t = 0)]
    pub position: u64,

    /// Print as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Inspection {
    canonical: String,
    leaf_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    computed_root: Option<String>,
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let inspection = inspect(args)?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&inspection).context("failed to serialize output")?
        );
    } else {
        println!("Canonical: {}", inspection.canonical);
        println!("Leaf hash: {}", inspection.leaf_hash);
        if let Some(root) = &inspection.computed_root {
            println!("Root:      {root}");
        }
    }
    Ok(crate::EXIT_VERIFIED)
}

fn inspect(args: &InspectArgs) -> Result<Inspection> {
    let text = crate::read_input(&args.leaf)?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("invalid JSON: {}", args.leaf.display()))?;
    let leaf = Leaf::new(value);

    let verifier = MerkleVerifier::new();
    let canonical = leaf
        .canonical_bytes()
        .context("failed to canonicalize leaf")?;
    let leaf_hash = verifier.leaf_hash(&leaf)?;
    let computed_root = if args.path.is_empty() {
        None
    } else {
        let root = verifier
            .compute_root(&leaf, &args.path, args.position)
            .context("failed to fold path")?;
        Some(root.to_prefixed_hex())
    };

    Ok(Inspection {
        canonical: canonical.as_str().to_string(),
        leaf_hash: leaf_hash.to_prefixed_hex(),
        computed_root,
    })
}
