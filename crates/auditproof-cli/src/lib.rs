//! # auditproof-cli — Command-Line Verifier
//!
//! Provides the `auditproof` command-line interface over the verifiers in
//! `auditproof-crypto`.
//!
//! ## Subcommands
//!
//! - `auditproof verify`: Inclusion proof plus snapshot root signature.
//! - `auditproof signature`: Snapshot root signature only.
//! - `auditproof inspect`: Canonical bytes and leaf hash of an event.
//!
//! ## Exit Codes
//!
//! Handlers return `anyhow::Result<u8>`. `Ok(0)` means verified, `Ok(2)`
//! means the input was well formed but did not verify, and any `Err` is
//! reported by `main` as exit code 1.
//!
//! ```bash
//! auditproof verify bundle.json --public-key "$AUTHORITY_KEY_B64"
//! auditproof --config trust.yaml verify bundle.json --require-signature
//! auditproof inspect leaf.json
//! ```

pub mod inspect;
pub mod signature;
pub mod verify;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use auditproof_core::TrustConfig;

/// Input verified and trusted.
pub const EXIT_VERIFIED: u8 = 0;
/// Input was readable but failed verification.
pub const EXIT_UNVERIFIED: u8 = 2;

/// Read a file argument, with `-` meaning standard input.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Load the trust config from `--config` (or defaults) and apply the
/// environment override.
pub fn load_trust_config(path: Option<&Path>) -> Result<TrustConfig> {
    let config = match path {
        Some(path) => TrustConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TrustConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Key material given on the command line, which wins over the config.
pub fn public_key_from_flags(
    public_key: Option<&str>,
    public_key_file: Option<&PathBuf>,
) -> Result<Option<String>> {
    if let Some(key) = public_key {
        return Ok(Some(key.to_string()));
    }
    let Some(file) = public_key_file else {
        return Ok(None);
    };
    let resolved = TrustConfig {
        public_key_file: Some(file.clone()),
        ..TrustConfig::default()
    }
    .resolve(Path::new("."))
    .with_context(|| format!("failed to read public key {}", file.display()))?;
    Ok(resolved.public_key)
}
