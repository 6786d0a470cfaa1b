//! # Trust Configuration
//!
//! Out-of-band verification settings: which authority key signs snapshot
//! roots, how roots are compared, and whether a signature is mandatory.
//!
//! Loaded from YAML. The `AUDITPROOF_PUBLIC_KEY` environment variable, when
//! set and non-empty, overrides any key in the file.

use std::path::{Path, PathBuf};

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding the configured authority key.
pub const PUBLIC_KEY_ENV: &str = "AUDITPROOF_PUBLIC_KEY";

/// How a recomputed root is compared with the bundle's claimed root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootComparison {
    /// Exact string equality against the `0x` + lowercase encoding.
    #[default]
    Exact,
    /// Lowercase the claimed root and tolerate a missing `0x` prefix.
    CaseInsensitive,
}

impl RootComparison {
    /// Returns the config identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::CaseInsensitive => "case_insensitive",
        }
    }
}

impl std::fmt::Display for RootComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RootComparison {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "case_insensitive" | "case-insensitive" => Ok(Self::CaseInsensitive),
            other => Err(ConfigError::Invalid(format!(
                "unknown root comparison {other:?}; expected exact or case_insensitive"
            ))),
        }
    }
}

/// Verification settings for a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrustConfig {
    /// Base64 of the PEM-armored SPKI public key of the signing authority.
    pub public_key: Option<String>,
    /// Path to a PEM file holding the authority key. Resolved relative to
    /// the config file.
    pub public_key_file: Option<PathBuf>,
    /// Root comparison mode.
    pub root_comparison: RootComparison,
    /// Fail bundles whose root signature is missing or invalid.
    pub require_signature: bool,
}

impl TrustConfig {
    /// Parse a config from YAML text.
    ///
    /// `public_key_file` is kept as written; call [`TrustConfig::resolve`]
    /// to load it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file and resolve its key material.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        tracing::debug!(path = %path.display(), "loaded trust config");
        config.resolve(base_dir)
    }

    /// Inline `public_key_file` as a base64 PEM `public_key`.
    pub fn resolve(mut self, base_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(file) = self.public_key_file.take() {
            let full = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            let pem = std::fs::read_to_string(&full).map_err(|source| ConfigError::Io {
                path: full.display().to_string(),
                source,
            })?;
            self.public_key = Some(base64::engine::general_purpose::STANDARD.encode(pem));
        }
        Ok(self)
    }

    /// Apply the `AUDITPROOF_PUBLIC_KEY` override from the process
    /// environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_public_key_override(std::env::var(PUBLIC_KEY_ENV).ok())
    }

    /// Replace the key when `key` is present and non-empty.
    pub fn with_public_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.public_key = Some(key);
            self.public_key_file = None;
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.public_key.is_some() && self.public_key_file.is_some() {
            return Err(ConfigError::Invalid(
                "public_key and public_key_file are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}
