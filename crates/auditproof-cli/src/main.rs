//! # auditproof CLI entry point
//!
//! Parses command-line arguments, installs logging, loads the trust config
//! and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use auditproof_cli::inspect::{run_inspect, InspectArgs};
use auditproof_cli::signature::{run_signature, SignatureArgs};
use auditproof_cli::verify::{run_verify, VerifyArgs};

/// auditproof: client-side verification of audit-log proofs.
///
/// Checks that an audit event is included in a published Merkle root and
/// that the root was signed by the trusted authority.
#[derive(Parser, Debug)]
#[command(name = "auditproof", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML trust config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify a proof bundle: inclusion and, if keyed, the root signature.
    Verify(VerifyArgs),

    /// Verify a snapshot root signature on its own.
    Signature(SignatureArgs),

    /// Print the canonical form and leaf hash of an audit event.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "auditproof starting");

    let result = auditproof_cli::load_trust_config(cli.config.as_deref()).and_then(|config| {
        match &cli.command {
            Commands::Verify(args) => run_verify(args, &config),
            Commands::Signature(args) => run_signature(args, &config),
            Commands::Inspect(args) => run_inspect(args),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
