//! Steward — keep delegate-registry entries in line with a config file.
//!
//! # Usage
//!
//! ```text
//! steward run    --network <name> [--config delegations.yaml] [--rpc-url <url>] [--json]
//! steward check  --network <name> [--config delegations.yaml] [--rpc-url <url>] [--json]
//! steward derive [--config delegations.yaml]
//! ```
//!
//! `--network localhost` impersonates principals on a local fork; any other
//! network signs with keys derived from `$MNEMONIC`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, derive::DeriveArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "steward",
    version,
    about = "Reconcile on-chain delegate registry entries against a config file",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send setDelegate for every principal whose delegate is wrong.
    Run(RunArgs),

    /// Compare on-chain delegates with the config without sending anything.
    Check(CheckArgs),

    /// Show which address $MNEMONIC derives for each configured entry.
    Derive(DeriveArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Derive(args) => args.run(),
    }
}

/// Progress logs go to stderr so stdout stays a clean report.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
