//! `steward run` — reconcile and send correcting transactions.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use steward_sync::{reconcile, EntryOutcome, RunOptions, RunReport};

use super::{block_on, NetworkArgs};

/// Arguments for `steward run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub network: NetworkArgs,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let report = block_on(async {
            let session = self.network.session()?;
            reconcile::run(
                &session.config,
                &session.registry,
                &session.resolver,
                RunOptions::default(),
            )
            .await
            .with_context(|| format!("reconciliation on '{}' halted", self.network.network))
        })??;

        if self.network.json {
            println!("{}", report.to_json().context("failed to serialize run report")?);
        } else {
            print_report(&self.network.network, &report);
        }
        Ok(())
    }
}

fn print_report(network: &str, report: &RunReport) {
    let sent = report.transactions().len();
    println!(
        "✓ '{network}' reconciled ({} already correct, {sent} sent) [{}]",
        report.already_correct(),
        report.mode,
    );

    for entry in &report.entries {
        let position = format!("[{}/{}]", entry.index + 1, report.entries.len());
        match &entry.outcome {
            EntryOutcome::AlreadyCorrect => println!(
                "  {}  {position} {} delegates to {}",
                "·".green(),
                entry.principal,
                entry.current
            ),
            EntryOutcome::Submitted { tx_hash, signer } => {
                println!(
                    "  {}  {position} {} delegated to {}, expected {}",
                    "⚠".yellow(),
                    entry.principal,
                    entry.current,
                    entry.target
                );
                println!("      ✎  setDelegate from {signer} to {} sent {tx_hash}", entry.target);
            }
            EntryOutcome::WouldSubmit => println!(
                "  {}  {position} {} delegates to {}, expected {}",
                "~".yellow(),
                entry.principal,
                entry.current,
                entry.target
            ),
        }
    }

    if report.entries.is_empty() {
        println!("No delegations configured.");
    }
}
