//! `steward check` — read-only comparison of on-chain and configured delegates.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use steward_sync::{reconcile, EntryOutcome, EntryReport, RunOptions, RunReport};

use super::{block_on, NetworkArgs};

/// Arguments for `steward check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Tabled)]
struct CheckTableRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "principal")]
    principal: String,
    #[tabled(rename = "current")]
    current: String,
    #[tabled(rename = "target")]
    target: String,
    #[tabled(rename = "status")]
    status: &'static str,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let report = block_on(async {
            let session = self.network.session()?;
            reconcile::run(
                &session.config,
                &session.registry,
                &session.resolver,
                RunOptions { dry_run: true },
            )
            .await
            .with_context(|| format!("check on '{}' failed", self.network.network))
        })??;

        if self.network.json {
            println!("{}", report.to_json().context("failed to serialize check report")?);
            return Ok(());
        }

        print_table(&self.network.network, report);
        Ok(())
    }
}

fn print_table(network: &str, report: RunReport) {
    let mismatched = report.mismatched();
    println!(
        "Steward v{} | {network} | {} | {} entries | {} mismatched",
        env!("CARGO_PKG_VERSION"),
        report.namespace,
        report.entries.len(),
        mismatched,
    );

    if report.entries.is_empty() {
        println!("No delegations configured.");
        return;
    }

    let rows: Vec<CheckTableRow> = report.entries.iter().map(table_row).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if mismatched == 0 {
        println!("{} all delegates match", "■".green().bold());
    } else {
        println!(
            "{} run 'steward run --network {network}' to fix {mismatched} entr{}",
            "■".yellow().bold(),
            if mismatched == 1 { "y" } else { "ies" },
        );
    }
}

fn table_row(entry: &EntryReport) -> CheckTableRow {
    CheckTableRow {
        index: entry.index,
        principal: entry.principal.to_string(),
        current: entry.current.to_string(),
        target: entry.target.to_string(),
        status: match entry.outcome {
            EntryOutcome::AlreadyCorrect => "OK",
            EntryOutcome::WouldSubmit | EntryOutcome::Submitted { .. } => "MISMATCH",
        },
    }
}
