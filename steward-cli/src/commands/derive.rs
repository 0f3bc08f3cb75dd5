//! `steward derive` — offline preflight of seed-phrase ordering.
//!
//! Derives the key for every entry's index and checks it against the entry's
//! principal, the same check `run` applies before signing on a production
//! network. No node is contacted.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use steward_chain::{derive_signer, ChainError};
use steward_core::{RunContext, RunMode};

use super::ConfigArgs;

/// Arguments for `steward derive`.
#[derive(Args, Debug)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl DeriveArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.load()?;
        let context = RunContext::from_env(RunMode::Production);
        let seed_phrase = context
            .seed_phrase
            .ok_or(ChainError::MissingCredential)
            .context("cannot derive signers")?;

        let mut drifted = 0usize;
        for entry in &config.entries {
            let path = entry.derivation_path();
            let derived = derive_signer(&seed_phrase, &path)
                .with_context(|| format!("entry {} ({})", entry.index, entry.principal))?
                .address();
            if derived == entry.principal {
                println!("  {}  {path}  {derived}", "✓".green());
            } else {
                drifted += 1;
                println!(
                    "  {}  {path}  {derived} != principal {}",
                    "✗".red(),
                    entry.principal
                );
            }
        }

        if drifted > 0 {
            bail!(
                "{drifted} of {} entries do not match their derivation path; \
                 check the order of '{}'",
                config.len(),
                self.config.config.display()
            );
        }
        println!("✓ all {} principals match their derivation paths", config.len());
        Ok(())
    }
}
