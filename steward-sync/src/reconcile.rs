//! Reconciliation driver.
//!
//! Entries are processed one at a time in config order. Each entry goes
//! `Read → {AlreadyCorrect | Resolve → Submit}`; the first failure halts the
//! run and later entries are never read. Transactions already sent stay sent,
//! and a rerun skips the entries they fixed.

use chrono::Utc;
use tracing::Instrument;

use steward_chain::{DelegationRegistry, SignerResolver};
use steward_core::{DelegationConfig, DelegationEntry, NamespaceKey};

use crate::error::{step_err, ReconcileError, Step};
use crate::report::{EntryOutcome, EntryReport, RunReport};

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Read and compare only; never resolve signers or send transactions.
    pub dry_run: bool,
}

/// Bring every configured principal's delegate in line with `config`.
pub async fn run<R>(
    config: &DelegationConfig,
    registry: &R,
    resolver: &SignerResolver,
    options: RunOptions,
) -> Result<RunReport, ReconcileError>
where
    R: DelegationRegistry + ?Sized,
{
    let started_at = Utc::now();
    let total = config.len();
    tracing::info!(
        registry = %config.registry,
        namespace = %config.namespace,
        mode = %resolver.mode(),
        entries = total,
        dry_run = options.dry_run,
        "starting delegation reconciliation",
    );

    let mut entries = Vec::with_capacity(total);
    for entry in &config.entries {
        let span = tracing::info_span!(
            "delegator",
            index = entry.index,
            of = total,
            principal = %entry.principal,
        );
        let report = reconcile_entry(entry, &config.namespace, registry, resolver, options)
            .instrument(span)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "reconciliation halted"))?;
        entries.push(report);
    }

    let report = RunReport {
        mode: resolver.mode(),
        registry: config.registry,
        namespace: config.namespace.label().to_owned(),
        dry_run: options.dry_run,
        started_at,
        finished_at: Utc::now(),
        entries,
    };
    tracing::info!(
        already_correct = report.already_correct(),
        mismatched = report.mismatched(),
        transactions = report.transactions().len(),
        "reconciliation finished",
    );
    Ok(report)
}

async fn reconcile_entry<R>(
    entry: &DelegationEntry,
    namespace: &NamespaceKey,
    registry: &R,
    resolver: &SignerResolver,
    options: RunOptions,
) -> Result<EntryReport, ReconcileError>
where
    R: DelegationRegistry + ?Sized,
{
    let current = registry
        .current_delegate(entry.principal, namespace)
        .await
        .map_err(step_err(entry.index, entry.principal, Step::Read))?;
    tracing::info!(%current, "current delegate");

    let report = |outcome| EntryReport {
        index: entry.index,
        principal: entry.principal,
        target: entry.delegate,
        current,
        outcome,
    };

    if current == entry.delegate {
        return Ok(report(EntryOutcome::AlreadyCorrect));
    }

    tracing::warn!(%current, expected = %entry.delegate, "delegate does not match");
    if options.dry_run {
        return Ok(report(EntryOutcome::WouldSubmit));
    }

    let signer = resolver
        .resolve(entry.principal, entry.index)
        .await
        .map_err(step_err(entry.index, entry.principal, Step::ResolveSigner))?;
    let tx_hash = registry
        .set_delegate(&signer, namespace, entry.delegate)
        .await
        .map_err(step_err(entry.index, entry.principal, Step::Submit))?;
    tracing::info!(
        signer = %signer,
        delegate = %entry.delegate,
        %tx_hash,
        "setDelegate sent",
    );

    Ok(report(EntryOutcome::Submitted {
        tx_hash,
        signer: signer.address(),
    }))
}
