//! Run report: one record per processed entry, in config order.

use alloy_primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use serde::Serialize;

use steward_core::RunMode;

/// What happened to one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum EntryOutcome {
    /// On-chain delegate already matches; nothing sent.
    AlreadyCorrect,
    /// Mismatch found during a dry run; nothing sent.
    WouldSubmit,
    /// `setDelegate` accepted by the node.
    Submitted { tx_hash: TxHash, signer: Address },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    pub index: usize,
    pub principal: Address,
    pub target: Address,
    pub current: Address,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: RunMode,
    pub registry: Address,
    pub namespace: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub entries: Vec<EntryReport>,
}

impl RunReport {
    pub fn already_correct(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::AlreadyCorrect))
    }

    pub fn mismatched(&self) -> usize {
        self.entries.len() - self.already_correct()
    }

    /// Hashes of transactions sent during this run, in submission order.
    pub fn transactions(&self) -> Vec<TxHash> {
        self.entries
            .iter()
            .filter_map(|e| match e.outcome {
                EntryOutcome::Submitted { tx_hash, .. } => Some(tx_hash),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}
