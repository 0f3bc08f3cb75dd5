//! Error types for steward-sync.

use std::fmt;

use alloy_primitives::Address;
use thiserror::Error;

use steward_chain::ChainError;

/// The per-entry step that was running when a run halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Read,
    ResolveSigner,
    Submit,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Read => write!(f, "reading current delegate"),
            Step::ResolveSigner => write!(f, "resolving signer"),
            Step::Submit => write!(f, "submitting setDelegate"),
        }
    }
}

/// A halted reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A step for one entry failed; later entries were not attempted.
    #[error("entry {index} ({principal}) halted while {step}: {source}")]
    Step {
        index: usize,
        principal: Address,
        step: Step,
        #[source]
        source: ChainError,
    },
}

impl ReconcileError {
    pub fn step(&self) -> Step {
        match self {
            ReconcileError::Step { step, .. } => *step,
        }
    }

    pub fn chain_error(&self) -> &ChainError {
        match self {
            ReconcileError::Step { source, .. } => source,
        }
    }
}

/// Convenience constructor for [`ReconcileError::Step`].
pub(crate) fn step_err(
    index: usize,
    principal: Address,
    step: Step,
) -> impl FnOnce(ChainError) -> ReconcileError {
    move |source| ReconcileError::Step {
        index,
        principal,
        step,
        source,
    }
}
