//! # steward-sync
//!
//! Sequential, fail-fast reconciliation of a delegate registry.
//!
//! Call [`reconcile::run`] with a loaded config, a [`DelegationRegistry`]
//! and the run's [`SignerResolver`].
//!
//! [`DelegationRegistry`]: steward_chain::DelegationRegistry
//! [`SignerResolver`]: steward_chain::SignerResolver

pub mod error;
pub mod reconcile;
pub mod report;

pub use error::{ReconcileError, Step};
pub use reconcile::{run, RunOptions};
pub use report::{EntryOutcome, EntryReport, RunReport};
