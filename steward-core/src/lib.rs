//! Steward core library — domain types, config loading, errors.
//!
//! - [`types`] — addresses, namespace key, entries, run context
//! - [`error`] — [`ConfigError`]
//! - [`config`] — YAML load / validate

pub mod config;
pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::{
    derivation_path, parse_address, DelegationConfig, DelegationEntry, NamespaceKey, RunContext,
    RunMode, SeedPhrase,
};
