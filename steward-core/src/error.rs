//! Error types for steward-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating delegation config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file did not exist at the expected path.
    #[error("delegation config not found at {path}")]
    NotFound { path: PathBuf },

    /// YAML parse error on load, with file path and line context from serde_yaml.
    #[error("failed to parse delegation config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML parse error for config supplied without a backing file.
    #[error("failed to parse delegation config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A principal, delegate, or registry value is not a usable address.
    #[error("invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    /// Two principals normalize to the same address.
    #[error("principal {address} is configured more than once (entries {first} and {second})")]
    DuplicatePrincipal {
        address: String,
        first: usize,
        second: usize,
    },

    /// The namespace label cannot be packed into a bytes32 key.
    #[error("invalid namespace label '{label}': {reason}")]
    InvalidNamespace { label: String, reason: String },
}
