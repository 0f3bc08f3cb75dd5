//! Error type for the chain adapter.
//!
//! Node-side failures (reverts, empty or undecodable returns) are
//! `ContractCall`; failures to reach the node at all are `Connectivity`.

use alloy::primitives::Address;
use alloy::transports::TransportError;
use thiserror::Error;

/// Error surface for registry reads/writes and signer resolution.
///
/// Every variant is fatal to a reconciliation run.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The RPC endpoint could not be reached or dropped the request.
    #[error("cannot reach node during {operation}: {message}")]
    Connectivity {
        operation: &'static str,
        message: String,
    },

    /// The node answered with an error, or the return data did not decode.
    #[error("{operation} failed: {message}")]
    ContractCall {
        operation: &'static str,
        message: String,
    },

    /// A production run needs to sign and no seed phrase was given.
    #[error("no seed phrase provided; set $MNEMONIC to sign on a production network")]
    MissingCredential,

    /// The key at the entry's derivation path is not the entry's principal.
    #[error("signer {derived} derived at {path} is not principal {principal}")]
    SignerMismatch {
        principal: Address,
        derived: Address,
        path: String,
    },

    /// The seed phrase or derivation path was rejected.
    #[error("key derivation at {path} failed: {message}")]
    KeyDerivation { path: String, message: String },

    /// `--rpc-url` is not a valid URL.
    #[error("invalid RPC endpoint '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },
}

impl ChainError {
    /// `true` for the variants that mean the wrong key would have signed.
    pub fn is_security_fault(&self) -> bool {
        matches!(self, ChainError::SignerMismatch { .. })
    }
}

/// Split transport faults from node-side errors (reverts, bad responses).
pub(crate) fn rpc_err(operation: &'static str, err: TransportError) -> ChainError {
    if err.is_transport_error() {
        ChainError::Connectivity {
            operation,
            message: err.to_string(),
        }
    } else {
        ChainError::ContractCall {
            operation,
            message: err.to_string(),
        }
    }
}

/// Unwrap transport errors from a contract call and classify them with
/// [`rpc_err`]. Everything else is a `ContractCall`.
pub(crate) fn contract_err(operation: &'static str, err: alloy::contract::Error) -> ChainError {
    match err {
        alloy::contract::Error::TransportError(err) => rpc_err(operation, err),
        other => ChainError::ContractCall {
            operation,
            message: other.to_string(),
        },
    }
}
