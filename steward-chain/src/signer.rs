//! Signer resolution: one authorized signer per mismatched principal.
//!
//! The strategy is fixed once per run from [`RunMode`]:
//!
//! - forked-local: the node impersonates the principal and its balance is
//!   topped up so it can pay gas.
//! - production: a key is derived from the seed phrase at the entry's index
//!   and must hash to the principal's address.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use async_trait::async_trait;

use steward_core::{derivation_path, RunContext, RunMode, SeedPhrase};

use crate::error::ChainError;

/// Balance an impersonated principal is topped up to: 1 ether.
pub const GAS_TOP_UP_WEI: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Test-node controls needed for impersonation.
#[async_trait]
pub trait TestNetwork: Send + Sync {
    async fn impersonate(&self, account: Address) -> Result<(), ChainError>;
    async fn balance(&self, account: Address) -> Result<U256, ChainError>;
    async fn set_balance(&self, account: Address, amount: U256) -> Result<(), ChainError>;
}

/// Authority to send one principal's `setDelegate`.
#[derive(Debug)]
pub enum ResolvedSigner {
    /// The node sends on the principal's behalf; no key is held.
    Impersonated { address: Address },
    /// Locally held key derived from the seed phrase.
    Derived {
        signer: PrivateKeySigner,
        path: String,
    },
}

impl ResolvedSigner {
    pub fn address(&self) -> Address {
        match self {
            ResolvedSigner::Impersonated { address } => *address,
            ResolvedSigner::Derived { signer, .. } => signer.address(),
        }
    }
}

impl fmt::Display for ResolvedSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedSigner::Impersonated { address } => write!(f, "{address} (impersonated)"),
            ResolvedSigner::Derived { signer, path } => write!(f, "{} ({path})", signer.address()),
        }
    }
}

/// Run-wide signing strategy.
pub enum SignerResolver {
    Impersonate {
        network: Arc<dyn TestNetwork>,
        minimum_balance: U256,
    },
    Derive {
        seed_phrase: Option<SeedPhrase>,
    },
}

impl fmt::Debug for SignerResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerResolver::Impersonate {
                minimum_balance, ..
            } => f
                .debug_struct("Impersonate")
                .field("minimum_balance", minimum_balance)
                .finish_non_exhaustive(),
            SignerResolver::Derive { seed_phrase } => f
                .debug_struct("Derive")
                .field("seed_phrase", seed_phrase)
                .finish(),
        }
    }
}

impl SignerResolver {
    /// Pick the strategy for this run. `network` is only used in forked-local mode.
    pub fn for_context(context: &RunContext, network: Arc<dyn TestNetwork>) -> Self {
        match context.mode {
            RunMode::ForkedLocal => SignerResolver::Impersonate {
                network,
                minimum_balance: GAS_TOP_UP_WEI,
            },
            RunMode::Production => SignerResolver::Derive {
                seed_phrase: context.seed_phrase.clone(),
            },
        }
    }

    pub fn mode(&self) -> RunMode {
        match self {
            SignerResolver::Impersonate { .. } => RunMode::ForkedLocal,
            SignerResolver::Derive { .. } => RunMode::Production,
        }
    }

    /// Produce a signer for `principal`, the entry at `index` in config order.
    pub async fn resolve(
        &self,
        principal: Address,
        index: usize,
    ) -> Result<ResolvedSigner, ChainError> {
        match self {
            SignerResolver::Impersonate {
                network,
                minimum_balance,
            } => {
                network.impersonate(principal).await?;
                let balance = network.balance(principal).await?;
                if balance < *minimum_balance {
                    network.set_balance(principal, *minimum_balance).await?;
                    tracing::debug!(
                        %principal,
                        %balance,
                        top_up = %minimum_balance,
                        "topped up impersonated principal",
                    );
                }
                tracing::info!(%principal, "impersonating principal on forked network");
                Ok(ResolvedSigner::Impersonated { address: principal })
            }
            SignerResolver::Derive { seed_phrase } => {
                let seed_phrase = seed_phrase.as_ref().ok_or(ChainError::MissingCredential)?;
                let path = derivation_path(index);
                let signer = derive_signer(seed_phrase, &path)?;
                let derived = signer.address();
                if derived != principal {
                    return Err(ChainError::SignerMismatch {
                        principal,
                        derived,
                        path,
                    });
                }
                Ok(ResolvedSigner::Derived { signer, path })
            }
        }
    }
}

/// Derive the local signer at `path` from an English BIP-39 phrase.
pub fn derive_signer(seed_phrase: &SeedPhrase, path: &str) -> Result<PrivateKeySigner, ChainError> {
    let derivation_err = |e: alloy::signers::local::LocalSignerError| ChainError::KeyDerivation {
        path: path.to_owned(),
        message: e.to_string(),
    };
    MnemonicBuilder::<English>::default()
        .phrase(seed_phrase.expose())
        .derivation_path(path)
        .map_err(derivation_err)?
        .build()
        .map_err(derivation_err)
}
