//! [`TestNetwork`] backed by the Anvil/Hardhat cheatcode RPC methods.

use alloy::primitives::{Address, U256};
use alloy::providers::ext::AnvilApi;
use alloy::providers::{DynProvider, Provider};
use async_trait::async_trait;

use crate::error::{rpc_err, ChainError};
use crate::signer::TestNetwork;

/// Cheatcode client for a locally forked node.
#[derive(Clone)]
pub struct AnvilNetwork {
    provider: DynProvider,
}

impl AnvilNetwork {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TestNetwork for AnvilNetwork {
    async fn impersonate(&self, account: Address) -> Result<(), ChainError> {
        self.provider
            .anvil_impersonate_account(account)
            .await
            .map_err(|e| rpc_err("impersonate account", e))
    }

    async fn balance(&self, account: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| rpc_err("read balance", e))
    }

    async fn set_balance(&self, account: Address, amount: U256) -> Result<(), ChainError> {
        self.provider
            .anvil_set_balance(account, amount)
            .await
            .map_err(|e| rpc_err("set balance", e))
    }
}
