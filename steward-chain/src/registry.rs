//! Delegate registry access: read current delegate, submit `setDelegate`.

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;
use async_trait::async_trait;
use url::Url;

use steward_core::NamespaceKey;

use crate::error::{contract_err, ChainError};
use crate::signer::ResolvedSigner;

sol! {
    #[sol(rpc)]
    contract DelegateRegistry {
        event SetDelegate(address indexed delegator, bytes32 indexed id, address indexed delegate);
        event ClearDelegate(address indexed delegator, bytes32 indexed id, address indexed delegate);

        function delegation(address delegator, bytes32 id) external view returns (address);
        function setDelegate(bytes32 id, address delegate) external;
        function clearDelegate(bytes32 id) external;
    }
}

/// Read/write seam over the on-chain registry.
#[async_trait]
pub trait DelegationRegistry: Send + Sync {
    /// Delegate currently recorded for `principal` under `namespace`.
    /// The zero address means none is set.
    async fn current_delegate(
        &self,
        principal: Address,
        namespace: &NamespaceKey,
    ) -> Result<Address, ChainError>;

    /// Send `setDelegate(namespace, delegate)` from `signer`'s address and
    /// return the hash once the node accepts it.
    async fn set_delegate(
        &self,
        signer: &ResolvedSigner,
        namespace: &NamespaceKey,
        delegate: Address,
    ) -> Result<TxHash, ChainError>;
}

/// HTTP provider with the default gas, nonce, and chain-id fillers.
pub fn connect_http(rpc_url: &str) -> Result<DynProvider, ChainError> {
    let url: Url = rpc_url.parse().map_err(|e: url::ParseError| ChainError::InvalidEndpoint {
        url: rpc_url.to_owned(),
        message: e.to_string(),
    })?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// The registry contract at `address`, reached through `provider`.
#[derive(Clone)]
pub struct SnapshotRegistry {
    address: Address,
    provider: DynProvider,
}

impl SnapshotRegistry {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { address, provider }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl DelegationRegistry for SnapshotRegistry {
    async fn current_delegate(
        &self,
        principal: Address,
        namespace: &NamespaceKey,
    ) -> Result<Address, ChainError> {
        let contract = DelegateRegistry::new(self.address, self.provider.clone());
        contract
            .delegation(principal, namespace.id())
            .call()
            .await
            .map_err(|e| contract_err("delegation()", e))
    }

    async fn set_delegate(
        &self,
        signer: &ResolvedSigner,
        namespace: &NamespaceKey,
        delegate: Address,
    ) -> Result<TxHash, ChainError> {
        let pending = match signer {
            // Unlocked on the node: eth_sendTransaction with `from`.
            ResolvedSigner::Impersonated { address } => {
                DelegateRegistry::new(self.address, self.provider.clone())
                    .setDelegate(namespace.id(), delegate)
                    .from(*address)
                    .send()
                    .await
            }
            ResolvedSigner::Derived { signer, .. } => {
                let wallet = EthereumWallet::from(signer.clone());
                let provider = ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_provider(self.provider.clone());
                DelegateRegistry::new(self.address, provider)
                    .setDelegate(namespace.id(), delegate)
                    .from(signer.address())
                    .send()
                    .await
            }
        }
        .map_err(|e| contract_err("setDelegate()", e))?;

        Ok(*pending.tx_hash())
    }
}
