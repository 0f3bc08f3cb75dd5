pub mod check;
pub mod derive;
pub mod run;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use steward_chain::{connect_http, AnvilNetwork, SignerResolver, SnapshotRegistry};
use steward_core::{
    config::{self, DEFAULT_CONFIG_FILE},
    types::LOCAL_NETWORK,
    DelegationConfig, RunContext, RunMode,
};

/// RPC endpoint assumed for `--network localhost`.
pub const DEFAULT_LOCAL_RPC: &str = "http://127.0.0.1:8545";

/// `--config` shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Delegation config file (principal → delegate mapping).
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILE, env = "STEWARD_CONFIG")]
    pub config: PathBuf,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<DelegationConfig> {
        config::load_at(&self.config)
            .with_context(|| format!("failed to load '{}'", self.config.display()))
    }
}

/// Flags for subcommands that talk to a node.
#[derive(Args, Debug)]
pub struct NetworkArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Target network; `localhost` impersonates principals on a local fork.
    #[arg(long, short = 'n', env = "STEWARD_NETWORK")]
    pub network: String,

    /// JSON-RPC endpoint. Defaults to http://127.0.0.1:8545 for localhost.
    #[arg(long, env = "STEWARD_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Emit the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

/// Everything a reconciliation needs, wired once per invocation.
pub struct Session {
    pub config: DelegationConfig,
    pub registry: SnapshotRegistry,
    pub resolver: SignerResolver,
}

impl NetworkArgs {
    pub fn mode(&self) -> RunMode {
        RunMode::from_network(&self.network)
    }

    fn rpc_url(&self) -> Result<String> {
        match (&self.rpc_url, self.mode()) {
            (Some(url), _) => Ok(url.clone()),
            (None, RunMode::ForkedLocal) => Ok(DEFAULT_LOCAL_RPC.to_owned()),
            (None, RunMode::Production) => bail!(
                "--rpc-url is required for network '{}' (only '{LOCAL_NETWORK}' has a default)",
                self.network
            ),
        }
    }

    /// Load config, read `$MNEMONIC`, and connect. No RPC calls are made yet.
    pub fn session(&self) -> Result<Session> {
        let config = self.config.load()?;
        let context = RunContext::from_env(self.mode());
        let provider = connect_http(&self.rpc_url()?)
            .with_context(|| format!("cannot connect to network '{}'", self.network))?;
        let registry = SnapshotRegistry::new(config.registry, provider.clone());
        let resolver =
            SignerResolver::for_context(&context, Arc::new(AnvilNetwork::new(provider)));
        Ok(Session {
            config,
            registry,
            resolver,
        })
    }
}

/// Drive one future to completion; the reconciliation is strictly sequential.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    Ok(runtime.block_on(future))
}
