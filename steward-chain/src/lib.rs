//! On-chain side of delegation reconciliation: registry access, signer
//! resolution, and test-node controls.

pub mod anvil;
mod error;
pub mod registry;
pub mod signer;

pub use anvil::AnvilNetwork;
pub use error::ChainError;
pub use registry::{connect_http, DelegationRegistry, SnapshotRegistry};
pub use signer::{derive_signer, ResolvedSigner, SignerResolver, TestNetwork, GAS_TOP_UP_WEI};
