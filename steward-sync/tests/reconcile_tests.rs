//! Driver behaviour against in-memory registry and test-node fakes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy_primitives::{address, Address, TxHash, B256, U256};
use async_trait::async_trait;

use steward_chain::{
    ChainError, DelegationRegistry, ResolvedSigner, SignerResolver, TestNetwork, GAS_TOP_UP_WEI,
};
use steward_core::{config, DelegationConfig, NamespaceKey, RunContext, RunMode, SeedPhrase};
use steward_sync::{run, EntryOutcome, RunOptions, Step};

const TEST_PHRASE: &str = "test test test test test test test test test test test junk";

// Accounts 0 and 1 of TEST_PHRASE.
const A: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
const B: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");

const X: Address = address!("1111111111111111111111111111111111111111");
const Y: Address = address!("2222222222222222222222222222222222222222");
const Z: Address = address!("3333333333333333333333333333333333333333");

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct SentTx {
    from: Address,
    namespace: B256,
    delegate: Address,
}

#[derive(Default)]
struct FakeRegistry {
    state: Mutex<HashMap<Address, Address>>,
    reads: Mutex<Vec<Address>>,
    sent: Mutex<Vec<SentTx>>,
    unreachable_for: Option<Address>,
}

impl FakeRegistry {
    fn with_state(pairs: &[(Address, Address)]) -> Self {
        let registry = Self::default();
        registry.state.lock().unwrap().extend(pairs.iter().copied());
        registry
    }

    fn sent(&self) -> Vec<SentTx> {
        self.sent.lock().unwrap().clone()
    }

    fn reads(&self) -> Vec<Address> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl DelegationRegistry for FakeRegistry {
    async fn current_delegate(
        &self,
        principal: Address,
        _namespace: &NamespaceKey,
    ) -> Result<Address, ChainError> {
        self.reads.lock().unwrap().push(principal);
        if self.unreachable_for == Some(principal) {
            return Err(ChainError::Connectivity {
                operation: "delegation()",
                message: "connection refused".into(),
            });
        }
        Ok(self
            .state
            .lock()
            .unwrap()
            .get(&principal)
            .copied()
            .unwrap_or(Address::ZERO))
    }

    async fn set_delegate(
        &self,
        signer: &ResolvedSigner,
        namespace: &NamespaceKey,
        delegate: Address,
    ) -> Result<TxHash, ChainError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentTx {
            from: signer.address(),
            namespace: namespace.id(),
            delegate,
        });
        self.state.lock().unwrap().insert(signer.address(), delegate);
        Ok(B256::with_last_byte(sent.len() as u8))
    }
}

#[derive(Default)]
struct FakeNode {
    impersonated: Mutex<Vec<Address>>,
    balances: Mutex<HashMap<Address, U256>>,
}

#[async_trait]
impl TestNetwork for FakeNode {
    async fn impersonate(&self, account: Address) -> Result<(), ChainError> {
        self.impersonated.lock().unwrap().push(account);
        Ok(())
    }

    async fn balance(&self, account: Address) -> Result<U256, ChainError> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&account)
            .copied()
            .unwrap_or_default())
    }

    async fn set_balance(&self, account: Address, amount: U256) -> Result<(), ChainError> {
        self.balances.lock().unwrap().insert(account, amount);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_of(pairs: &[(Address, Address)]) -> DelegationConfig {
    let mut yaml = String::from("delegations:\n");
    for (principal, delegate) in pairs {
        yaml.push_str(&format!("  \"{principal}\": \"{delegate}\"\n"));
    }
    config::from_yaml_str(&yaml).expect("config")
}

fn production(phrase: Option<&str>) -> SignerResolver {
    let context = RunContext::new(RunMode::Production, phrase.and_then(SeedPhrase::new));
    SignerResolver::for_context(&context, Arc::new(FakeNode::default()))
}

fn forked(node: Arc<FakeNode>) -> SignerResolver {
    SignerResolver::for_context(&RunContext::new(RunMode::ForkedLocal, None), node)
}

// ---------------------------------------------------------------------------
// 1. Matching and submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_mismatched_entry_is_submitted_at_its_index() {
    let config = config_of(&[(A, X), (B, Y)]);
    let registry = FakeRegistry::with_state(&[(A, X), (B, Z)]);

    let report = run(&config, &registry, &production(Some(TEST_PHRASE)), RunOptions::default())
        .await
        .expect("run");

    assert_eq!(report.entries[0].outcome, EntryOutcome::AlreadyCorrect);
    match &report.entries[1].outcome {
        EntryOutcome::Submitted { signer, .. } => assert_eq!(*signer, B),
        other => panic!("expected submission, got {other:?}"),
    }
    assert_eq!(report.entries[1].current, Z);
    assert_eq!(
        registry.sent(),
        vec![SentTx {
            from: B,
            namespace: config.namespace.id(),
            delegate: Y,
        }]
    );
    assert_eq!(report.transactions().len(), 1);
}

#[tokio::test]
async fn matched_entries_never_resolve_a_signer() {
    // A missing seed phrase would fail resolution if it were attempted.
    let config = config_of(&[(A, X), (B, Y)]);
    let registry = FakeRegistry::with_state(&[(A, X), (B, Y)]);

    let report = run(&config, &registry, &production(None), RunOptions::default())
        .await
        .expect("run");

    assert_eq!(report.already_correct(), 2);
    assert!(registry.sent().is_empty());
}

#[tokio::test]
async fn target_case_does_not_matter() {
    let yaml = format!(
        "delegations:\n  \"{}\": \"0x{}\"\n",
        A,
        "ABCDEF0123456789ABCDEF0123456789ABCDEF01"
    );
    let config = config::from_yaml_str(&yaml).expect("config");
    let on_chain = address!("abcdef0123456789abcdef0123456789abcdef01");
    let registry = FakeRegistry::with_state(&[(A, on_chain)]);

    let report = run(&config, &registry, &production(None), RunOptions::default())
        .await
        .expect("run");

    assert_eq!(report.entries[0].outcome, EntryOutcome::AlreadyCorrect);
    assert!(registry.sent().is_empty());
}

#[tokio::test]
async fn rerun_after_success_is_a_noop() {
    let config = config_of(&[(A, X), (B, Y)]);
    let registry = FakeRegistry::default();
    let resolver = forked(Arc::new(FakeNode::default()));

    let first = run(&config, &registry, &resolver, RunOptions::default())
        .await
        .expect("first run");
    assert_eq!(first.transactions().len(), 2);

    let second = run(&config, &registry, &resolver, RunOptions::default())
        .await
        .expect("second run");
    assert_eq!(second.already_correct(), 2);
    assert_eq!(registry.sent().len(), 2);
}

// ---------------------------------------------------------------------------
// 2. Forked-local signing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forked_local_impersonates_and_funds_principal() {
    let config = config_of(&[(A, X)]);
    let registry = FakeRegistry::default();
    let node = Arc::new(FakeNode::default());

    let report = run(&config, &registry, &forked(node.clone()), RunOptions::default())
        .await
        .expect("run");

    assert_eq!(*node.impersonated.lock().unwrap(), vec![A]);
    assert_eq!(node.balances.lock().unwrap().get(&A), Some(&GAS_TOP_UP_WEI));
    assert_eq!(registry.sent()[0].from, A);
    assert_eq!(report.mode, RunMode::ForkedLocal);
}

// ---------------------------------------------------------------------------
// 3. Halting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn production_without_seed_phrase_halts_before_any_write() {
    let config = config_of(&[(A, X), (B, Y)]);
    let registry = FakeRegistry::default();

    let err = run(&config, &registry, &production(None), RunOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.step(), Step::ResolveSigner);
    assert!(matches!(err.chain_error(), ChainError::MissingCredential));
    assert!(registry.sent().is_empty());
    assert_eq!(registry.reads(), vec![A], "second entry must not be read");
}

#[tokio::test]
async fn reordered_config_trips_signer_mismatch_and_halts() {
    // B first means B is signed with index 0, which derives A's key.
    let config = config_of(&[(B, Y), (A, X)]);
    let registry = FakeRegistry::default();

    let err = run(&config, &registry, &production(Some(TEST_PHRASE)), RunOptions::default())
        .await
        .unwrap_err();

    match err.chain_error() {
        ChainError::SignerMismatch {
            principal, derived, ..
        } => {
            assert_eq!(*principal, B);
            assert_eq!(*derived, A);
        }
        other => panic!("expected SignerMismatch, got {other}"),
    }
    assert!(err.chain_error().is_security_fault());
    assert!(err.to_string().contains("entry 0"), "got: {err}");
    assert!(registry.sent().is_empty());
    assert_eq!(registry.reads(), vec![B]);
}

#[tokio::test]
async fn read_failure_halts_and_keeps_earlier_submissions() {
    let config = config_of(&[(A, X), (B, Y)]);
    let registry = FakeRegistry {
        unreachable_for: Some(B),
        ..FakeRegistry::default()
    };

    let err = run(&config, &registry, &forked(Arc::new(FakeNode::default())), RunOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.step(), Step::Read);
    assert!(matches!(err.chain_error(), ChainError::Connectivity { .. }));
    assert_eq!(registry.sent().len(), 1);
    assert_eq!(registry.sent()[0].from, A);
}

// ---------------------------------------------------------------------------
// 4. Dry run
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dry_run_reports_mismatches_without_signing() {
    let config = config_of(&[(A, X), (B, Y)]);
    let registry = FakeRegistry::with_state(&[(A, X)]);

    let report = run(
        &config,
        &registry,
        &production(None),
        RunOptions { dry_run: true },
    )
    .await
    .expect("dry run");

    assert!(report.dry_run);
    assert_eq!(report.entries[1].outcome, EntryOutcome::WouldSubmit);
    assert_eq!(report.entries[1].current, Address::ZERO);
    assert!(registry.sent().is_empty());
}
