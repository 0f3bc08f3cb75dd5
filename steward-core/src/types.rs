//! Domain types for delegation reconciliation.
//!
//! Addresses are held as [`Address`] everywhere past the config boundary, so
//! equality is byte equality and never depends on the case of the input.

use std::fmt;

use alloy_primitives::{address, Address, B256};
use serde::Serialize;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Shared delegate registry deployed on mainnet and most L2s.
pub const DEFAULT_REGISTRY: Address = address!("469788fe6e9e9681c6ebf3bf78e7fd26fc015446");

/// Label packed into the registry's `bytes32 id` argument.
pub const DEFAULT_NAMESPACE_LABEL: &str = "unlock-protocol.eth";

/// BIP-44 Ethereum account prefix; the entry index is appended.
pub const DERIVATION_PATH_PREFIX: &str = "m/44'/60'/0'/0/";

/// Network name that selects the forked-local signing strategy.
pub const LOCAL_NETWORK: &str = "localhost";

/// Environment variable holding the production seed phrase.
pub const SEED_PHRASE_ENV: &str = "MNEMONIC";

/// Derivation path for the entry at `index` in configuration order.
pub fn derivation_path(index: usize) -> String {
    format!("{DERIVATION_PATH_PREFIX}{index}")
}

// ---------------------------------------------------------------------------
// Address normalization
// ---------------------------------------------------------------------------

/// Parse a user-supplied address into its canonical form.
///
/// All-lowercase and all-uppercase hex are accepted as-is. Mixed-case input is
/// treated as EIP-55 checksummed and rejected if the checksum does not match.
pub fn parse_address(raw: &str) -> Result<Address, ConfigError> {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let invalid = |reason: String| ConfigError::InvalidAddress {
        value: raw.to_owned(),
        reason,
    };

    if hex.len() != 40 {
        return Err(invalid(format!("expected 40 hex digits, found {}", hex.len())));
    }

    let address: Address = format!("0x{hex}")
        .parse()
        .map_err(|e| invalid(format!("{e}")))?;

    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    if has_upper && has_lower {
        let checksummed = address.to_checksum(None);
        if &checksummed[2..] != hex {
            return Err(invalid(format!("bad checksum, expected {checksummed}")));
        }
    }

    Ok(address)
}

// ---------------------------------------------------------------------------
// Namespace key
// ---------------------------------------------------------------------------

/// The registry `bytes32 id` scoping delegations to one application.
///
/// Built like Solidity's `formatBytes32String`: UTF-8 bytes of the label,
/// right-padded with zeros. One byte is reserved for the terminator, so the
/// label may be at most 31 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceKey {
    label: String,
    id: B256,
}

impl NamespaceKey {
    pub fn from_label(label: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidNamespace {
            label: label.to_owned(),
            reason: reason.to_owned(),
        };
        if label.is_empty() {
            return Err(invalid("label is empty"));
        }
        if label.len() > 31 {
            return Err(invalid("label exceeds 31 bytes"));
        }
        Ok(Self {
            label: label.to_owned(),
            id: B256::right_padding_from(label.as_bytes()),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn id(&self) -> B256 {
        self.id
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// One configured principal → target pair.
///
/// `index` is the entry's position in configuration order and doubles as the
/// derivation index for production signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegationEntry {
    pub index: usize,
    pub principal: Address,
    pub delegate: Address,
}

impl DelegationEntry {
    pub fn derivation_path(&self) -> String {
        derivation_path(self.index)
    }
}

/// Validated, ordered delegation configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationConfig {
    pub registry: Address,
    pub namespace: NamespaceKey,
    pub entries: Vec<DelegationEntry>,
}

impl DelegationConfig {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Run context
// ---------------------------------------------------------------------------

/// Signing strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Live network; keys derived from the seed phrase.
    Production,
    /// Local fork; principals are impersonated.
    ForkedLocal,
}

impl RunMode {
    pub fn from_network(name: &str) -> Self {
        if name == LOCAL_NETWORK {
            RunMode::ForkedLocal
        } else {
            RunMode::Production
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Production => write!(f, "production"),
            RunMode::ForkedLocal => write!(f, "forked-local"),
        }
    }
}

/// BIP-39 seed phrase. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedPhrase(String);

impl SeedPhrase {
    /// Collapses whitespace runs to single spaces and lowercases the words.
    /// Returns `None` for blank input, which counts as no credential.
    pub fn new(phrase: impl AsRef<str>) -> Option<Self> {
        let words: Vec<&str> = phrase.as_ref().split_whitespace().collect();
        if words.is_empty() {
            None
        } else {
            Some(Self(words.join(" ").to_lowercase()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeedPhrase(<redacted>)")
    }
}

/// Run-wide inputs taken from the environment once at startup.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub mode: RunMode,
    pub seed_phrase: Option<SeedPhrase>,
}

impl RunContext {
    pub fn new(mode: RunMode, seed_phrase: Option<SeedPhrase>) -> Self {
        Self { mode, seed_phrase }
    }

    /// Read the seed phrase from `$MNEMONIC`.
    pub fn from_env(mode: RunMode) -> Self {
        let seed_phrase = std::env::var(SEED_PHRASE_ENV).ok().and_then(SeedPhrase::new);
        Self::new(mode, seed_phrase)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
