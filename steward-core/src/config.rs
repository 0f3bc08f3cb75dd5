//! YAML delegation config.
//!
//! # File layout
//!
//! ```yaml
//! registry: "0x469788fe6e9e9681c6ebf3bf78e7fd26fc015446"  # optional
//! namespace: "unlock-protocol.eth"                          # optional
//! delegations:
//!   "0xPrincipalA": "0xTargetX"
//!   "0xPrincipalB": "0xTargetY"
//! ```
//!
//! Mapping order is significant: the n-th principal is signed with the key at
//! derivation index n.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::types::{
    parse_address, DelegationConfig, DelegationEntry, NamespaceKey, DEFAULT_NAMESPACE_LABEL,
    DEFAULT_REGISTRY,
};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "delegations.yaml";

/// On-disk shape, before address validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    registry: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
    /// Every key as written, repeats included, so `validate` sees them.
    #[serde(default, deserialize_with = "ordered_pairs")]
    delegations: Vec<(String, String)>,
}

fn ordered_pairs<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a mapping of principal address to delegate address")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(pair) = map.next_entry()? {
                pairs.push(pair);
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor)
}

/// Load and validate a config file.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<DelegationConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    let raw: RawConfig = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(raw)
}

/// Parse config held in memory.
pub fn from_yaml_str(contents: &str) -> Result<DelegationConfig, ConfigError> {
    validate(serde_yaml::from_str(contents)?)
}

fn validate(raw: RawConfig) -> Result<DelegationConfig, ConfigError> {
    let registry = match raw.registry.as_deref() {
        Some(value) => parse_address(value)?,
        None => DEFAULT_REGISTRY,
    };
    let namespace =
        NamespaceKey::from_label(raw.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE_LABEL))?;

    let mut seen = HashMap::new();
    let mut entries = Vec::with_capacity(raw.delegations.len());
    for (index, (principal, delegate)) in raw.delegations.iter().enumerate() {
        let principal = parse_address(principal)?;
        let delegate = parse_address(delegate)?;
        if let Some(first) = seen.insert(principal, index) {
            return Err(ConfigError::DuplicatePrincipal {
                address: principal.to_checksum(None),
                first,
                second: index,
            });
        }
        entries.push(DelegationEntry {
            index,
            principal,
            delegate,
        });
    }

    Ok(DelegationConfig {
        registry,
        namespace,
        entries,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
