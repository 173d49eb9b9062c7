//! # Domain Entities for the Ledger
//!
//! Identifiers, versions and keys shared by simulation, ordering and commit.
//!
//! ## Key Namespaces
//!
//! Simple keys are arbitrary non-empty strings that do not start with
//! `0x00`. Composite keys always start with `0x00` and separate every
//! component with `0x00`, so two composite keys of different object types
//! can never be equal, and no composite key can equal a simple key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::errors::StateError;

pub type Hash = [u8; 32];

/// Separator and prefix byte for composite keys.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Hash of the block preceding block 0.
pub const GENESIS_PREVIOUS_HASH: Hash = [0u8; 32];

/// Commit identifier of a transaction.
///
/// Derived as `hex(sha256(nonce || creator))`, which makes it unique per
/// proposal and independent of the transaction content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    /// Derive a transaction id from a proposal nonce and its creator.
    pub fn generate(nonce: &[u8], creator: Option<&Identity>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(nonce);
        if let Some(identity) = creator {
            hasher.update(identity.msp_id.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Height at which a key was last written: block number plus the
/// transaction's position inside that block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub block_num: u64,
    pub tx_num: u64,
}

impl Version {
    pub fn new(block_num: u64, tx_num: u64) -> Self {
        Self { block_num, tx_num }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block_num, self.tx_num)
    }
}

/// Committed value together with the version that wrote it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: Version,
}

/// A world-state key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Create a simple key.
    ///
    /// Rejects empty keys and keys starting with the composite namespace
    /// byte, which are reserved for [`StateKey::composite`].
    pub fn simple(key: impl Into<String>) -> Result<Self, StateError> {
        let key = key.into();
        if key.is_empty() {
            return Err(StateError::InvalidKey("empty key".to_string()));
        }
        if key.starts_with(COMPOSITE_KEY_NAMESPACE) {
            return Err(StateError::InvalidKey(format!(
                "simple key {:?} starts with the composite namespace",
                key
            )));
        }
        Ok(Self(key))
    }

    /// Create a composite key `0x00 objectType 0x00 attr 0x00 ...`.
    pub fn composite(object_type: &str, attributes: &[&str]) -> Result<Self, StateError> {
        if object_type.is_empty() {
            return Err(StateError::InvalidKey("empty object type".to_string()));
        }
        let mut key = String::with_capacity(
            2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
        );
        key.push(COMPOSITE_KEY_NAMESPACE);
        for component in std::iter::once(&object_type).chain(attributes.iter()) {
            if component.contains(COMPOSITE_KEY_NAMESPACE) {
                return Err(StateError::InvalidKey(format!(
                    "component {:?} contains the namespace separator",
                    component
                )));
            }
            key.push_str(component);
            key.push(COMPOSITE_KEY_NAMESPACE);
        }
        Ok(Self(key))
    }

    pub fn is_composite(&self) -> bool {
        self.0.starts_with(COMPOSITE_KEY_NAMESPACE)
    }

    /// Split a composite key into its object type and attributes.
    pub fn split_composite(&self) -> Option<(&str, Vec<&str>)> {
        let inner = self
            .0
            .strip_prefix(COMPOSITE_KEY_NAMESPACE)?
            .strip_suffix(COMPOSITE_KEY_NAMESPACE)?;
        let mut parts = inner.split(COMPOSITE_KEY_NAMESPACE);
        let object_type = parts.next()?;
        Some((object_type, parts.collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_debug())
    }
}

/// Organizational identity of a transaction creator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub msp_id: String,
}

impl Identity {
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
        }
    }
}

/// Execution context injected by the ledger into every simulation.
///
/// The timestamp comes from the ledger's clock and the creator from the
/// submission channel; neither is a client-supplied argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxContext {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    pub creator: Option<Identity>,
}
