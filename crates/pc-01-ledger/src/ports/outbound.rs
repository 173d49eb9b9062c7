//! # Outbound Ports (Driven Ports)
//!
//! Interfaces the ledger depends on: versioned world-state storage and a
//! clock for transaction timestamps.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::domain::{Hash, StateError, StateKey, TxId, VersionedValue};

/// Everything a committed block changes, applied in one atomic step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateBatch {
    pub block_num: u64,
    pub block_hash: Hash,
    /// Writes of valid transactions, stamped with their commit version.
    pub writes: BTreeMap<StateKey, VersionedValue>,
    /// Every transaction id in the block, valid or not.
    pub tx_ids: Vec<TxId>,
}

/// Versioned key-value world state.
///
/// Height is the number of committed blocks. `apply_block` must make the
/// writes, the tx ids and the new height visible together or not at all.
pub trait VersionedStore: Send + Sync {
    fn get(&self, key: &StateKey) -> Result<Option<VersionedValue>, StateError>;

    fn height(&self) -> Result<u64, StateError>;

    fn contains_tx(&self, tx_id: &TxId) -> Result<bool, StateError>;

    /// Hash of the last committed block, or the genesis sentinel.
    fn last_block_hash(&self) -> Result<Hash, StateError>;

    fn apply_block(&self, batch: UpdateBatch) -> Result<(), StateError>;
}

/// Abstract time source so tests can pin transaction timestamps.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
