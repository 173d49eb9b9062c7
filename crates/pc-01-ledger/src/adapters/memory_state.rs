use crate::domain::{Hash, StateError, StateKey, TxId, Version, VersionedValue, GENESIS_PREVIOUS_HASH};
use crate::ports::{UpdateBatch, VersionedStore};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    state: HashMap<StateKey, VersionedValue>,
    tx_ids: HashSet<TxId>,
    height: u64,
    last_hash: Option<Hash>,
}

/// In-memory world state.
///
/// A single lock guards values, tx ids and height, so a block becomes
/// visible all at once.
pub struct InMemoryWorldState {
    inner: RwLock<Inner>,
}

impl InMemoryWorldState {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Write a value without going through a block.
    ///
    /// Used to inject corrupt records in tests. The value is stamped with
    /// the current height.
    pub fn insert_raw(&self, key: StateKey, value: Vec<u8>) -> Result<(), StateError> {
        let mut inner = self.inner.write().map_err(|_| StateError::LockPoisoned)?;
        let version = Version::new(inner.height, 0);
        inner.state.insert(key, VersionedValue { value, version });
        Ok(())
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> Result<usize, StateError> {
        let inner = self.inner.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(inner.state.len())
    }

    pub fn is_empty(&self) -> Result<bool, StateError> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryWorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionedStore for InMemoryWorldState {
    fn get(&self, key: &StateKey) -> Result<Option<VersionedValue>, StateError> {
        let inner = self.inner.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(inner.state.get(key).cloned())
    }

    fn height(&self) -> Result<u64, StateError> {
        let inner = self.inner.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(inner.height)
    }

    fn contains_tx(&self, tx_id: &TxId) -> Result<bool, StateError> {
        let inner = self.inner.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(inner.tx_ids.contains(tx_id))
    }

    fn last_block_hash(&self) -> Result<Hash, StateError> {
        let inner = self.inner.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(inner.last_hash.unwrap_or(GENESIS_PREVIOUS_HASH))
    }

    fn apply_block(&self, batch: UpdateBatch) -> Result<(), StateError> {
        let mut inner = self.inner.write().map_err(|_| StateError::LockPoisoned)?;
        if batch.block_num != inner.height {
            return Err(StateError::DatabaseError(format!(
                "block {} applied at height {}",
                batch.block_num, inner.height
            )));
        }
        inner.state.extend(batch.writes);
        inner.tx_ids.extend(batch.tx_ids);
        inner.height = batch.block_num + 1;
        inner.last_hash = Some(batch.block_hash);
        Ok(())
    }
}
