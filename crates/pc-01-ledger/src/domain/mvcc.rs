//! # MVCC Validation
//!
//! Commit-time optimistic concurrency control. Every transaction in a block
//! is checked, in order, against the committed state plus the writes of the
//! valid transactions before it in the same block:
//!
//! 1. A tx id already committed, or seen earlier in the block, is a
//!    duplicate.
//! 2. A read of a key written by an earlier valid transaction in the block
//!    is a conflict.
//! 3. A read whose recorded version differs from the committed version is a
//!    conflict. Absent versus present counts as a difference.
//!
//! Invalid transactions contribute no writes. Nothing is merged or retried.

use std::collections::{BTreeMap, HashSet};

use super::entities::{StateKey, TxId, Version, VersionedValue};
use super::errors::StateError;
use super::transaction::{Block, TransactionEnvelope, ValidationCode};
use crate::ports::{UpdateBatch, VersionedStore};

/// Validate a block and build the update batch for its valid transactions.
pub fn validate_block(
    store: &dyn VersionedStore,
    block: &Block,
) -> Result<(Vec<ValidationCode>, UpdateBatch), StateError> {
    let mut codes = Vec::with_capacity(block.transactions.len());
    let mut writes: BTreeMap<StateKey, VersionedValue> = BTreeMap::new();
    let mut seen: HashSet<&TxId> = HashSet::with_capacity(block.transactions.len());
    let mut tx_ids = Vec::with_capacity(block.transactions.len());

    for (tx_num, tx) in block.transactions.iter().enumerate() {
        let code = if !seen.insert(&tx.tx_id) || store.contains_tx(&tx.tx_id)? {
            ValidationCode::DuplicateTxId
        } else {
            check_reads(store, tx, &writes)?
        };

        if code.is_valid() {
            let version = Version::new(block.number, tx_num as u64);
            for (key, value) in &tx.rwset.writes {
                writes.insert(
                    key.clone(),
                    VersionedValue {
                        value: value.clone(),
                        version,
                    },
                );
            }
        }

        tx_ids.push(tx.tx_id.clone());
        codes.push(code);
    }

    let batch = UpdateBatch {
        block_num: block.number,
        block_hash: block.hash(),
        writes,
        tx_ids,
    };
    Ok((codes, batch))
}

fn check_reads(
    store: &dyn VersionedStore,
    tx: &TransactionEnvelope,
    block_writes: &BTreeMap<StateKey, VersionedValue>,
) -> Result<ValidationCode, StateError> {
    for (key, observed) in &tx.rwset.reads {
        if block_writes.contains_key(key) {
            return Ok(conflict(key));
        }
        let committed = store.get(key)?.map(|v| v.version);
        if committed != *observed {
            return Ok(conflict(key));
        }
    }
    Ok(ValidationCode::Valid)
}

fn conflict(key: &StateKey) -> ValidationCode {
    ValidationCode::MvccReadConflict {
        key: key.to_string(),
    }
}
