//! Transaction simulation against committed state.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::trace;

use crate::domain::{
    Identity, ReadWriteSet, StateError, StateKey, TransactionEnvelope, TxContext, TxId,
};
use crate::ports::{ChaincodeStub, VersionedStore};

/// Executes contract code for one transaction and captures its read/write
/// set.
///
/// Reads never observe the transaction's own buffered writes.
pub struct TxSimulator {
    ctx: TxContext,
    store: Arc<dyn VersionedStore>,
    rwset: ReadWriteSet,
    read_only: bool,
}

impl TxSimulator {
    pub fn new(ctx: TxContext, store: Arc<dyn VersionedStore>) -> Self {
        Self {
            ctx,
            store,
            rwset: ReadWriteSet::new(),
            read_only: false,
        }
    }

    /// Simulator for evaluation queries; `put_state` fails.
    pub fn query(ctx: TxContext, store: Arc<dyn VersionedStore>) -> Self {
        Self {
            read_only: true,
            ..Self::new(ctx, store)
        }
    }

    pub fn context(&self) -> &TxContext {
        &self.ctx
    }

    pub fn rwset(&self) -> &ReadWriteSet {
        &self.rwset
    }

    /// Package the captured read/write set for ordering.
    pub fn into_envelope(self, response: Vec<u8>) -> TransactionEnvelope {
        TransactionEnvelope {
            tx_id: self.ctx.tx_id,
            creator: self.ctx.creator,
            timestamp: self.ctx.timestamp,
            rwset: self.rwset,
            response,
        }
    }
}

impl ChaincodeStub for TxSimulator {
    fn tx_id(&self) -> &TxId {
        &self.ctx.tx_id
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.ctx.timestamp
    }

    fn creator(&self) -> Option<&Identity> {
        self.ctx.creator.as_ref()
    }

    fn get_state(&mut self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError> {
        let committed = self.store.get(key)?;
        let version = committed.as_ref().map(|v| v.version);
        trace!(tx_id = %self.ctx.tx_id, key = %key, ?version, "get_state");
        self.rwset.record_read(key.clone(), version);
        Ok(committed.map(|v| v.value))
    }

    fn put_state(&mut self, key: StateKey, value: Vec<u8>) -> Result<(), StateError> {
        if self.read_only {
            return Err(StateError::ReadOnly(key.to_string()));
        }
        self.rwset.record_write(key, value);
        Ok(())
    }
}
