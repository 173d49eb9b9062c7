//! In-memory stub for unit tests. Writes are visible immediately, so a
//! sequence of calls behaves like a sequence of committed transactions.

use chrono::{DateTime, Utc};
use pc_01_ledger::{ChaincodeStub, Identity, StateError, StateKey, TxId};
use std::collections::HashMap;

pub struct MemoryStub {
    tx_id: TxId,
    creator: Option<Identity>,
    timestamp: DateTime<Utc>,
    state: HashMap<StateKey, Vec<u8>>,
}

impl MemoryStub {
    pub fn new(tx_id: &str) -> Self {
        Self {
            tx_id: TxId::new(tx_id),
            creator: Some(Identity::new("Org1MSP")),
            timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            state: HashMap::new(),
        }
    }

    pub fn set_tx_id(&mut self, tx_id: &str) {
        self.tx_id = TxId::new(tx_id);
    }

    pub fn set_creator(&mut self, creator: Option<Identity>) {
        self.creator = creator;
    }

    pub fn insert(&mut self, key: StateKey, value: Vec<u8>) {
        self.state.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }
}

impl ChaincodeStub for MemoryStub {
    fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn creator(&self) -> Option<&Identity> {
        self.creator.as_ref()
    }

    fn get_state(&mut self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: StateKey, value: Vec<u8>) -> Result<(), StateError> {
        self.state.insert(key, value);
        Ok(())
    }
}
