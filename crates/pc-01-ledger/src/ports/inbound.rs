//! # Inbound Ports (Driving Ports)
//!
//! The stub a contract sees while it executes inside a transaction.

use chrono::{DateTime, Utc};

use crate::domain::{Identity, StateError, StateKey, TxId};

/// Execution environment handed to contract code.
///
/// Reads see committed state only and are recorded in the read set.
/// Writes are buffered into the write set and become visible after the
/// transaction commits.
pub trait ChaincodeStub: Send {
    fn tx_id(&self) -> &TxId;

    fn tx_timestamp(&self) -> DateTime<Utc>;

    /// Submitting organization, if the channel resolved one.
    fn creator(&self) -> Option<&Identity>;

    fn get_state(&mut self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError>;

    fn put_state(&mut self, key: StateKey, value: Vec<u8>) -> Result<(), StateError>;
}
