//! # Provenance Event Store
//!
//! Append-only mapping from commit identifier to event. Records are written
//! once under the transaction's own id and never updated or deleted.

use pc_01_ledger::{ChaincodeStub, TxId};
use provenance_telemetry::metrics;
use tracing::{debug, warn};

use super::entities::ProvenanceEvent;
use super::keys::event_key;
use crate::errors::{ProvenanceError, Result};

pub struct EventStore;

impl EventStore {
    /// Store `event` under the current transaction id and return that id.
    pub fn append(stub: &mut dyn ChaincodeStub, event: &ProvenanceEvent) -> Result<TxId> {
        let tx_id = stub.tx_id().clone();
        let key = event_key(&tx_id)?;
        let bytes = serde_json::to_vec(event).map_err(|e| {
            ProvenanceError::InvalidArgument(format!("failed to marshal event JSON: {}", e))
        })?;
        debug!(tx_id = %tx_id, event_type = event.event_type(), bytes = bytes.len(), "Appending event");
        stub.put_state(key, bytes)?;
        Ok(tx_id)
    }

    pub fn get(stub: &mut dyn ChaincodeStub, tx_id: &TxId) -> Result<ProvenanceEvent> {
        let key = event_key(tx_id)?;
        let bytes = stub
            .get_state(&key)?
            .ok_or_else(|| ProvenanceError::EventNotFound { tx_id: tx_id.clone() })?;
        serde_json::from_slice(&bytes).map_err(|e| ProvenanceError::MalformedRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Events for `tx_ids`, in the same order.
    ///
    /// Missing or undecodable records are logged and skipped. Storage
    /// failures still abort the traversal.
    pub fn history(stub: &mut dyn ChaincodeStub, tx_ids: &[TxId]) -> Result<Vec<ProvenanceEvent>> {
        let mut events = Vec::with_capacity(tx_ids.len());
        for tx_id in tx_ids {
            match Self::get(stub, tx_id) {
                Ok(event) => events.push(event),
                Err(e @ (ProvenanceError::EventNotFound { .. } | ProvenanceError::MalformedRecord { .. })) => {
                    warn!(tx_id = %tx_id, error = %e, "Skipping history entry");
                    metrics::HISTORY_ENTRIES_SKIPPED.inc();
                }
                Err(e) => return Err(e),
            }
        }
        Ok(events)
    }
}
