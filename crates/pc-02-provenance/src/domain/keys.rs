//! World-state keys for the two provenance keyspaces.
//!
//! Both are composite keys, so an asset id can never collide with an event
//! key no matter what characters it contains.

use pc_01_ledger::{StateKey, TxId};

use crate::errors::ProvenanceError;

pub const ASSET_OBJECT_TYPE: &str = "ASSET";
pub const EVENT_OBJECT_TYPE: &str = "EVENT";

pub fn asset_key(asset_id: &str) -> Result<StateKey, ProvenanceError> {
    if asset_id.is_empty() {
        return Err(ProvenanceError::InvalidArgument("assetID must not be empty".to_string()));
    }
    StateKey::composite(ASSET_OBJECT_TYPE, &[asset_id])
        .map_err(|e| ProvenanceError::InvalidArgument(format!("assetID {:?}: {}", asset_id, e)))
}

pub fn event_key(tx_id: &TxId) -> Result<StateKey, ProvenanceError> {
    StateKey::composite(EVENT_OBJECT_TYPE, &[tx_id.as_str()])
        .map_err(|e| ProvenanceError::InvalidArgument(format!("tx id {}: {}", tx_id, e)))
}
