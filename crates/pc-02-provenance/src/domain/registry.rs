//! # Asset Registry
//!
//! Asset id → current stage and ordered history. Every mutation is a
//! read-modify-write of a single asset key plus one fresh event key, which
//! is what lets commit-time MVCC catch concurrent updates to the same asset.

use pc_01_ledger::{ChaincodeStub, TxId};
use tracing::debug;

use super::entities::{Asset, LifecycleStage, ProvenanceEvent};
use super::event_store::EventStore;
use super::keys::asset_key;
use crate::errors::{ProvenanceError, Result};

pub struct AssetRegistry;

impl AssetRegistry {
    pub fn exists(stub: &mut dyn ChaincodeStub, asset_id: &str) -> Result<bool> {
        let key = asset_key(asset_id)?;
        Ok(stub.get_state(&key)?.is_some())
    }

    pub fn read(stub: &mut dyn ChaincodeStub, asset_id: &str) -> Result<Asset> {
        let key = asset_key(asset_id)?;
        let bytes = stub.get_state(&key)?.ok_or_else(|| ProvenanceError::NotFound {
            asset_id: asset_id.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ProvenanceError::MalformedRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Register a new asset whose history starts with `event`.
    pub fn create(
        stub: &mut dyn ChaincodeStub,
        asset_id: &str,
        owner: &str,
        initial_stage: LifecycleStage,
        event: &ProvenanceEvent,
    ) -> Result<TxId> {
        if Self::exists(stub, asset_id)? {
            return Err(ProvenanceError::AlreadyExists {
                asset_id: asset_id.to_string(),
            });
        }
        let tx_id = EventStore::append(stub, event)?;
        let asset = Asset::new(asset_id, owner, initial_stage, tx_id.clone());
        Self::write(stub, &asset)?;
        debug!(asset_id = asset_id, stage = %initial_stage, tx_id = %tx_id, "Asset created");
        Ok(tx_id)
    }

    /// Read the asset, then [`AssetRegistry::advance`] it.
    pub fn append_transition(
        stub: &mut dyn ChaincodeStub,
        asset_id: &str,
        new_stage: LifecycleStage,
        event: &ProvenanceEvent,
    ) -> Result<TxId> {
        let asset = Self::read(stub, asset_id)?;
        Self::advance(stub, asset, new_stage, event)
    }

    /// Append `event` and rewrite an asset already read in this
    /// transaction.
    pub fn advance(
        stub: &mut dyn ChaincodeStub,
        mut asset: Asset,
        new_stage: LifecycleStage,
        event: &ProvenanceEvent,
    ) -> Result<TxId> {
        let tx_id = EventStore::append(stub, event)?;
        let from = asset.current_lifecycle_stage;
        asset.current_lifecycle_stage = new_stage;
        asset.history_tx_ids.push(tx_id.clone());
        Self::write(stub, &asset)?;
        debug!(
            asset_id = %asset.asset_id,
            from = %from,
            to = %new_stage,
            history_len = asset.history_tx_ids.len(),
            "Asset advanced"
        );
        Ok(tx_id)
    }

    fn write(stub: &mut dyn ChaincodeStub, asset: &Asset) -> Result<()> {
        let key = asset_key(&asset.asset_id)?;
        let bytes = serde_json::to_vec(asset).map_err(|e| {
            ProvenanceError::InvalidArgument(format!("failed to marshal asset JSON: {}", e))
        })?;
        stub.put_state(key, bytes)?;
        Ok(())
    }
}
