//! # pc-02-provenance
//!
//! Provenance subsystem for additively manufactured parts: an asset
//! registry, an append-only event store and a lifecycle state machine,
//! executed as contract code on top of `pc-01-ledger`.
//!
//! ## Data Model
//!
//! | Keyspace | Key | Value |
//! |----------|-----|-------|
//! | Asset | composite(`ASSET`, assetID) | [`Asset`](domain::Asset), JSON |
//! | Event | composite(`EVENT`, commitID) | [`ProvenanceEvent`](domain::ProvenanceEvent), JSON |
//!
//! ## Operations
//!
//! | Function | Guard | Effect |
//! |----------|-------|--------|
//! | `CreateMaterialCertification` | asset absent | stage `MATERIAL_CERTIFIED` |
//! | `CreatePrintJobStart` | asset absent | stage `IN_PRODUCTION` |
//! | `CreatePrintJobCompletion` | asset present | stage `AWAITING_QA` |
//! | `CreateQACertify` | asset present | `CERTIFIED` or `REJECTED` |
//! | `AddHistoryEvent` | asset present | stage named by `eventType` |
//! | `ReadAsset`, `GetAssetHistory`, `AssetExists` | none | read only |
//!
//! Every mutating operation writes exactly one event key and one asset key.
//! Two concurrent mutations of the same asset cannot both commit.
//!
//! ## Usage
//!
//! ```ignore
//! use pc_02_provenance::prelude::*;
//!
//! let service = ProvenanceService::new(ledger, ContractConfig::from_env()?);
//! let tx_id = service
//!     .create_material_certification(Some(Identity::new("Org1MSP")), request)
//!     .await?;
//! let history = service.get_asset_history("A1").await?;
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod contract;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_support;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::{ContractConfig, PayloadStrategy};
    pub use crate::contract::ProvenanceContract;
    pub use crate::dispatch::ContractFunction;
    pub use crate::domain::{
        Asset, ContentHash, EventDetails, Evidence, HistoryResult, LifecycleStage,
        OnChainPayload, ProvenanceEvent, SequencePolicy, FIT_FOR_USE,
    };
    pub use crate::errors::{ProvenanceError, Result};
    pub use crate::ports::{
        AddHistoryEventRequest, MaterialCertificationRequest, PrintJobCompletionRequest,
        PrintJobStartRequest, ProvenanceApi, QaCertifyRequest,
    };
    pub use crate::service::{ProvenanceService, ServiceStats};
    pub use pc_01_ledger::{Identity, TxId};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Subsystem identifier used in log fields.
pub const SUBSYSTEM_ID: u8 = 2;
