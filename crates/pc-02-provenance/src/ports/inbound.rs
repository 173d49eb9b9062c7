//! # Driving Ports (API - Inbound)
//!
//! Operations exposed to submission and query clients. Mutating calls
//! return the commit identifier of the event they appended.

use async_trait::async_trait;
use pc_01_ledger::{Identity, TxId};

use crate::domain::{Asset, ContentHash, Evidence, HistoryResult};
use crate::errors::Result;

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialCertificationRequest {
    pub asset_id: String,
    pub material_type: String,
    pub material_batch_id: String,
    pub supplier_id: String,
    pub evidence: Evidence,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintJobStartRequest {
    pub asset_id: String,
    pub machine_id: String,
    pub material_batch_used_id: String,
    pub design_file_hash: ContentHash,
    pub build_job_id: String,
    pub evidence: Evidence,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintJobCompletionRequest {
    pub asset_id: String,
    pub build_job_id: String,
    pub inspection_result: String,
    pub evidence: Evidence,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QaCertifyRequest {
    pub asset_id: String,
    pub test_standard: String,
    pub test_result: String,
    pub certificate_id: String,
    pub evidence: Evidence,
}

/// Generic transition. `event_type` must name a lifecycle stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddHistoryEventRequest {
    pub asset_id: String,
    pub event_type: String,
    pub evidence: Evidence,
}

// =============================================================================
// API
// =============================================================================

/// Primary API of the provenance subsystem.
///
/// `caller` is the organization resolved by the submission channel; `None`
/// means it could not be resolved and every mutating call fails with
/// `IdentityUnavailable`.
#[async_trait]
pub trait ProvenanceApi: Send + Sync {
    async fn create_material_certification(
        &self,
        caller: Option<Identity>,
        request: MaterialCertificationRequest,
    ) -> Result<TxId>;

    async fn create_print_job_start(
        &self,
        caller: Option<Identity>,
        request: PrintJobStartRequest,
    ) -> Result<TxId>;

    async fn create_print_job_completion(
        &self,
        caller: Option<Identity>,
        request: PrintJobCompletionRequest,
    ) -> Result<TxId>;

    async fn create_qa_certify(&self, caller: Option<Identity>, request: QaCertifyRequest) -> Result<TxId>;

    async fn add_history_event(
        &self,
        caller: Option<Identity>,
        request: AddHistoryEventRequest,
    ) -> Result<TxId>;

    async fn read_asset(&self, asset_id: &str) -> Result<Asset>;

    /// Events in `historyTxIDs` order; unreadable entries are skipped.
    async fn get_asset_history(&self, asset_id: &str) -> Result<HistoryResult>;

    async fn asset_exists(&self, asset_id: &str) -> Result<bool>;
}
