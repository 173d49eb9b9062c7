//! # Provenance Contract
//!
//! The contract logic executed inside a transaction. It only touches the
//! world state through a [`ChaincodeStub`], so every call is safe to run
//! again from scratch after a conflict.
//!
//! Guards run in a fixed order and all of them before the first write:
//! caller identity, arguments (including evidence against the payload
//! strategy), existence, then the lifecycle check.

use pc_01_ledger::{ChaincodeStub, TxId};
use tracing::debug;

use crate::config::ContractConfig;
use crate::dispatch::ContractFunction;
use crate::domain::{
    Asset, AssetRegistry, EventDetails, EventStore, Evidence, HistoryResult, LifecycleStage,
    LifecycleStateMachine, ProvenanceEvent, Transition,
};
use crate::errors::{ProvenanceError, Result};
use crate::ports::{
    AddHistoryEventRequest, MaterialCertificationRequest, PrintJobCompletionRequest,
    PrintJobStartRequest, QaCertifyRequest,
};

#[derive(Clone, Debug, Default)]
pub struct ProvenanceContract {
    config: ContractConfig,
    machine: LifecycleStateMachine,
}

impl ProvenanceContract {
    pub fn new(config: ContractConfig) -> Self {
        let machine = LifecycleStateMachine::new(config.sequence_policy);
        Self { config, machine }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    // =========================================================================
    // CREATE OPERATIONS (guarded by non-existence)
    // =========================================================================

    pub fn create_material_certification(
        &self,
        stub: &mut dyn ChaincodeStub,
        request: MaterialCertificationRequest,
    ) -> Result<TxId> {
        let details = EventDetails::MaterialCertification {
            material_type: request.material_type,
            material_batch_id: request.material_batch_id,
            supplier_id: request.supplier_id,
        };
        self.create(stub, &request.asset_id, details, request.evidence)
    }

    pub fn create_print_job_start(
        &self,
        stub: &mut dyn ChaincodeStub,
        request: PrintJobStartRequest,
    ) -> Result<TxId> {
        let details = EventDetails::PrintJobStart {
            machine_id: request.machine_id,
            material_used_id: request.material_batch_used_id,
            design_file_hash: request.design_file_hash,
            print_job_id: request.build_job_id,
        };
        self.create(stub, &request.asset_id, details, request.evidence)
    }

    // =========================================================================
    // UPDATE OPERATIONS (guarded by existence)
    // =========================================================================

    pub fn create_print_job_completion(
        &self,
        stub: &mut dyn ChaincodeStub,
        request: PrintJobCompletionRequest,
    ) -> Result<TxId> {
        let details = EventDetails::PrintJobCompletion {
            print_job_id: request.build_job_id,
            primary_inspection_result: request.inspection_result,
        };
        self.transition(stub, &request.asset_id, details, request.evidence)
    }

    pub fn create_qa_certify(
        &self,
        stub: &mut dyn ChaincodeStub,
        request: QaCertifyRequest,
    ) -> Result<TxId> {
        let details = EventDetails::QaCertification {
            test_standard_applied: request.test_standard,
            final_test_result: request.test_result,
            certificate_id: request.certificate_id,
        };
        self.transition(stub, &request.asset_id, details, request.evidence)
    }

    pub fn add_history_event(
        &self,
        stub: &mut dyn ChaincodeStub,
        request: AddHistoryEventRequest,
    ) -> Result<TxId> {
        let agent = Self::agent(stub)?;
        let target_stage: LifecycleStage = request.event_type.parse()?;
        let details = EventDetails::StageAnnotation { target_stage };
        self.advance(stub, agent, &request.asset_id, details, request.evidence)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn read_asset(&self, stub: &mut dyn ChaincodeStub, asset_id: &str) -> Result<Asset> {
        AssetRegistry::read(stub, asset_id)
    }

    pub fn get_asset_history(
        &self,
        stub: &mut dyn ChaincodeStub,
        asset_id: &str,
    ) -> Result<HistoryResult> {
        let asset = AssetRegistry::read(stub, asset_id)?;
        let events = EventStore::history(stub, &asset.history_tx_ids)?;
        Ok(HistoryResult { events })
    }

    pub fn asset_exists(&self, stub: &mut dyn ChaincodeStub, asset_id: &str) -> Result<bool> {
        AssetRegistry::exists(stub, asset_id)
    }

    /// Run a parsed function and JSON-encode its result.
    ///
    /// Mutating functions return the commit identifier as a JSON string.
    pub fn invoke(
        &self,
        stub: &mut dyn ChaincodeStub,
        function: ContractFunction,
    ) -> Result<Vec<u8>> {
        match function {
            ContractFunction::CreateMaterialCertification(req) => {
                encode(&self.create_material_certification(stub, req)?)
            }
            ContractFunction::CreatePrintJobStart(req) => {
                encode(&self.create_print_job_start(stub, req)?)
            }
            ContractFunction::CreatePrintJobCompletion(req) => {
                encode(&self.create_print_job_completion(stub, req)?)
            }
            ContractFunction::CreateQaCertify(req) => encode(&self.create_qa_certify(stub, req)?),
            ContractFunction::AddHistoryEvent(req) => encode(&self.add_history_event(stub, req)?),
            ContractFunction::ReadAsset { asset_id } => encode(&self.read_asset(stub, &asset_id)?),
            ContractFunction::GetAssetHistory { asset_id } => {
                encode(&self.get_asset_history(stub, &asset_id)?)
            }
            ContractFunction::AssetExists { asset_id } => {
                encode(&self.asset_exists(stub, &asset_id)?)
            }
        }
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn create(
        &self,
        stub: &mut dyn ChaincodeStub,
        asset_id: &str,
        details: EventDetails,
        evidence: Evidence,
    ) -> Result<TxId> {
        let agent = Self::agent(stub)?;
        self.config.payload_strategy.check_evidence(&evidence)?;
        let stage = details.implied_stage(&self.config.fit_for_use_result);
        let event = Self::event(stub, agent.clone(), details, evidence);
        AssetRegistry::create(stub, asset_id, &agent, stage, &event)
    }

    fn transition(
        &self,
        stub: &mut dyn ChaincodeStub,
        asset_id: &str,
        details: EventDetails,
        evidence: Evidence,
    ) -> Result<TxId> {
        let agent = Self::agent(stub)?;
        self.advance(stub, agent, asset_id, details, evidence)
    }

    fn advance(
        &self,
        stub: &mut dyn ChaincodeStub,
        agent: String,
        asset_id: &str,
        details: EventDetails,
        evidence: Evidence,
    ) -> Result<TxId> {
        self.config.payload_strategy.check_evidence(&evidence)?;
        let asset = AssetRegistry::read(stub, asset_id)?;
        let to = details.implied_stage(&self.config.fit_for_use_result);
        self.machine
            .check(Transition::new(asset.current_lifecycle_stage, to))?;

        debug!(
            asset_id = asset_id,
            event_type = details.event_type(),
            from = %asset.current_lifecycle_stage,
            to = %to,
            "Transition accepted"
        );
        let event = Self::event(stub, agent, details, evidence);
        AssetRegistry::advance(stub, asset, to, &event)
    }

    fn agent(stub: &dyn ChaincodeStub) -> Result<String> {
        stub.creator()
            .map(|identity| identity.msp_id.clone())
            .filter(|msp_id| !msp_id.is_empty())
            .ok_or(ProvenanceError::IdentityUnavailable)
    }

    fn event(
        stub: &dyn ChaincodeStub,
        agent_id: String,
        details: EventDetails,
        evidence: Evidence,
    ) -> ProvenanceEvent {
        ProvenanceEvent {
            details,
            agent_id,
            timestamp: stub.tx_timestamp(),
            evidence,
        }
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| ProvenanceError::InvalidArgument(format!("failed to encode response: {}", e)))
}
