//! Shared builders for the integration tests and benchmarks.

use std::sync::Arc;

use pc_01_ledger::{InMemoryWorldState, Ledger, LedgerConfig, SystemClock};
use pc_02_provenance::prelude::*;

/// A ledger, its store and a provenance service on top.
pub struct Harness {
    pub store: Arc<InMemoryWorldState>,
    pub ledger: Arc<Ledger>,
    pub service: Arc<ProvenanceService>,
}

impl Harness {
    /// Must be called from within a Tokio runtime.
    pub fn start(ledger_config: LedgerConfig, contract_config: ContractConfig) -> Self {
        let store = Arc::new(InMemoryWorldState::new());
        let ledger = Ledger::start(ledger_config, store.clone(), Arc::new(SystemClock))
            .expect("ledger config is valid");
        let ledger = Arc::new(ledger);
        let service = Arc::new(ProvenanceService::new(ledger.clone(), contract_config));
        Self {
            store,
            ledger,
            service,
        }
    }

    pub fn default_config() -> Self {
        Self::start(LedgerConfig::for_testing(), ContractConfig::default())
    }

    pub async fn stop(&self) {
        self.ledger.shutdown().await;
    }
}

pub fn org1() -> Option<Identity> {
    Some(Identity::new("Org1MSP"))
}

pub fn org2() -> Option<Identity> {
    Some(Identity::new("Org2MSP"))
}

/// Evidence for `content` as the given strategy would record it.
pub fn evidence(strategy: PayloadStrategy, content: &[u8]) -> Evidence {
    match strategy {
        PayloadStrategy::Lightweight => Evidence::OffChain(ContentHash::of(content)),
        PayloadStrategy::Naive => Evidence::OnChain(OnChainPayload::new(content)),
    }
}

pub fn material_request(asset_id: &str, evidence: Evidence) -> MaterialCertificationRequest {
    MaterialCertificationRequest {
        asset_id: asset_id.to_string(),
        material_type: "Ti-6Al-4V".to_string(),
        material_batch_id: "BATCH-2024-117".to_string(),
        supplier_id: "SUP-ACME".to_string(),
        evidence,
    }
}

pub fn print_start_request(asset_id: &str, evidence: Evidence) -> PrintJobStartRequest {
    PrintJobStartRequest {
        asset_id: asset_id.to_string(),
        machine_id: "EOS-M290-03".to_string(),
        material_batch_used_id: "BATCH-2024-117".to_string(),
        design_file_hash: ContentHash::of(b"turbine-bracket-rev4.stl"),
        build_job_id: "JOB-8812".to_string(),
        evidence,
    }
}

pub fn completion_request(asset_id: &str, evidence: Evidence) -> PrintJobCompletionRequest {
    PrintJobCompletionRequest {
        asset_id: asset_id.to_string(),
        build_job_id: "JOB-8812".to_string(),
        inspection_result: "VISUAL_PASS".to_string(),
        evidence,
    }
}

pub fn qa_request(asset_id: &str, result: &str, evidence: Evidence) -> QaCertifyRequest {
    QaCertifyRequest {
        asset_id: asset_id.to_string(),
        test_standard: "ASTM-F3302".to_string(),
        test_result: result.to_string(),
        certificate_id: format!("CERT-{}", asset_id),
        evidence,
    }
}
