//! # Provenance Service
//!
//! Runs the contract against the ledger.
//!
//! ```text
//! submit_function() → Ledger::simulator() → ProvenanceContract::invoke()
//!                                                   │ Err → returned, never submitted
//!                                                   ↓
//!                         Ledger::submit() ← into_envelope()
//!                               │
//!                               ↓
//!           Valid → TxId | MvccReadConflict → ConflictAborted
//! ```
//!
//! Queries go through a read-only simulator over committed state and are
//! never ordered.

use async_trait::async_trait;
use pc_01_ledger::{Identity, Ledger, LedgerError, TxId};
use provenance_telemetry::{metric_inc, metrics, HistogramTimer};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::ContractConfig;
use crate::contract::ProvenanceContract;
use crate::dispatch::ContractFunction;
use crate::domain::{Asset, HistoryResult};
use crate::errors::{ProvenanceError, Result};
use crate::ports::{
    AddHistoryEventRequest, MaterialCertificationRequest, PrintJobCompletionRequest,
    PrintJobStartRequest, ProvenanceApi, QaCertifyRequest,
};

/// Statistics for the provenance service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Envelopes accepted for ordering.
    pub submitted: u64,
    /// Envelopes that committed as valid.
    pub committed: u64,
    /// Envelopes invalidated by a commit-time conflict.
    pub conflicts: u64,
    /// Calls refused before ordering, by the contract or for envelope size.
    pub rejected: u64,
    /// Submissions whose outcome was not observed in time.
    pub timeouts: u64,
}

pub struct ProvenanceService {
    ledger: Arc<Ledger>,
    contract: ProvenanceContract,
    stats: Arc<RwLock<ServiceStats>>,
}

impl ProvenanceService {
    pub fn new(ledger: Arc<Ledger>, config: ContractConfig) -> Self {
        info!(
            subsystem = crate::SUBSYSTEM_ID,
            sequence_policy = ?config.sequence_policy,
            payload_strategy = ?config.payload_strategy,
            "Provenance service ready"
        );
        Self {
            ledger,
            contract: ProvenanceContract::new(config),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    pub fn contract(&self) -> &ProvenanceContract {
        &self.contract
    }

    /// Parse a string-argument call and route it to submission or
    /// evaluation. Returns the JSON-encoded result.
    pub async fn invoke_function<S: AsRef<str>>(
        &self,
        caller: Option<Identity>,
        name: &str,
        args: &[S],
    ) -> Result<Vec<u8>> {
        let strategy = self.contract.config().payload_strategy;
        let function = ContractFunction::parse(name, args, strategy)?;
        if function.is_query() {
            self.evaluate_function(caller, function).await
        } else {
            self.submit_function(caller, function).await
        }
    }

    /// Simulate `function`, order it and wait for its commit outcome.
    #[instrument(
        skip(self, caller, function),
        fields(
            correlation_id = %Uuid::new_v4(),
            operation = function.name(),
            asset_id = %function.asset_id(),
        )
    )]
    pub async fn submit_function(
        &self,
        caller: Option<Identity>,
        function: ContractFunction,
    ) -> Result<Vec<u8>> {
        let operation = function.name();
        let ctx = self.ledger.new_context(caller);
        let tx_id = ctx.tx_id.clone();

        let simulated = {
            let histogram =
                metrics::PROVENANCE_SIMULATION_DURATION.with_label_values(&[operation]);
            let _timer = HistogramTimer::new(&histogram);
            let mut simulator = self.ledger.simulator(ctx);
            self.contract
                .invoke(&mut simulator, function)
                .map(|response| simulator.into_envelope(response))
        };
        let envelope = match simulated {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(tx_id = %tx_id, error = %e, "Contract refused call");
                metric_inc!(metrics::PROVENANCE_OPERATIONS, &[operation, e.kind()]);
                self.stats.write().await.rejected += 1;
                return Err(e);
            }
        };

        let outcome = self.ledger.submit(envelope).await.map_err(ProvenanceError::from);

        {
            let mut stats = self.stats.write().await;
            let oversized = matches!(
                &outcome,
                Err(ProvenanceError::Ledger(LedgerError::EnvelopeTooLarge { .. }))
            );
            if oversized {
                stats.rejected += 1;
            } else {
                stats.submitted += 1;
            }
            match &outcome {
                Ok(_) => stats.committed += 1,
                Err(ProvenanceError::ConflictAborted { .. }) => stats.conflicts += 1,
                Err(ProvenanceError::CommitTimeout { .. }) => stats.timeouts += 1,
                Err(_) => {}
            }
        }

        match outcome {
            Ok(receipt) => {
                metric_inc!(metrics::PROVENANCE_OPERATIONS, &[operation, "ok"]);
                info!(
                    tx_id = %receipt.tx_id,
                    block_num = receipt.block_num,
                    tx_num = receipt.tx_num,
                    "Transaction committed"
                );
                Ok(receipt.response)
            }
            Err(e) => {
                metric_inc!(metrics::PROVENANCE_OPERATIONS, &[operation, e.kind()]);
                warn!(
                    tx_id = %tx_id,
                    error = %e,
                    retriable = e.is_retriable(),
                    "Transaction failed"
                );
                Err(e)
            }
        }
    }

    /// Evaluate `function` against committed state without ordering it.
    pub async fn evaluate_function(
        &self,
        caller: Option<Identity>,
        function: ContractFunction,
    ) -> Result<Vec<u8>> {
        let operation = function.name();
        let ctx = self.ledger.new_context(caller);
        let mut query = self.ledger.query(ctx);
        let result = self.contract.invoke(&mut query, function);
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metric_inc!(metrics::PROVENANCE_OPERATIONS, &[operation, outcome]);
        result
    }

    async fn submit_for_tx_id(
        &self,
        caller: Option<Identity>,
        function: ContractFunction,
    ) -> Result<TxId> {
        let response = self.submit_function(caller, function).await?;
        decode(&response)
    }

    async fn evaluate<T: DeserializeOwned>(&self, function: ContractFunction) -> Result<T> {
        let response = self.evaluate_function(None, function).await?;
        decode(&response)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| ProvenanceError::MalformedRecord {
        key: "response".to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl ProvenanceApi for ProvenanceService {
    async fn create_material_certification(
        &self,
        caller: Option<Identity>,
        request: MaterialCertificationRequest,
    ) -> Result<TxId> {
        self.submit_for_tx_id(caller, ContractFunction::CreateMaterialCertification(request))
            .await
    }

    async fn create_print_job_start(
        &self,
        caller: Option<Identity>,
        request: PrintJobStartRequest,
    ) -> Result<TxId> {
        self.submit_for_tx_id(caller, ContractFunction::CreatePrintJobStart(request))
            .await
    }

    async fn create_print_job_completion(
        &self,
        caller: Option<Identity>,
        request: PrintJobCompletionRequest,
    ) -> Result<TxId> {
        self.submit_for_tx_id(caller, ContractFunction::CreatePrintJobCompletion(request))
            .await
    }

    async fn create_qa_certify(
        &self,
        caller: Option<Identity>,
        request: QaCertifyRequest,
    ) -> Result<TxId> {
        self.submit_for_tx_id(caller, ContractFunction::CreateQaCertify(request))
            .await
    }

    async fn add_history_event(
        &self,
        caller: Option<Identity>,
        request: AddHistoryEventRequest,
    ) -> Result<TxId> {
        self.submit_for_tx_id(caller, ContractFunction::AddHistoryEvent(request))
            .await
    }

    async fn read_asset(&self, asset_id: &str) -> Result<Asset> {
        self.evaluate(ContractFunction::ReadAsset {
            asset_id: asset_id.to_string(),
        })
        .await
    }

    async fn get_asset_history(&self, asset_id: &str) -> Result<HistoryResult> {
        self.evaluate(ContractFunction::GetAssetHistory {
            asset_id: asset_id.to_string(),
        })
        .await
    }

    async fn asset_exists(&self, asset_id: &str) -> Result<bool> {
        self.evaluate(ContractFunction::AssetExists {
            asset_id: asset_id.to_string(),
        })
        .await
    }
}
