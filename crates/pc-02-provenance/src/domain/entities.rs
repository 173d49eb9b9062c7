//! # Domain Entities
//!
//! Assets, provenance events and lifecycle stages, with the JSON field
//! names used in the world state.

use chrono::{DateTime, Utc};
use pc_01_ledger::TxId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::value_objects::{ContentHash, Evidence};
use crate::errors::ProvenanceError;

// =============================================================================
// LIFECYCLE STAGE
// =============================================================================

/// Where an asset is in its manufacturing lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStage {
    MaterialCertified,
    InProduction,
    AwaitingQa,
    Certified,
    Rejected,
}

impl LifecycleStage {
    pub const ALL: [LifecycleStage; 5] = [
        LifecycleStage::MaterialCertified,
        LifecycleStage::InProduction,
        LifecycleStage::AwaitingQa,
        LifecycleStage::Certified,
        LifecycleStage::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::MaterialCertified => "MATERIAL_CERTIFIED",
            LifecycleStage::InProduction => "IN_PRODUCTION",
            LifecycleStage::AwaitingQa => "AWAITING_QA",
            LifecycleStage::Certified => "CERTIFIED",
            LifecycleStage::Rejected => "REJECTED",
        }
    }

    /// No transition leaves a terminal stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleStage::Certified | LifecycleStage::Rejected)
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleStage {
    type Err = ProvenanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LifecycleStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| {
                ProvenanceError::InvalidArgument(format!("unknown lifecycle stage {:?}", s))
            })
    }
}

// =============================================================================
// ASSET
// =============================================================================

/// One physical item under production.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(rename = "assetID")]
    pub asset_id: String,
    /// MSP id of the organization that created the asset.
    pub owner: String,
    #[serde(rename = "currentLifecycleStage")]
    pub current_lifecycle_stage: LifecycleStage,
    /// Commit identifiers of every event, oldest first.
    #[serde(rename = "historyTxIDs")]
    pub history_tx_ids: Vec<TxId>,
}

impl Asset {
    pub fn new(
        asset_id: impl Into<String>,
        owner: impl Into<String>,
        stage: LifecycleStage,
        first: TxId,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            owner: owner.into(),
            current_lifecycle_stage: stage,
            history_tx_ids: vec![first],
        }
    }
}

// =============================================================================
// PROVENANCE EVENT
// =============================================================================

/// Event-specific fields, tagged by `eventType` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventDetails {
    MaterialCertification {
        #[serde(rename = "materialType")]
        material_type: String,
        #[serde(rename = "materialBatchID")]
        material_batch_id: String,
        #[serde(rename = "supplierID")]
        supplier_id: String,
    },
    PrintJobStart {
        #[serde(rename = "machineID")]
        machine_id: String,
        #[serde(rename = "materialUsedID")]
        material_used_id: String,
        #[serde(rename = "designFileHash")]
        design_file_hash: ContentHash,
        #[serde(rename = "printJobID")]
        print_job_id: String,
    },
    PrintJobCompletion {
        #[serde(rename = "printJobID")]
        print_job_id: String,
        #[serde(rename = "primaryInspectionResult")]
        primary_inspection_result: String,
    },
    QaCertification {
        #[serde(rename = "testStandardApplied")]
        test_standard_applied: String,
        #[serde(rename = "finalTestResult")]
        final_test_result: String,
        #[serde(rename = "certificateID")]
        certificate_id: String,
    },
    /// Generic transition recorded by `AddHistoryEvent`.
    StageAnnotation {
        #[serde(rename = "targetStage")]
        target_stage: LifecycleStage,
    },
}

impl EventDetails {
    /// The `eventType` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventDetails::MaterialCertification { .. } => "MATERIAL_CERTIFICATION",
            EventDetails::PrintJobStart { .. } => "PRINT_JOB_START",
            EventDetails::PrintJobCompletion { .. } => "PRINT_JOB_COMPLETION",
            EventDetails::QaCertification { .. } => "QA_CERTIFICATION",
            EventDetails::StageAnnotation { .. } => "STAGE_ANNOTATION",
        }
    }

    /// Stage an asset is in right after this event.
    pub fn implied_stage(&self, fit_for_use_result: &str) -> LifecycleStage {
        match self {
            EventDetails::MaterialCertification { .. } => LifecycleStage::MaterialCertified,
            EventDetails::PrintJobStart { .. } => LifecycleStage::InProduction,
            EventDetails::PrintJobCompletion { .. } => LifecycleStage::AwaitingQa,
            EventDetails::QaCertification {
                final_test_result, ..
            } => {
                if final_test_result == fit_for_use_result {
                    LifecycleStage::Certified
                } else {
                    LifecycleStage::Rejected
                }
            }
            EventDetails::StageAnnotation { target_stage } => *target_stage,
        }
    }
}

/// One immutable fact about an asset.
///
/// `agentID` and `timestamp` come from the transaction context, never from
/// the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceEvent {
    #[serde(flatten)]
    pub details: EventDetails,
    #[serde(rename = "agentID")]
    pub agent_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub evidence: Evidence,
}

impl ProvenanceEvent {
    pub fn event_type(&self) -> &'static str {
        self.details.event_type()
    }
}

/// Wire wrapper returned by `GetAssetHistory`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResult {
    pub events: Vec<ProvenanceEvent>,
}
