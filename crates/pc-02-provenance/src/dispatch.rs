//! Function-name dispatch for string-argument clients.
//!
//! ```text
//! ("CreateQACertify", ["A1", "AS9100", "CERTIFIED_FIT_FOR_USE", "QA-1", "<hex>"])
//!     → ContractFunction::CreateQaCertify(QaCertifyRequest { .. })
//! ```
//!
//! The last argument of every mutating function is the evidence argument,
//! interpreted by the configured [`PayloadStrategy`].

use crate::config::PayloadStrategy;
use crate::errors::{ProvenanceError, Result};
use crate::ports::{
    AddHistoryEventRequest, MaterialCertificationRequest, PrintJobCompletionRequest,
    PrintJobStartRequest, QaCertifyRequest,
};

/// A parsed contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractFunction {
    CreateMaterialCertification(MaterialCertificationRequest),
    CreatePrintJobStart(PrintJobStartRequest),
    CreatePrintJobCompletion(PrintJobCompletionRequest),
    CreateQaCertify(QaCertifyRequest),
    AddHistoryEvent(AddHistoryEventRequest),
    ReadAsset { asset_id: String },
    GetAssetHistory { asset_id: String },
    AssetExists { asset_id: String },
}

impl ContractFunction {
    pub const CREATE_MATERIAL_CERTIFICATION: &'static str = "CreateMaterialCertification";
    pub const CREATE_PRINT_JOB_START: &'static str = "CreatePrintJobStart";
    pub const CREATE_PRINT_JOB_COMPLETION: &'static str = "CreatePrintJobCompletion";
    pub const CREATE_QA_CERTIFY: &'static str = "CreateQACertify";
    pub const ADD_HISTORY_EVENT: &'static str = "AddHistoryEvent";
    pub const READ_ASSET: &'static str = "ReadAsset";
    pub const GET_ASSET_HISTORY: &'static str = "GetAssetHistory";
    pub const ASSET_EXISTS: &'static str = "AssetExists";

    /// Map a function name and positional arguments to a typed call.
    pub fn parse<S: AsRef<str>>(name: &str, args: &[S], strategy: PayloadStrategy) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
        let function = match name {
            Self::CREATE_MATERIAL_CERTIFICATION => {
                let [asset_id, material_type, batch_id, supplier_id, evidence] =
                    arity::<5>(name, &args)?;
                ContractFunction::CreateMaterialCertification(MaterialCertificationRequest {
                    asset_id: asset_id.to_string(),
                    material_type: material_type.to_string(),
                    material_batch_id: batch_id.to_string(),
                    supplier_id: supplier_id.to_string(),
                    evidence: strategy.evidence_from_arg(evidence)?,
                })
            }
            Self::CREATE_PRINT_JOB_START => {
                let [asset_id, machine_id, batch_used_id, design_hash, job_id, evidence] =
                    arity::<6>(name, &args)?;
                ContractFunction::CreatePrintJobStart(PrintJobStartRequest {
                    asset_id: asset_id.to_string(),
                    machine_id: machine_id.to_string(),
                    material_batch_used_id: batch_used_id.to_string(),
                    design_file_hash: design_hash.parse()?,
                    build_job_id: job_id.to_string(),
                    evidence: strategy.evidence_from_arg(evidence)?,
                })
            }
            Self::CREATE_PRINT_JOB_COMPLETION => {
                let [asset_id, job_id, inspection_result, evidence] = arity::<4>(name, &args)?;
                ContractFunction::CreatePrintJobCompletion(PrintJobCompletionRequest {
                    asset_id: asset_id.to_string(),
                    build_job_id: job_id.to_string(),
                    inspection_result: inspection_result.to_string(),
                    evidence: strategy.evidence_from_arg(evidence)?,
                })
            }
            Self::CREATE_QA_CERTIFY => {
                let [asset_id, standard, result, certificate_id, evidence] =
                    arity::<5>(name, &args)?;
                ContractFunction::CreateQaCertify(QaCertifyRequest {
                    asset_id: asset_id.to_string(),
                    test_standard: standard.to_string(),
                    test_result: result.to_string(),
                    certificate_id: certificate_id.to_string(),
                    evidence: strategy.evidence_from_arg(evidence)?,
                })
            }
            Self::ADD_HISTORY_EVENT => {
                let [asset_id, event_type, evidence] = arity::<3>(name, &args)?;
                ContractFunction::AddHistoryEvent(AddHistoryEventRequest {
                    asset_id: asset_id.to_string(),
                    event_type: event_type.to_string(),
                    evidence: strategy.evidence_from_arg(evidence)?,
                })
            }
            Self::READ_ASSET => {
                let [asset_id] = arity::<1>(name, &args)?;
                ContractFunction::ReadAsset {
                    asset_id: asset_id.to_string(),
                }
            }
            Self::GET_ASSET_HISTORY => {
                let [asset_id] = arity::<1>(name, &args)?;
                ContractFunction::GetAssetHistory {
                    asset_id: asset_id.to_string(),
                }
            }
            Self::ASSET_EXISTS => {
                let [asset_id] = arity::<1>(name, &args)?;
                ContractFunction::AssetExists {
                    asset_id: asset_id.to_string(),
                }
            }
            other => {
                return Err(ProvenanceError::InvalidArgument(format!(
                    "unknown function {:?}",
                    other
                )))
            }
        };
        Ok(function)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContractFunction::CreateMaterialCertification(_) => Self::CREATE_MATERIAL_CERTIFICATION,
            ContractFunction::CreatePrintJobStart(_) => Self::CREATE_PRINT_JOB_START,
            ContractFunction::CreatePrintJobCompletion(_) => Self::CREATE_PRINT_JOB_COMPLETION,
            ContractFunction::CreateQaCertify(_) => Self::CREATE_QA_CERTIFY,
            ContractFunction::AddHistoryEvent(_) => Self::ADD_HISTORY_EVENT,
            ContractFunction::ReadAsset { .. } => Self::READ_ASSET,
            ContractFunction::GetAssetHistory { .. } => Self::GET_ASSET_HISTORY,
            ContractFunction::AssetExists { .. } => Self::ASSET_EXISTS,
        }
    }

    /// Queries are evaluated against committed state and never ordered.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            ContractFunction::ReadAsset { .. }
                | ContractFunction::GetAssetHistory { .. }
                | ContractFunction::AssetExists { .. }
        )
    }

    pub fn asset_id(&self) -> &str {
        match self {
            ContractFunction::CreateMaterialCertification(req) => &req.asset_id,
            ContractFunction::CreatePrintJobStart(req) => &req.asset_id,
            ContractFunction::CreatePrintJobCompletion(req) => &req.asset_id,
            ContractFunction::CreateQaCertify(req) => &req.asset_id,
            ContractFunction::AddHistoryEvent(req) => &req.asset_id,
            ContractFunction::ReadAsset { asset_id }
            | ContractFunction::GetAssetHistory { asset_id }
            | ContractFunction::AssetExists { asset_id } => asset_id,
        }
    }
}

fn arity<'a, const N: usize>(name: &str, args: &[&'a str]) -> Result<[&'a str; N]> {
    <[&'a str; N]>::try_from(args).map_err(|_| {
        ProvenanceError::InvalidArgument(format!(
            "{} expects {} arguments, got {}",
            name,
            N,
            args.len()
        ))
    })
}
