//! # Error Types
//!
//! Every failure of a contract operation maps to one named variant.

use pc_01_ledger::{LedgerError, StateError, TxId};
use thiserror::Error;

use crate::domain::entities::LifecycleStage;

/// Errors returned by provenance operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvenanceError {
    /// A create-type operation targeted an existing asset.
    #[error("the asset {asset_id} already exists")]
    AlreadyExists { asset_id: String },

    /// An update-type or query operation targeted a missing asset.
    #[error("the asset {asset_id} does not exist")]
    NotFound { asset_id: String },

    /// No event is stored under the commit identifier.
    #[error("no event recorded for transaction {tx_id}")]
    EventNotFound { tx_id: TxId },

    /// Commit-time MVCC conflict; re-read and resubmit.
    #[error("transaction {tx_id} aborted: conflicting write to {key}")]
    ConflictAborted { tx_id: TxId, key: String },

    /// A stored record failed to decode.
    #[error("malformed record at {key}: {reason}")]
    MalformedRecord { key: String, reason: String },

    /// The submitting organization could not be resolved.
    #[error("failed to get client MSPID")]
    IdentityUnavailable,

    /// Rejected by the strict sequence policy, or an update targeting the
    /// initial stage.
    #[error("transition from {from} to {to} is not allowed")]
    InvalidTransition {
        from: LifecycleStage,
        to: LifecycleStage,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The commit outcome was not observed in time. The transaction may
    /// still commit.
    #[error("commit of {tx_id} not observed within {timeout_ms}ms")]
    CommitTimeout { tx_id: TxId, timeout_ms: u64 },

    /// Infrastructure failure below the contract.
    #[error("ledger error: {0}")]
    Ledger(LedgerError),
}

impl ProvenanceError {
    /// Only commit-time conflicts are worth retrying with a fresh read.
    pub fn is_retriable(&self) -> bool {
        matches!(self, ProvenanceError::ConflictAborted { .. })
    }

    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProvenanceError::AlreadyExists { .. } => "already_exists",
            ProvenanceError::NotFound { .. } => "not_found",
            ProvenanceError::EventNotFound { .. } => "event_not_found",
            ProvenanceError::ConflictAborted { .. } => "conflict_aborted",
            ProvenanceError::MalformedRecord { .. } => "malformed_record",
            ProvenanceError::IdentityUnavailable => "identity_unavailable",
            ProvenanceError::InvalidTransition { .. } => "invalid_transition",
            ProvenanceError::InvalidArgument(_) => "invalid_argument",
            ProvenanceError::CommitTimeout { .. } => "commit_timeout",
            ProvenanceError::Ledger(_) => "ledger",
        }
    }
}

impl From<LedgerError> for ProvenanceError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::MvccConflict { tx_id, key } => {
                ProvenanceError::ConflictAborted { tx_id, key }
            }
            LedgerError::CommitTimeout { tx_id, timeout_ms } => {
                ProvenanceError::CommitTimeout { tx_id, timeout_ms }
            }
            other => ProvenanceError::Ledger(other),
        }
    }
}

impl From<StateError> for ProvenanceError {
    fn from(err: StateError) -> Self {
        ProvenanceError::Ledger(LedgerError::State(err))
    }
}

pub type Result<T> = std::result::Result<T, ProvenanceError>;
