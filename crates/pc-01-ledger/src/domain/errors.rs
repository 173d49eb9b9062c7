use super::entities::TxId;
use thiserror::Error;

/// World-state storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("Write to {0} attempted in a read-only query")]
    ReadOnly(String),
}

/// Errors surfaced by ordering and commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("MVCC read conflict on key {key} for transaction {tx_id}")]
    MvccConflict { tx_id: TxId, key: String },

    #[error("Duplicate transaction id: {0}")]
    DuplicateTxId(TxId),

    #[error("Commit of {tx_id} not observed within {timeout_ms}ms")]
    CommitTimeout { tx_id: TxId, timeout_ms: u64 },

    #[error("Envelope of {size} bytes exceeds absolute maximum {max}")]
    EnvelopeTooLarge { size: u64, max: u64 },

    #[error("Ledger is shut down")]
    Shutdown,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for LedgerError {
    fn from(err: bincode::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
