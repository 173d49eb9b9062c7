//! Transaction envelopes, blocks and validation outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::entities::{Hash, Identity, TxId};
use super::errors::LedgerError;
use super::rwset::ReadWriteSet;

/// A simulated transaction ready for ordering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    pub tx_id: TxId,
    pub creator: Option<Identity>,
    pub timestamp: DateTime<Utc>,
    pub rwset: ReadWriteSet,
    /// Payload returned by the contract to the submitter.
    pub response: Vec<u8>,
}

impl TransactionEnvelope {
    /// Size of the envelope on the wire, as seen by the batch cutter.
    pub fn encoded_size(&self) -> Result<u64, LedgerError> {
        Ok(bincode::serialized_size(self)?)
    }
}

/// An ordered batch of envelopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub previous_hash: Hash,
    pub data_hash: Hash,
    pub transactions: Vec<TransactionEnvelope>,
    pub size_bytes: u64,
}

impl Block {
    pub fn new(
        number: u64,
        previous_hash: Hash,
        transactions: Vec<TransactionEnvelope>,
    ) -> Result<Self, LedgerError> {
        let data = bincode::serialize(&transactions)?;
        let data_hash: Hash = Sha256::digest(&data).into();
        Ok(Self {
            number,
            previous_hash,
            data_hash,
            size_bytes: data.len() as u64,
            transactions,
        })
    }

    /// SHA-256 over `number || previous_hash || data_hash`.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.number.to_be_bytes());
        hasher.update(self.previous_hash);
        hasher.update(self.data_hash);
        hasher.finalize().into()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Commit-time verdict for one transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationCode {
    Valid,
    MvccReadConflict { key: String },
    DuplicateTxId,
}

impl ValidationCode {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationCode::Valid)
    }

    /// Metric label for this code.
    pub fn label(&self) -> &'static str {
        match self {
            ValidationCode::Valid => "valid",
            ValidationCode::MvccReadConflict { .. } => "mvcc_read_conflict",
            ValidationCode::DuplicateTxId => "duplicate_txid",
        }
    }
}

/// Where a valid transaction landed in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub tx_id: TxId,
    pub block_num: u64,
    pub tx_num: u64,
    /// Contract response carried by the envelope.
    pub response: Vec<u8>,
}
