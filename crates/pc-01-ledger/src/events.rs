//! Events published by the ledger after each commit.

use serde::{Deserialize, Serialize};

use crate::domain::{Hash, TxId, ValidationCode};

/// Published on the ledger's broadcast channel once a block is durable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCommitted {
    pub block_num: u64,
    pub block_hash: Hash,
    pub size_bytes: u64,
    pub tx_ids: Vec<TxId>,
    /// Validation outcome per transaction, in block order.
    pub codes: Vec<ValidationCode>,
}

impl BlockCommitted {
    pub fn valid_count(&self) -> usize {
        self.codes.iter().filter(|c| c.is_valid()).count()
    }
}
