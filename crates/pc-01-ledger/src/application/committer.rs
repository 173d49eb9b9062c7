//! Block assembly, validation and commit.

use provenance_telemetry::metrics;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::{validate_block, Block, LedgerError, TransactionEnvelope, ValidationCode};
use crate::events::BlockCommitted;
use crate::ports::VersionedStore;

/// A block together with its per-transaction verdicts.
#[derive(Debug, Clone)]
pub struct CommittedBlock {
    pub block: Block,
    pub codes: Vec<ValidationCode>,
}

/// Turns cut batches into committed blocks.
///
/// Only the orderer task calls this, so blocks are committed strictly in
/// sequence.
pub struct Committer {
    store: Arc<dyn VersionedStore>,
    events: broadcast::Sender<BlockCommitted>,
}

impl Committer {
    pub fn new(store: Arc<dyn VersionedStore>, events: broadcast::Sender<BlockCommitted>) -> Self {
        Self { store, events }
    }

    pub fn commit(&self, transactions: Vec<TransactionEnvelope>) -> Result<CommittedBlock, LedgerError> {
        let number = self.store.height()?;
        let previous_hash = self.store.last_block_hash()?;
        let block = Block::new(number, previous_hash, transactions)?;

        let (codes, batch) = validate_block(self.store.as_ref(), &block)?;
        let block_hash = batch.block_hash;
        self.store.apply_block(batch)?;

        for (tx, code) in block.transactions.iter().zip(&codes) {
            metrics::TRANSACTIONS_VALIDATED
                .with_label_values(&[code.label()])
                .inc();
            match code {
                ValidationCode::Valid => {
                    debug!(block = number, tx_id = %tx.tx_id, "Transaction valid");
                }
                ValidationCode::MvccReadConflict { key } => {
                    warn!(block = number, tx_id = %tx.tx_id, key = %key, "MVCC read conflict");
                }
                ValidationCode::DuplicateTxId => {
                    warn!(block = number, tx_id = %tx.tx_id, "Duplicate transaction id");
                }
            }
        }

        metrics::BLOCKS_COMMITTED.inc();
        metrics::LEDGER_HEIGHT.set((number + 1) as f64);
        metrics::BLOCK_SIZE_BYTES.observe(block.size_bytes as f64);

        let valid = codes.iter().filter(|c| c.is_valid()).count();
        info!(
            block = number,
            txs = block.len(),
            valid = valid,
            size_bytes = block.size_bytes,
            hash = %hex::encode(block_hash),
            "Block committed"
        );

        // No subscribers is fine.
        let _ = self.events.send(BlockCommitted {
            block_num: number,
            block_hash,
            size_bytes: block.size_bytes,
            tx_ids: block.transactions.iter().map(|t| t.tx_id.clone()).collect(),
            codes: codes.clone(),
        });

        Ok(CommittedBlock { block, codes })
    }
}
