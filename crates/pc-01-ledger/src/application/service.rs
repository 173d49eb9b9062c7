//! # Ledger Service
//!
//! Wires simulation, ordering and commit together.
//!
//! ```text
//! submit() ──mpsc──→ [orderer task] ──BlockCutter──→ Committer ──→ VersionedStore
//!    ↑                    │                              │
//!    └──────oneshot───────┘                              └──broadcast──→ subscribe()
//! ```
//!
//! A submitter waits on its oneshot, bounded by `commit_timeout`. Dropping
//! the `submit` future abandons the wait; the envelope is still ordered and
//! committed.

use parking_lot::Mutex;
use provenance_telemetry::{log_tx_event, metrics, HistogramTimer};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

use super::committer::Committer;
use super::simulator::TxSimulator;
use crate::config::{BatchConfig, LedgerConfig};
use crate::domain::{
    BlockCutter, CommitReceipt, Identity, LedgerError, TransactionEnvelope, TxContext, TxId,
    ValidationCode,
};
use crate::events::BlockCommitted;
use crate::ports::{TimeSource, VersionedStore};

type Responder = oneshot::Sender<Result<CommitReceipt, LedgerError>>;

struct Submission {
    envelope: TransactionEnvelope,
    responder: Responder,
}

/// Counters kept by the ledger.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LedgerStats {
    pub submitted: u64,
    pub committed: u64,
    pub invalidated: u64,
    pub blocks: u64,
}

/// In-process replicated-execution substrate.
pub struct Ledger {
    config: LedgerConfig,
    store: Arc<dyn VersionedStore>,
    clock: Arc<dyn TimeSource>,
    submissions: mpsc::Sender<Submission>,
    events: broadcast::Sender<BlockCommitted>,
    shutdown: watch::Sender<bool>,
    stats: Arc<Mutex<LedgerStats>>,
    orderer: Mutex<Option<JoinHandle<()>>>,
}

impl Ledger {
    /// Validate the configuration and spawn the orderer task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        config: LedgerConfig,
        store: Arc<dyn VersionedStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, LedgerError> {
        config.validate()?;
        let height = store.height()?;

        let (submissions, rx) = mpsc::channel(config.submission_queue_capacity);
        let (events, _) = broadcast::channel(config.event_channel_capacity);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let stats = Arc::new(Mutex::new(LedgerStats::default()));

        let committer = Committer::new(store.clone(), events.clone());
        let orderer = tokio::spawn(run_orderer(
            config.batch.clone(),
            rx,
            committer,
            stats.clone(),
            shutdown_rx,
        ));

        info!(
            subsystem = crate::SUBSYSTEM_ID,
            height = height,
            max_message_count = config.batch.max_message_count,
            preferred_max_bytes = config.batch.preferred_max_bytes,
            batch_timeout_ms = config.batch.batch_timeout_ms,
            "Ledger started"
        );

        Ok(Self {
            config,
            store,
            clock,
            submissions,
            events,
            shutdown,
            stats,
            orderer: Mutex::new(Some(orderer)),
        })
    }

    /// Fresh transaction context with a unique tx id and the ledger's time.
    pub fn new_context(&self, creator: Option<Identity>) -> TxContext {
        let nonce: [u8; 24] = rand::random();
        TxContext {
            tx_id: TxId::generate(&nonce, creator.as_ref()),
            timestamp: self.clock.now(),
            creator,
        }
    }

    /// Simulator for a transaction that will be submitted.
    pub fn simulator(&self, ctx: TxContext) -> TxSimulator {
        TxSimulator::new(ctx, self.store.clone())
    }

    /// Read-only simulator for evaluation; never ordered.
    pub fn query(&self, ctx: TxContext) -> TxSimulator {
        TxSimulator::query(ctx, self.store.clone())
    }

    /// Order and commit an envelope, waiting for its validation outcome.
    pub async fn submit(&self, envelope: TransactionEnvelope) -> Result<CommitReceipt, LedgerError> {
        let size = envelope.encoded_size()?;
        let max = self.config.batch.absolute_max_bytes;
        if size > max {
            return Err(LedgerError::EnvelopeTooLarge { size, max });
        }

        let tx_id = envelope.tx_id.clone();
        let timeout = self.config.commit_timeout();
        let _timer = HistogramTimer::new(&metrics::COMMIT_LATENCY);

        let wait = async {
            let (responder, outcome) = oneshot::channel();
            self.submissions
                .send(Submission {
                    envelope,
                    responder,
                })
                .await
                .map_err(|_| LedgerError::Shutdown)?;

            metrics::TRANSACTIONS_SUBMITTED.inc();
            self.stats.lock().submitted += 1;
            log_tx_event!(debug, "ledger", "Envelope submitted", tx_id, size_bytes = size);

            outcome.await.map_err(|_| LedgerError::Shutdown)?
        };

        match tokio::time::timeout(timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::CommitTimeout {
                tx_id,
                timeout_ms: self.config.commit_timeout_ms,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BlockCommitted> {
        self.events.subscribe()
    }

    pub fn height(&self) -> Result<u64, LedgerError> {
        Ok(self.store.height()?)
    }

    pub fn stats(&self) -> LedgerStats {
        self.stats.lock().clone()
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn VersionedStore> {
        &self.store
    }

    /// Stop the orderer. Pending envelopes are committed first; anything
    /// still queued afterwards fails with [`LedgerError::Shutdown`].
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        let handle = self.orderer.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = %e, "Orderer task failed");
            }
        }
        info!("Ledger stopped");
    }
}

impl Drop for Ledger {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn run_orderer(
    config: BatchConfig,
    mut rx: mpsc::Receiver<Submission>,
    committer: Committer,
    stats: Arc<Mutex<LedgerStats>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let batch_timeout = config.batch_timeout();
    let mut cutter: BlockCutter<Submission> = BlockCutter::new(config);
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            received = rx.recv() => {
                let Some(submission) = received else { break };
                let size = match submission.envelope.encoded_size() {
                    Ok(size) => size,
                    Err(e) => {
                        let _ = submission.responder.send(Err(e));
                        continue;
                    }
                };

                let batches = cutter.ordered(submission, size);
                let cut_any = !batches.is_empty();
                for batch in batches {
                    commit_batch(&committer, batch, &stats);
                }

                deadline = if cutter.is_empty() {
                    None
                } else if cut_any || deadline.is_none() {
                    Some(Instant::now() + batch_timeout)
                } else {
                    deadline
                };
            }
            _ = wait_until(deadline) => {
                deadline = None;
                commit_batch(&committer, cutter.cut(), &stats);
            }
            _ = shutdown.changed() => break,
        }
    }

    let pending = cutter.cut();
    if !pending.is_empty() {
        commit_batch(&committer, pending, &stats);
    }

    rx.close();
    while let Ok(submission) = rx.try_recv() {
        let _ = submission.responder.send(Err(LedgerError::Shutdown));
    }
    debug!("Orderer loop exited");
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn commit_batch(committer: &Committer, batch: Vec<Submission>, stats: &Mutex<LedgerStats>) {
    if batch.is_empty() {
        return;
    }

    let (envelopes, responders): (Vec<_>, Vec<_>) = batch
        .into_iter()
        .map(|s| (s.envelope, s.responder))
        .unzip();

    let committed = match committer.commit(envelopes) {
        Ok(committed) => committed,
        Err(e) => {
            error!(error = %e, "Block commit failed");
            for responder in responders {
                let _ = responder.send(Err(e.clone()));
            }
            return;
        }
    };

    let block_num = committed.block.number;
    let mut stats = stats.lock();
    stats.blocks += 1;

    for (tx_num, ((tx, code), responder)) in committed
        .block
        .transactions
        .into_iter()
        .zip(committed.codes)
        .zip(responders)
        .enumerate()
    {
        let outcome = match code {
            ValidationCode::Valid => {
                stats.committed += 1;
                Ok(CommitReceipt {
                    tx_id: tx.tx_id,
                    block_num,
                    tx_num: tx_num as u64,
                    response: tx.response,
                })
            }
            ValidationCode::MvccReadConflict { key } => {
                stats.invalidated += 1;
                Err(LedgerError::MvccConflict { tx_id: tx.tx_id, key })
            }
            ValidationCode::DuplicateTxId => {
                stats.invalidated += 1;
                Err(LedgerError::DuplicateTxId(tx.tx_id))
            }
        };
        // The submitter may have stopped waiting.
        let _ = responder.send(outcome);
    }
}
