//! # Block Cutter
//!
//! Groups incoming envelopes into batches using the ordering layer's
//! message-count and byte-size limits. The batch timeout is driven by the
//! caller, which cuts whatever is pending once it elapses.
//!
//! Items are opaque to the cutter; only their encoded size matters.

use crate::config::BatchConfig;

pub struct BlockCutter<T> {
    config: BatchConfig,
    pending: Vec<T>,
    pending_bytes: u64,
}

impl<T> BlockCutter<T> {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
            pending_bytes: 0,
        }
    }

    /// Enqueue an item and return any batches that are now complete.
    ///
    /// Returns at most two batches: the previously pending envelopes and,
    /// for an oversized item, the item on its own. Items above
    /// `absolute_max_bytes` must be rejected before they get here.
    pub fn ordered(&mut self, item: T, size: u64) -> Vec<Vec<T>> {
        let mut batches = Vec::new();

        if size > self.config.preferred_max_bytes {
            if !self.pending.is_empty() {
                batches.push(self.cut());
            }
            batches.push(vec![item]);
            return batches;
        }

        if self.pending_bytes + size > self.config.preferred_max_bytes && !self.pending.is_empty() {
            batches.push(self.cut());
        }

        self.pending.push(item);
        self.pending_bytes += size;

        if self.pending.len() >= self.config.max_message_count {
            batches.push(self.cut());
        }

        batches
    }

    /// Take everything pending as one batch.
    pub fn cut(&mut self) -> Vec<T> {
        self.pending_bytes = 0;
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_bytes(&self) -> u64 {
        self.pending_bytes
    }
}
