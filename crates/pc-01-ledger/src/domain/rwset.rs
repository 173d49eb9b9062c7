//! Read/write set captured while simulating a transaction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::entities::{StateKey, Version};

/// Keys observed and written by one simulated transaction.
///
/// Both maps are ordered so the set serializes identically on every peer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadWriteSet {
    /// Version observed per key; `None` means the key was absent.
    pub reads: BTreeMap<StateKey, Option<Version>>,
    /// Value written per key. Last write wins.
    pub writes: BTreeMap<StateKey, Vec<u8>>,
}

impl ReadWriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a read. Only the first observation of a key is kept.
    pub fn record_read(&mut self, key: StateKey, version: Option<Version>) {
        self.reads.entry(key).or_insert(version);
    }

    pub fn record_write(&mut self, key: StateKey, value: Vec<u8>) {
        self.writes.insert(key, value);
    }

    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}
