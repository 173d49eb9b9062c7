//! Configuration for the Ledger Subsystem

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::domain::LedgerError;

/// Batch cutting parameters of the ordering layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Cut once this many envelopes are pending
    pub max_message_count: usize,
    /// Envelopes above this size are rejected outright
    pub absolute_max_bytes: u64,
    /// Soft batch size; larger envelopes travel alone
    pub preferred_max_bytes: u64,
    /// Cut a non-empty batch this long after its first envelope
    pub batch_timeout_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_message_count: 10,
            absolute_max_bytes: 99 * 1024 * 1024,
            preferred_max_bytes: 512 * 1024,
            batch_timeout_ms: 2_000,
        }
    }
}

impl BatchConfig {
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.max_message_count == 0 {
            return Err(LedgerError::InvalidConfig(
                "max_message_count must be positive".to_string(),
            ));
        }
        if self.preferred_max_bytes == 0 || self.preferred_max_bytes > self.absolute_max_bytes {
            return Err(LedgerError::InvalidConfig(format!(
                "preferred_max_bytes {} must be in 1..={}",
                self.preferred_max_bytes, self.absolute_max_bytes
            )));
        }
        if self.batch_timeout_ms == 0 {
            return Err(LedgerError::InvalidConfig(
                "batch_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ledger configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub batch: BatchConfig,
    /// How long a submitter waits for its commit outcome
    pub commit_timeout_ms: u64,
    /// Bound of the submission queue in front of the orderer
    pub submission_queue_capacity: usize,
    /// Buffered `BlockCommitted` events per subscriber
    pub event_channel_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            batch: BatchConfig::default(),
            commit_timeout_ms: 30_000,
            submission_queue_capacity: 1_024,
            event_channel_capacity: 256,
        }
    }
}

impl LedgerConfig {
    /// Overlay `PC_*` environment variables on the defaults.
    ///
    /// - `PC_BATCH_MAX_MESSAGES`
    /// - `PC_BATCH_ABSOLUTE_MAX_BYTES`
    /// - `PC_BATCH_PREFERRED_MAX_BYTES`
    /// - `PC_BATCH_TIMEOUT_MS`
    /// - `PC_COMMIT_TIMEOUT_MS`
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_parse("PC_BATCH_MAX_MESSAGES") {
            config.batch.max_message_count = v;
        }
        if let Some(v) = env_parse("PC_BATCH_ABSOLUTE_MAX_BYTES") {
            config.batch.absolute_max_bytes = v;
        }
        if let Some(v) = env_parse("PC_BATCH_PREFERRED_MAX_BYTES") {
            config.batch.preferred_max_bytes = v;
        }
        if let Some(v) = env_parse("PC_BATCH_TIMEOUT_MS") {
            config.batch.batch_timeout_ms = v;
        }
        if let Some(v) = env_parse("PC_COMMIT_TIMEOUT_MS") {
            config.commit_timeout_ms = v;
        }
        config
    }

    /// Small batches and short timeouts for tests.
    pub fn for_testing() -> Self {
        Self {
            batch: BatchConfig {
                batch_timeout_ms: 20,
                ..BatchConfig::default()
            },
            commit_timeout_ms: 5_000,
            ..Self::default()
        }
    }

    pub fn commit_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        self.batch.validate()?;
        if self.submission_queue_capacity == 0 || self.event_channel_capacity == 0 {
            return Err(LedgerError::InvalidConfig(
                "channel capacities must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
