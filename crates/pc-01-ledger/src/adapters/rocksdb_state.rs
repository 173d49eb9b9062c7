//! # RocksDB World State
//!
//! Persistent [`VersionedStore`] backed by RocksDB.
//!
//! ## Column Families
//!
//! - `state` - key → bincode `VersionedValue`
//! - `txids` - committed tx id → block number
//! - `meta` - ledger height and last block hash
//!
//! Each block is written with a single `WriteBatch`, so values, tx ids and
//! height land together.

use crate::domain::{Hash, StateError, StateKey, TxId, VersionedValue, GENESIS_PREVIOUS_HASH};
use crate::ports::{UpdateBatch, VersionedStore};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Options, WriteBatch, WriteOptions, DB};
use std::path::Path;

pub const CF_STATE: &str = "state";
pub const CF_TXIDS: &str = "txids";
pub const CF_META: &str = "meta";

pub const COLUMN_FAMILIES: &[&str] = &[CF_STATE, CF_TXIDS, CF_META];

const META_HEIGHT: &[u8] = b"height";
const META_LAST_HASH: &[u8] = b"last_hash";

/// RocksDB tuning for the world state.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 32MB)
    pub write_buffer_size: usize,
    /// fsync every block (default: true)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/world-state".to_string(),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 32 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Small buffers and no fsync.
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

pub struct RocksDbWorldState {
    db: DB,
    config: RocksDbConfig,
}

impl RocksDbWorldState {
    pub fn open(config: RocksDbConfig) -> Result<Self, StateError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| StateError::DatabaseError(format!("Failed to open RocksDB: {}", e)))?;

        Ok(Self { db, config })
    }

    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, StateError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily, StateError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StateError::DatabaseError(format!("missing column family {}", name)))
    }

    fn get_raw(&self, cf: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        self.db
            .get_cf(self.cf(cf)?, key)
            .map_err(|e| StateError::DatabaseError(format!("RocksDB get failed: {}", e)))
    }
}

impl VersionedStore for RocksDbWorldState {
    fn get(&self, key: &StateKey) -> Result<Option<VersionedValue>, StateError> {
        match self.get_raw(CF_STATE, key.as_bytes())? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(|e| StateError::SerializationError(e.to_string())),
            None => Ok(None),
        }
    }

    fn height(&self) -> Result<u64, StateError> {
        match self.get_raw(CF_META, META_HEIGHT)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StateError::SerializationError("height is not 8 bytes".to_string())
                })?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }

    fn contains_tx(&self, tx_id: &TxId) -> Result<bool, StateError> {
        Ok(self.get_raw(CF_TXIDS, tx_id.as_str().as_bytes())?.is_some())
    }

    fn last_block_hash(&self) -> Result<Hash, StateError> {
        match self.get_raw(CF_META, META_LAST_HASH)? {
            Some(bytes) => bytes.as_slice().try_into().map_err(|_| {
                StateError::SerializationError("last block hash is not 32 bytes".to_string())
            }),
            None => Ok(GENESIS_PREVIOUS_HASH),
        }
    }

    fn apply_block(&self, batch: UpdateBatch) -> Result<(), StateError> {
        let height = self.height()?;
        if batch.block_num != height {
            return Err(StateError::DatabaseError(format!(
                "block {} applied at height {}",
                batch.block_num, height
            )));
        }

        let cf_state = self.cf(CF_STATE)?;
        let cf_txids = self.cf(CF_TXIDS)?;
        let cf_meta = self.cf(CF_META)?;

        let mut wb = WriteBatch::default();
        for (key, value) in &batch.writes {
            let bytes = bincode::serialize(value)
                .map_err(|e| StateError::SerializationError(e.to_string()))?;
            wb.put_cf(cf_state, key.as_bytes(), bytes);
        }
        for tx_id in &batch.tx_ids {
            wb.put_cf(cf_txids, tx_id.as_str().as_bytes(), batch.block_num.to_be_bytes());
        }
        wb.put_cf(cf_meta, META_HEIGHT, (batch.block_num + 1).to_be_bytes());
        wb.put_cf(cf_meta, META_LAST_HASH, batch.block_hash);

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        self.db
            .write_opt(wb, &write_opts)
            .map_err(|e| StateError::DatabaseError(format!("RocksDB batch write failed: {}", e)))
    }
}
