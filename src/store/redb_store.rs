//! Redb-backed epoch store
//!
//! Persists span blobs in a dedicated redb table, one transaction per call.

use std::fs;

use redb::backends::InMemoryBackend;
use redb::{Database, Durability, ReadableTable, TableDefinition, TableError};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;

use super::{ensure_aligned, epoch_from_key, epoch_key, EpochSpanStore, SPANS_TABLE_NAME};

/// Table of span blobs: 8-byte big-endian epoch → raw records
const SPANS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new(SPANS_TABLE_NAME);

/// Epoch span store on top of a redb database
///
/// ## Concurrency:
/// - Read transactions run concurrently and never see a partial commit
/// - Write transactions are serialized by redb itself
/// - All methods use `&self`
pub struct RedbEpochStore {
    db: Database,

    /// Durability applied to every write transaction
    durability: Durability,
}

impl RedbEpochStore {
    /// Open or create the database described by `config`
    ///
    /// On startup:
    /// 1. Validate config
    /// 2. Create the data directory if it doesn't exist
    /// 3. Open/create the database file with the configured cache size
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let path = config.db_path();
        let mut builder = Database::builder();
        builder.set_cache_size(config.cache_size_bytes);
        let db = builder.create(&path)?;

        info!(path = %path.display(), "opened span database");

        Ok(Self {
            db,
            durability: config.sync_strategy.durability(),
        })
    }

    /// Database living only in memory (nothing touches disk)
    pub fn in_memory() -> Result<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Ok(Self {
            db,
            durability: Durability::Immediate,
        })
    }
}

impl EpochSpanStore for RedbEpochStore {
    fn epoch_spans(&self, epoch: u64) -> Result<Vec<u8>> {
        let txn = self.db.begin_read()?;

        let table = match txn.open_table(SPANS_TABLE) {
            Ok(table) => table,
            // Nothing was ever saved
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let key = epoch_key(epoch);
        let spans = table
            .get(&key[..])?
            .map(|value| value.value().to_vec())
            .unwrap_or_default();

        debug!(epoch, len = spans.len(), "loaded epoch spans");
        Ok(spans)
    }

    fn save_epoch_spans(&self, epoch: u64, spans: &[u8]) -> Result<()> {
        ensure_aligned(spans)?;

        let mut txn = self.db.begin_write()?;
        txn.set_durability(self.durability);
        {
            let mut table = txn.open_table(SPANS_TABLE)?;
            let key = epoch_key(epoch);
            table.insert(&key[..], spans)?;
        }
        txn.commit()?;

        debug!(epoch, len = spans.len(), "saved epoch spans");
        Ok(())
    }

    fn delete_epoch_spans(&self, epoch: u64) -> Result<bool> {
        let mut txn = self.db.begin_write()?;
        txn.set_durability(self.durability);
        let removed;
        {
            let mut table = txn.open_table(SPANS_TABLE)?;
            let key = epoch_key(epoch);
            removed = table.remove(&key[..])?.is_some();
        }
        txn.commit()?;

        debug!(epoch, removed, "deleted epoch spans");
        Ok(removed)
    }

    fn stored_epochs(&self) -> Result<Vec<u64>> {
        let txn = self.db.begin_read()?;

        let table = match txn.open_table(SPANS_TABLE) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // Big-endian keys iterate in numeric order
        let mut epochs = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            if let Some(epoch) = epoch_from_key(key.value()) {
                epochs.push(epoch);
            }
        }
        Ok(epochs)
    }

    fn has_epoch_spans(&self, epoch: u64) -> Result<bool> {
        let txn = self.db.begin_read()?;

        let table = match txn.open_table(SPANS_TABLE) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let key = epoch_key(epoch);
        let present = table.get(&key[..])?.is_some();
        Ok(present)
    }
}
