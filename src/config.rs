//! Configuration for spandb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpanDbError};

/// Main configuration for a spandb instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the database file
    /// Internal structure:
    ///   {data_dir}/
    ///     └── {db_filename}    (redb database holding the span table)
    pub data_dir: PathBuf,

    /// Name of the database file inside `data_dir`
    pub db_filename: String,

    /// Page cache size handed to the storage engine (in bytes)
    pub cache_size_bytes: usize,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// How write transactions are made durable on commit
    pub sync_strategy: SyncStrategy,
}

/// Commit sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStrategy {
    /// fsync on every commit (safest, slowest)
    Immediate,

    /// Commits become durable with a later immediate commit or on clean shutdown
    Eventual,
}

impl SyncStrategy {
    pub(crate) fn durability(self) -> redb::Durability {
        match self {
            SyncStrategy::Immediate => redb::Durability::Immediate,
            SyncStrategy::Eventual => redb::Durability::Eventual,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./spandb_data"),
            db_filename: "spans.redb".to_string(),
            cache_size_bytes: 64 * 1024 * 1024, // 64 MB
            sync_strategy: SyncStrategy::Immediate,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_filename)
    }

    /// Reject configurations the storage engine cannot open
    pub fn validate(&self) -> Result<()> {
        if self.db_filename.is_empty() {
            return Err(SpanDbError::Config("db_filename must not be empty".to_string()));
        }
        if self.cache_size_bytes == 0 {
            return Err(SpanDbError::Config(
                "cache_size_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the database file name
    pub fn db_filename(mut self, name: impl Into<String>) -> Self {
        self.config.db_filename = name.into();
        self
    }

    /// Set the engine cache size (in bytes)
    pub fn cache_size_bytes(mut self, size: usize) -> Self {
        self.config.cache_size_bytes = size;
        self
    }

    /// Set the commit sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
