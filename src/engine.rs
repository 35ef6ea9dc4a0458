//! Engine Module
//!
//! Composes the span buffer and the epoch store into the operations the
//! slashing detector calls.
//!
//! ## Responsibilities
//! - Load an epoch's blob into an owned `EpochSpans` context
//! - Flush a context back under its epoch key
//! - Serialize read-modify-write sequences on epochs
//! - Prune epochs that fell out of the detection window

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::epoch::EpochSpans;
use crate::error::Result;
use crate::span::{EpochSpanBuffer, Span};
use crate::store::{EpochSpanStore, RedbEpochStore};

/// The span engine
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (`update_epoch`/`prune_epochs_before`): serialized by
///   `write_lock`, so two read-modify-write sequences never interleave
/// - **Reads** (`load_epoch`/`validator_span`): no lock, each is a single
///   read transaction of the store
/// - `flush` on its own is one write transaction; callers holding an
///   `EpochSpans` they loaded themselves own that epoch exclusively
pub struct SpanEngine<S: EpochSpanStore = RedbEpochStore> {
    /// Engine configuration
    config: Config,

    /// Persistent epoch store
    store: S,

    /// Serializes read-modify-write sequences
    write_lock: Mutex<()>,
}

impl SpanEngine<RedbEpochStore> {
    /// Open or create a redb-backed engine with the given config
    pub fn open(config: Config) -> Result<Self> {
        let store = RedbEpochStore::open(&config)?;
        info!(data_dir = %config.data_dir.display(), "span engine ready");
        Ok(Self::with_config(config, store))
    }
}

impl<S: EpochSpanStore> SpanEngine<S> {
    /// Engine over an existing store, default config
    pub fn with_store(store: S) -> Self {
        Self::with_config(Config::default(), store)
    }

    /// Engine over an existing store
    pub fn with_config(config: Config, store: S) -> Self {
        Self {
            config,
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the spans of `epoch`
    ///
    /// An epoch never saved yields an empty context, not an error.
    pub fn load_epoch(&self, epoch: u64) -> Result<EpochSpans> {
        let bytes = self.store.epoch_spans(epoch)?;
        Ok(EpochSpans::with_buffer(epoch, EpochSpanBuffer::from_bytes(bytes)))
    }

    /// Persist the full buffer of `spans` under its epoch
    pub fn flush(&self, spans: &EpochSpans) -> Result<()> {
        self.store
            .save_epoch_spans(spans.epoch(), spans.buffer().as_bytes())
    }

    /// Span of one validator in one epoch (load + decode)
    pub fn validator_span(&self, epoch: u64, index: u64) -> Result<Span> {
        self.load_epoch(epoch)?.validator_span(index)
    }

    /// Read-modify-write of one epoch
    ///
    /// Steps:
    /// 1. Acquire write lock
    /// 2. Load the epoch
    /// 3. Run `f` on the context
    /// 4. Flush only if `f` succeeded
    pub fn update_epoch<T, F>(&self, epoch: u64, f: F) -> Result<T>
    where
        F: FnOnce(&mut EpochSpans) -> Result<T>,
    {
        let _write_guard = self.write_lock.lock();

        let mut spans = self.load_epoch(epoch)?;
        let out = f(&mut spans)?;
        self.flush(&spans)?;

        debug!(epoch, len = spans.buffer().len(), "updated epoch spans");
        Ok(out)
    }

    /// Delete every stored epoch strictly below `epoch`
    ///
    /// Returns the number of epochs removed.
    pub fn prune_epochs_before(&self, epoch: u64) -> Result<usize> {
        let _write_guard = self.write_lock.lock();

        let mut removed = 0;
        for stored in self.store.stored_epochs()? {
            if stored >= epoch {
                break;
            }
            if self.store.delete_epoch_spans(stored)? {
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed, before = epoch, "pruned epoch spans");
        }
        Ok(removed)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
