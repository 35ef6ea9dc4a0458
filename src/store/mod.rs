//! Store Module
//!
//! Epoch-keyed persistence of span buffers.
//!
//! ## Responsibilities
//! - Load the raw span blob of an epoch (empty when absent)
//! - Persist a blob atomically, rejecting misaligned input
//! - Prune epochs that fell out of the detection window
//!
//! ## Persisted Layout
//! ```text
//! table "validators-min-max-span-bucket-new"
//! ┌────────────────────────┬──────────────────────────────────────┐
//! │ Key: epoch (u64 BE, 8) │ Value: 7 * (highest index + 1) bytes │
//! └────────────────────────┴──────────────────────────────────────┘
//! ```

mod memory;
mod redb_store;

pub use memory::MemoryEpochStore;
pub use redb_store::RedbEpochStore;

use std::sync::Arc;

use crate::error::{Result, SpanDbError};
use crate::span::SPAN_ENCODED_LENGTH;

/// Name of the table holding epoch span blobs
pub const SPANS_TABLE_NAME: &str = "validators-min-max-span-bucket-new";

/// Storage key for an epoch: 8-byte big-endian
pub fn epoch_key(epoch: u64) -> [u8; 8] {
    epoch.to_be_bytes()
}

/// Inverse of [`epoch_key`]; `None` for keys of the wrong width
pub fn epoch_from_key(key: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/// Persistence backend for epoch span blobs
///
/// Every call maps to exactly one transaction of the backing engine and
/// completes before returning; failures are surfaced, never retried.
pub trait EpochSpanStore: Send + Sync {
    /// Raw span blob for `epoch`, or an empty vec if nothing is stored
    ///
    /// The bytes are returned as stored, without alignment validation.
    fn epoch_spans(&self, epoch: u64) -> Result<Vec<u8>>;

    /// Persist `spans` as the blob for `epoch`, replacing any previous one
    fn save_epoch_spans(&self, epoch: u64, spans: &[u8]) -> Result<()>;

    /// Remove the blob for `epoch`; returns whether one existed
    fn delete_epoch_spans(&self, epoch: u64) -> Result<bool>;

    /// Epochs with a stored blob, ascending
    fn stored_epochs(&self) -> Result<Vec<u64>>;

    /// Check if a blob (possibly empty) is stored for `epoch`
    fn has_epoch_spans(&self, epoch: u64) -> Result<bool>;
}

impl<S: EpochSpanStore + ?Sized> EpochSpanStore for Arc<S> {
    fn epoch_spans(&self, epoch: u64) -> Result<Vec<u8>> {
        (**self).epoch_spans(epoch)
    }

    fn save_epoch_spans(&self, epoch: u64, spans: &[u8]) -> Result<()> {
        (**self).save_epoch_spans(epoch, spans)
    }

    fn delete_epoch_spans(&self, epoch: u64) -> Result<bool> {
        (**self).delete_epoch_spans(epoch)
    }

    fn stored_epochs(&self) -> Result<Vec<u64>> {
        (**self).stored_epochs()
    }

    fn has_epoch_spans(&self, epoch: u64) -> Result<bool> {
        (**self).has_epoch_spans(epoch)
    }
}

/// Alignment check applied before anything is written
pub(crate) fn ensure_aligned(spans: &[u8]) -> Result<()> {
    if spans.len() % SPAN_ENCODED_LENGTH != 0 {
        return Err(SpanDbError::MalformedBuffer { len: spans.len() });
    }
    Ok(())
}
