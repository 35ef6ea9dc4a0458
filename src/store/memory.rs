//! In-memory epoch store
//!
//! BTreeMap-backed store with the same contract as the redb store, for tests
//! and tooling that should not touch disk.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;

use super::{ensure_aligned, EpochSpanStore};

/// Memory-based epoch span store
#[derive(Debug, Default)]
pub struct MemoryEpochStore {
    spans: RwLock<BTreeMap<u64, Vec<u8>>>,
}

impl MemoryEpochStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new store wrapped in Arc
    pub fn new_arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of stored epochs
    pub fn len(&self) -> usize {
        self.spans.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.read().is_empty()
    }
}

impl EpochSpanStore for MemoryEpochStore {
    fn epoch_spans(&self, epoch: u64) -> Result<Vec<u8>> {
        Ok(self.spans.read().get(&epoch).cloned().unwrap_or_default())
    }

    fn save_epoch_spans(&self, epoch: u64, spans: &[u8]) -> Result<()> {
        ensure_aligned(spans)?;
        self.spans.write().insert(epoch, spans.to_vec());
        Ok(())
    }

    fn delete_epoch_spans(&self, epoch: u64) -> Result<bool> {
        Ok(self.spans.write().remove(&epoch).is_some())
    }

    fn stored_epochs(&self) -> Result<Vec<u64>> {
        Ok(self.spans.read().keys().copied().collect())
    }

    fn has_epoch_spans(&self, epoch: u64) -> Result<bool> {
        Ok(self.spans.read().contains_key(&epoch))
    }
}
