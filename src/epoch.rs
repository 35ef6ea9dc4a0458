//! Epoch context
//!
//! Single-owner handle tying an epoch number to its span buffer.

use crate::error::Result;
use crate::span::{EpochSpanBuffer, Span};

/// Spans of every validator for one epoch
///
/// Mutation goes through `&mut self`, so a read-modify-write sequence on one
/// epoch always holds the buffer exclusively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochSpans {
    epoch: u64,
    buffer: EpochSpanBuffer,
}

impl EpochSpans {
    /// Fresh context with no validators recorded
    pub fn new(epoch: u64) -> Self {
        Self::with_buffer(epoch, EpochSpanBuffer::new())
    }

    /// Context over an existing buffer (typically loaded from a store)
    pub fn with_buffer(epoch: u64, buffer: EpochSpanBuffer) -> Self {
        Self { epoch, buffer }
    }

    /// Span of validator `index`; zero span if never written
    pub fn validator_span(&self, index: u64) -> Result<Span> {
        self.buffer.get(index)
    }

    /// Record `span` for validator `index`
    pub fn set_validator_span(&mut self, index: u64, span: Span) -> Result<()> {
        self.buffer.set(index, &span)
    }

    /// Epoch this context belongs to
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Get the underlying span buffer
    pub fn buffer(&self) -> &EpochSpanBuffer {
        &self.buffer
    }

    /// Consume the context, returning its buffer
    pub fn into_buffer(self) -> EpochSpanBuffer {
        self.buffer
    }
}
