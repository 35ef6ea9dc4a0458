//! Epoch span buffer
//!
//! Flat byte array holding one encoded span per validator for a single epoch.

use tracing::trace;

use crate::error::{Result, SpanDbError};

use super::codec::{decode_span, encode_span};
use super::{Span, SPAN_ENCODED_LENGTH};

/// Flat array of encoded spans, indexed by validator index
///
/// ## Invariants
/// - `len() % SPAN_ENCODED_LENGTH == 0`; any other length is corruption and
///   every accessor fails with `MalformedBuffer`
/// - Only grows: `set` appends zeroed records, never truncates
///
/// The highest validator index written through this buffer is tracked here
/// rather than process-wide, so a fresh epoch is sized only by its own writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpochSpanBuffer {
    /// Concatenated records in ascending validator index order
    bytes: Vec<u8>,

    /// Highest validator index set on (or loaded into) this buffer
    highest_observed_index: u64,
}

impl EpochSpanBuffer {
    /// Create an empty buffer (zero validators)
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap raw bytes loaded from storage
    ///
    /// No validation happens here; misaligned input is reported by the first
    /// `get`/`set`. The tracker starts at the last record already present.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let highest_observed_index = (bytes.len() / SPAN_ENCODED_LENGTH).saturating_sub(1) as u64;
        Self {
            bytes,
            highest_observed_index,
        }
    }

    /// Decode the span of validator `index`
    ///
    /// Returns:
    /// - `Ok(span)`: record present
    /// - `Ok(Span::default())`: record never written (past the end)
    /// - `Err(MalformedBuffer)`: buffer length is misaligned
    pub fn get(&self, index: u64) -> Result<Span> {
        self.check_alignment()?;

        let Some((cursor, end)) = record_window(index) else {
            // Offset cannot be addressed, so it was never written
            return Ok(Span::default());
        };
        if end > self.bytes.len() {
            return Ok(Span::default());
        }

        decode_span(&self.bytes[cursor..end])
    }

    /// Encode `span` at validator `index`, growing the buffer as needed
    ///
    /// Steps:
    /// 1. Check alignment
    /// 2. Raise the highest-index tracker
    /// 3. Allocate an empty buffer up to the tracker
    /// 4. Append zeroed records until the window fits
    /// 5. Overwrite the record in place
    pub fn set(&mut self, index: u64, span: &Span) -> Result<()> {
        self.check_alignment()?;

        let (cursor, end) = record_window(index).ok_or(SpanDbError::IndexOverflow(index))?;

        if index > self.highest_observed_index {
            self.highest_observed_index = index;
        }

        if self.bytes.is_empty() {
            let (_, initial_len) = record_window(self.highest_observed_index)
                .ok_or(SpanDbError::IndexOverflow(self.highest_observed_index))?;
            trace!(records = initial_len / SPAN_ENCODED_LENGTH, "allocating span buffer");
            self.bytes = vec![0u8; initial_len];
        }

        if end > self.bytes.len() {
            trace!(
                from = self.bytes.len(),
                to = end,
                "growing span buffer"
            );
            self.bytes.resize(end, 0);
        }

        self.bytes[cursor..end].copy_from_slice(&encode_span(span));
        Ok(())
    }

    /// Number of validator records held
    pub fn validator_count(&self) -> Result<u64> {
        self.check_alignment()?;
        Ok((self.bytes.len() / SPAN_ENCODED_LENGTH) as u64)
    }

    /// Iterate all records in ascending validator index order
    pub fn iter(&self) -> Result<SpanIter<'_>> {
        self.check_alignment()?;
        Ok(SpanIter {
            records: self.bytes.chunks_exact(SPAN_ENCODED_LENGTH),
            next_index: 0,
        })
    }

    /// Highest validator index written through (or loaded into) this buffer
    pub fn highest_observed_index(&self) -> u64 {
        self.highest_observed_index
    }

    /// Raw encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer, returning the raw encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if no record has been allocated yet
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn check_alignment(&self) -> Result<()> {
        if self.bytes.len() % SPAN_ENCODED_LENGTH != 0 {
            return Err(SpanDbError::MalformedBuffer {
                len: self.bytes.len(),
            });
        }
        Ok(())
    }
}

/// Byte range `[cursor, end)` of the record for `index`, if addressable
///
/// A `Vec<u8>` cannot hold more than `isize::MAX` bytes, so windows ending
/// past that are unaddressable too.
fn record_window(index: u64) -> Option<(usize, usize)> {
    let cursor = usize::try_from(index)
        .ok()?
        .checked_mul(SPAN_ENCODED_LENGTH)?;
    let end = cursor.checked_add(SPAN_ENCODED_LENGTH)?;
    if end > isize::MAX as usize {
        return None;
    }
    Some((cursor, end))
}

/// Iterator over `(validator_index, span)` pairs of a buffer
pub struct SpanIter<'a> {
    records: std::slice::ChunksExact<'a, u8>,
    next_index: u64,
}

impl Iterator for SpanIter<'_> {
    type Item = (u64, Span);

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        let index = self.next_index;
        self.next_index += 1;
        // chunks_exact only yields full records
        decode_span(record).ok().map(|span| (index, span))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}
