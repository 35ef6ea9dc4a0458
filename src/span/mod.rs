//! Span Module
//!
//! Per-validator span records and the flat per-epoch array they live in.
//!
//! ## Responsibilities
//! - Fixed-width encoding of a single validator's span
//! - Flat-array addressing by validator index
//! - Monotonic, zero-filled growth of an epoch's buffer
//!
//! ## Record Format
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬─────────────┐
//! │ MinSpan (2)  │ MaxSpan (2)  │ SigBytes (2) │ Attested (1)│
//! │   u16 LE     │   u16 LE     │    raw       │  0x00/0x01  │
//! └──────────────┴──────────────┴──────────────┴─────────────┘
//! ```
//!
//! ## Buffer Layout
//! ```text
//! ┌──────────┬──────────┬──────────┬─────┬──────────┐
//! │ record 0 │ record 1 │ record 2 │ ... │ record n │
//! └──────────┴──────────┴──────────┴─────┴──────────┘
//!   [0, 7)     [7, 14)    [14, 21)         [7n, 7n+7)
//! ```

mod buffer;
mod codec;

use serde::{Deserialize, Serialize};

pub use buffer::{EpochSpanBuffer, SpanIter};
pub use codec::{decode_span, encode_span};

/// Size of one encoded span record in bytes
pub const SPAN_ENCODED_LENGTH: usize = 7;

/// Min/max vote distances for one validator within one epoch
///
/// The zero value (`Span::default()`) is what every never-written
/// validator decodes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Minimum distance to a target epoch
    pub min_span: u16,

    /// Maximum distance to a target epoch
    pub max_span: u16,

    /// Two bytes of the attestation signature, used to tell conflicting votes apart
    pub sig_bytes: [u8; 2],

    /// Whether the validator attested in this epoch
    pub has_attested: bool,
}

impl Span {
    /// Create a span from its four fields
    pub fn new(min_span: u16, max_span: u16, sig_bytes: [u8; 2], has_attested: bool) -> Self {
        Self {
            min_span,
            max_span,
            sig_bytes,
            has_attested,
        }
    }

    /// True for the all-zero record
    pub fn is_zero(&self) -> bool {
        *self == Span::default()
    }
}
