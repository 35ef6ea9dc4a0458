//! # spandb
//!
//! Per-epoch storage of validator min/max spans for slashing detection:
//! - Fixed 7-byte span records packed into one flat array per epoch
//! - Zero-filled monotonic growth addressed by validator index
//! - Epoch-keyed persistence in a transactional key-value store (redb)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Slashing Detection (caller)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      SpanEngine                              │
//! │            (load / flush / update_epoch / prune)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌───────────────┐
//!   │ EpochSpans  │          │ EpochSpanStore│
//!   │  (buffer)   │          │ (redb table)  │
//!   └──────┬──────┘          └───────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │ span codec  │
//!   │  (7 bytes)  │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod span;
pub mod epoch;
pub mod store;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SpanDbError, Result};
pub use config::{Config, SyncStrategy};
pub use span::{EpochSpanBuffer, Span, SPAN_ENCODED_LENGTH};
pub use epoch::EpochSpans;
pub use store::{EpochSpanStore, MemoryEpochStore, RedbEpochStore};
pub use engine::SpanEngine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of spandb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
