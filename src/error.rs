//! Error types for spandb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SpanDbError
pub type Result<T> = std::result::Result<T, SpanDbError>;

/// Unified error type for spandb operations
#[derive(Debug, Error)]
pub enum SpanDbError {
    // -------------------------------------------------------------------------
    // Span Buffer Errors
    // -------------------------------------------------------------------------
    #[error("wrong data length for min max span byte array: {len} is not a multiple of 7")]
    MalformedBuffer { len: usize },

    #[error("validator index {0} does not fit in the span buffer address space")]
    IndexOverflow(u64),

    // -------------------------------------------------------------------------
    // Storage Engine Errors
    // -------------------------------------------------------------------------
    #[error("storage engine error: {0}")]
    Engine(#[from] redb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SpanDbError {
    /// Whether this error signals a misaligned span blob
    pub fn is_malformed(&self) -> bool {
        matches!(self, SpanDbError::MalformedBuffer { .. })
    }
}

// redb reports each transaction phase with its own error type; all of them
// collapse into `Engine` unchanged.
macro_rules! engine_error_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for SpanDbError {
                fn from(err: $ty) -> Self {
                    SpanDbError::Engine(err.into())
                }
            }
        )*
    };
}

engine_error_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
