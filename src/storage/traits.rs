//! Storage traits and error types
//!
//! This module defines the trait interface for record sinks and the
//! associated error types.

use crate::extract::FlatRecord;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink {path} has an unexpected header (expected {expected} columns starting with '{first}')")]
    HeaderMismatch {
        path: String,
        expected: usize,
        first: &'static str,
    },

    #[error("Sink {path} has no '{column}' column")]
    MissingColumn { path: String, column: &'static str },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for append-only record sinks
///
/// A sink only grows: records are never rewritten or removed, so the set
/// returned by `load_processed_ids` never shrinks between runs.
pub trait RecordStore {
    /// Creates the sink with its header if it does not exist yet
    ///
    /// An existing sink is left as it is.
    fn ensure_initialized(&mut self) -> StorageResult<()>;

    /// Ids of every record already in the sink
    ///
    /// Returns an empty set if the sink does not exist.
    fn load_processed_ids(&self) -> StorageResult<HashSet<String>>;

    /// Appends one record and makes it durable before returning
    fn append(&mut self, record: &FlatRecord) -> StorageResult<()>;
}
