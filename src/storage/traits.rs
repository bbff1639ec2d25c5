//! Storage traits and error types
//!
//! This module defines the trait interfaces for storage backends and
//! associated error types.

use crate::storage::{RunRecord, RunStatus};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Scan run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Raw key-value persistence for serialized blobs
///
/// Implementations must be safe to share between the scan pipeline
/// (checkpoints) and the search service.
pub trait KeyValueStore: Send + Sync {
    /// Gets the blob stored under `key`, if any
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous blob
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Dumps every raw blob keyed by name
    ///
    /// Only used for size and diagnostic reporting.
    fn raw_dump(&self) -> StorageResult<HashMap<String, String>>;
}

/// Persistent history of scan runs
pub trait RunHistory: Send + Sync {
    /// Records the start of a scan and returns its run ID
    fn create_run(&self, config_hash: &str, force_refresh: bool) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as completed with its change counts
    fn complete_run(
        &self,
        run_id: i64,
        added: usize,
        removed: usize,
        acquired: usize,
    ) -> StorageResult<()>;

    /// Marks a run as failed with an error message
    fn fail_run(&self, run_id: i64, error_message: &str) -> StorageResult<()>;

    /// Counts runs in a given status
    fn count_runs_by_status(&self, status: RunStatus) -> StorageResult<u64>;
}
