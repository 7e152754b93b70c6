//! Bounded, file-persisted request log.
//!
//! # Responsibilities
//! - Persist records as a single JSON array; the file is the source of truth
//! - Truncate to the most recent entries on every write (FIFO eviction)
//! - Recover from a missing or corrupt file as empty history
//!
//! # Design Decisions
//! - Whole-file read/rewrite per mutation; no incremental append
//! - A mutex serializes the read-modify-write sequence (single writer)
//! - Read failures are never surfaced: `load_or_empty` cannot fail

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::Mutex;

pub mod record;

pub use record::{BodyPayload, RequestRecord};

/// Error from the write path. Reads never fail.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize log entries: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append-only request log backed by a single JSON file.
pub struct LogStore {
    path: PathBuf,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the persisted collection, treating any failure as empty history.
    ///
    /// Missing file, unreadable file, and malformed JSON all yield an empty
    /// vector. The store is a diagnostic aid, not a system of record, so
    /// availability of the read/write path wins over surfacing corruption.
    pub async fn load_or_empty(&self) -> Vec<RequestRecord> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "Log file unreadable, treating as empty history"
                );
                crate::observability::metrics::record_store_recovery();
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "Log file corrupt, treating as empty history"
                );
                crate::observability::metrics::record_store_recovery();
                Vec::new()
            }
        }
    }

    /// Append one record, evicting the oldest entries beyond capacity, and
    /// rewrite the whole collection. Returns the stored record for response
    /// construction.
    pub async fn append(&self, record: RequestRecord) -> Result<RequestRecord, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_or_empty().await;
        records.push(record.clone());
        if records.len() > self.capacity {
            let excess = records.len() - self.capacity;
            records.drain(..excess);
        }

        let serialized = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(&self.path, serialized).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = records.len(),
            "Request log persisted"
        );
        Ok(record)
    }

    /// All records newest-first, plus the total count on disk.
    pub async fn list_all(&self) -> (Vec<RequestRecord>, usize) {
        let mut records = self.load_or_empty().await;
        let count = records.len();
        records.reverse();
        (records, count)
    }

    /// Insertion-ordered snapshot for aggregation.
    pub async fn snapshot(&self) -> Vec<RequestRecord> {
        self.load_or_empty().await
    }
}
