//! SlopeWatch Storage Layer
//!
//! Owns the durable, ordered reading log. The log is stored as a single JSON
//! blob under one key of an injected [`BlobStore`] backend.
//!
//! # Architecture
//!
//! - [`ReadingStore`] does the read-modify-write of the whole log
//! - [`schema`] defines the versioned on-disk record format
//! - [`backend`] provides in-memory, file and SQLite backends
//!
//! Appends use the backend's compare-and-swap: if another writer changed the
//! blob between the read and the write, the append is retried against the
//! fresh log instead of overwriting it.
//!
//! # Examples
//!
//! ```
//! use slopewatch_store::{MemoryBlobStore, ReadingStore};
//!
//! let store = ReadingStore::new(MemoryBlobStore::new());
//! assert!(store.load_all().unwrap().is_empty());
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod schema;

pub use backend::{AnyBlobStore, BackendError, FileBlobStore, MemoryBlobStore, SqliteBlobStore};

use slopewatch_domain::{BlobStore, Reading, ReadingId};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend read or write failure
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Persisted log does not parse into the record schema
    #[error("Corrupt reading log: {0}")]
    CorruptData(String),

    /// Reading id already present in the log
    #[error("Duplicate reading id: {0}")]
    DuplicateId(ReadingId),

    /// Concurrent writers kept changing the log
    #[error("Reading log changed concurrently; gave up after {attempts} attempts")]
    Conflict {
        /// Number of read-modify-write attempts made
        attempts: u32,
    },

    /// Log could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only reading log over a blob backend
///
/// # Thread Safety
///
/// A `ReadingStore` does no locking of its own beyond the backend's
/// compare-and-swap. Callers that share one store between threads should
/// serialize access, as `MonitoringService` does.
#[derive(Debug)]
pub struct ReadingStore<B> {
    backend: B,
    key: String,
    max_append_attempts: u32,
}

impl<B: BlobStore> ReadingStore<B> {
    /// Key the log is stored under unless configured otherwise
    pub const DEFAULT_KEY: &'static str = "readings";

    /// Read-modify-write attempts before an append gives up
    pub const DEFAULT_MAX_APPEND_ATTEMPTS: u32 = 3;

    /// Create a store using the default key
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, Self::DEFAULT_KEY)
    }

    /// Create a store keeping its log under `key`
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            max_append_attempts: Self::DEFAULT_MAX_APPEND_ATTEMPTS,
        }
    }

    /// Set how many times an append retries after losing a race (minimum 1)
    pub fn with_max_append_attempts(mut self, attempts: u32) -> Self {
        self.max_append_attempts = attempts.max(1);
        self
    }

    /// Key the log is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn read_blob(&self) -> Result<Option<String>, StoreError> {
        self.backend.get(&self.key).map_err(|e| {
            tracing::error!(key = %self.key, error = %e, "Failed to read reading log");
            StoreError::Backend(e.to_string())
        })
    }

    fn decode(&self, blob: &str) -> Result<Vec<Reading>, StoreError> {
        let decoded = schema::decode_log(blob).map_err(|e| {
            tracing::error!(key = %self.key, error = %e, "Reading log failed to parse");
            e
        })?;
        if decoded.version < schema::SCHEMA_VERSION {
            tracing::debug!(
                key = %self.key,
                version = decoded.version,
                "Loaded legacy log; it will be upgraded on the next append"
            );
        }
        Ok(decoded.readings)
    }

    /// Load the full log in insertion order
    ///
    /// A missing blob is the valid "no data yet" state and yields an empty
    /// vector. A blob that does not parse yields [`StoreError::CorruptData`].
    pub fn load_all(&self) -> Result<Vec<Reading>, StoreError> {
        match self.read_blob()? {
            Some(blob) => self.decode(&blob),
            None => Ok(Vec::new()),
        }
    }

    /// Append a reading and persist the whole log as one unit
    ///
    /// Nothing is written if the id already exists or if the write fails, so
    /// the prior log is left untouched on every error path.
    pub fn append(&mut self, reading: Reading) -> Result<(), StoreError> {
        for attempt in 1..=self.max_append_attempts {
            let current = self.read_blob()?;
            let mut readings = match current.as_deref() {
                Some(blob) => self.decode(blob)?,
                None => Vec::new(),
            };

            if readings.iter().any(|r| r.id == reading.id) {
                tracing::error!(id = %reading.id, "Refusing to append duplicate reading id");
                return Err(StoreError::DuplicateId(reading.id));
            }

            readings.push(reading.clone());
            let encoded = schema::encode_log(&readings)?;

            let swapped = self
                .backend
                .compare_and_swap(&self.key, current.as_deref(), &encoded)
                .map_err(|e| {
                    tracing::error!(key = %self.key, error = %e, "Failed to write reading log");
                    StoreError::Backend(e.to_string())
                })?;

            if swapped {
                tracing::debug!(id = %reading.id, entries = readings.len(), "Appended reading");
                return Ok(());
            }

            tracing::warn!(
                key = %self.key,
                attempt,
                "Reading log changed during append; retrying"
            );
        }

        Err(StoreError::Conflict {
            attempts: self.max_append_attempts,
        })
    }

    /// Remove the whole log in one backend call
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove(&self.key).map_err(|e| {
            tracing::error!(key = %self.key, error = %e, "Failed to clear reading log");
            StoreError::Backend(e.to_string())
        })?;
        tracing::info!(key = %self.key, "Cleared reading log");
        Ok(())
    }

    /// Number of readings in the log
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load_all()?.len())
    }

    /// Whether the log holds no readings
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
