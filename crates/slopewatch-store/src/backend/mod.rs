//! Blob storage backends
//!
//! Every backend implements [`BlobStore`] and reports failures as
//! [`BackendError`]. [`AnyBlobStore`] lets the backend be chosen at runtime.

mod file;
mod memory;
mod sqlite;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;

use slopewatch_domain::BlobStore;
use thiserror::Error;

/// Errors raised by blob backends
#[derive(Error, Debug)]
pub enum BackendError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Key cannot be mapped onto the backend
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Backend is not able to serve requests
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// A backend selected at runtime
#[derive(Debug)]
pub enum AnyBlobStore {
    /// In-process map
    Memory(MemoryBlobStore),
    /// One file per key
    File(FileBlobStore),
    /// SQLite key-value table
    Sqlite(SqliteBlobStore),
}

impl AnyBlobStore {
    /// Short name of the active backend
    pub fn kind(&self) -> &'static str {
        match self {
            AnyBlobStore::Memory(_) => "memory",
            AnyBlobStore::File(_) => "file",
            AnyBlobStore::Sqlite(_) => "sqlite",
        }
    }
}

impl BlobStore for AnyBlobStore {
    type Error = BackendError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match self {
            AnyBlobStore::Memory(store) => store.get(key),
            AnyBlobStore::File(store) => store.get(key),
            AnyBlobStore::Sqlite(store) => store.get(key),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        match self {
            AnyBlobStore::Memory(store) => store.put(key, value),
            AnyBlobStore::File(store) => store.put(key, value),
            AnyBlobStore::Sqlite(store) => store.put(key, value),
        }
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, Self::Error> {
        match self {
            AnyBlobStore::Memory(store) => store.compare_and_swap(key, expected, value),
            AnyBlobStore::File(store) => store.compare_and_swap(key, expected, value),
            AnyBlobStore::Sqlite(store) => store.compare_and_swap(key, expected, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        match self {
            AnyBlobStore::Memory(store) => store.remove(key),
            AnyBlobStore::File(store) => store.remove(key),
            AnyBlobStore::Sqlite(store) => store.remove(key),
        }
    }
}

impl From<MemoryBlobStore> for AnyBlobStore {
    fn from(store: MemoryBlobStore) -> Self {
        AnyBlobStore::Memory(store)
    }
}

impl From<FileBlobStore> for AnyBlobStore {
    fn from(store: FileBlobStore) -> Self {
        AnyBlobStore::File(store)
    }
}

impl From<SqliteBlobStore> for AnyBlobStore {
    fn from(store: SqliteBlobStore) -> Self {
        AnyBlobStore::Sqlite(store)
    }
}
