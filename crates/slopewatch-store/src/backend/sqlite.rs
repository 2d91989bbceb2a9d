//! SQLite backend: a single key-value table
//!
//! Compare-and-swap is one conditional statement, so it stays atomic even
//! when several processes share the database file.

use super::BackendError;
use rusqlite::{params, Connection, OptionalExtension};
use slopewatch_domain::BlobStore;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-based implementation of [`BlobStore`]
///
/// The connection sits behind a mutex so the store can be shared between
/// threads.
#[derive(Debug)]
pub struct SqliteBlobStore {
    conn: Mutex<Connection>,
}

impl SqliteBlobStore {
    /// Open (or create) a database at `path`
    ///
    /// Use `:memory:` for an in-memory database.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use slopewatch_store::SqliteBlobStore;
    ///
    /// let store = SqliteBlobStore::new("slopewatch.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, BackendError> {
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, BackendError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, BackendError> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, BackendError> {
        self.conn
            .lock()
            .map_err(|_| BackendError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl BlobStore for SqliteBlobStore {
    type Error = BackendError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let value = self
            .conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.conn()?.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
             value = excluded.value,
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, Self::Error> {
        let conn = self.conn()?;
        let changed = match expected {
            Some(expected) => conn.execute(
                "UPDATE kv SET value = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE key = ?1 AND value = ?3",
                params![key, value, expected],
            )?,
            None => conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO NOTHING",
                params![key, value],
            )?,
        };
        Ok(changed == 1)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}
