//! In-memory backend
//!
//! Clones share the same map, so a test can keep a handle on the backend
//! after handing it to a store. Reads and writes can be made to fail on
//! demand to exercise error paths.

use super::BackendError;
use slopewatch_domain::BlobStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

/// Mutex-guarded map implementing [`BlobStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    inner: Arc<Inner>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail (or succeed again)
    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.entries().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether no keys are held
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, BackendError> {
        self.inner
            .entries
            .lock()
            .map_err(|_| BackendError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn check_read(&self) -> Result<(), BackendError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("injected read failure".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), BackendError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl BlobStore for MemoryBlobStore {
    type Error = BackendError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.check_read()?;
        Ok(self.entries()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.check_write()?;
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, Self::Error> {
        self.check_write()?;
        let mut entries = self.entries()?;
        if entries.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.check_write()?;
        self.entries()?.remove(key);
        Ok(())
    }
}
