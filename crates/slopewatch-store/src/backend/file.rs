//! File backend: one file per key under a root directory
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so readers see either the old or the new blob and never a
//! partial one. Compare-and-swap is serialized within the process; separate
//! processes sharing a directory should use the SQLite backend instead.

use super::BackendError;
use slopewatch_domain::BlobStore;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

const BLOB_EXTENSION: &str = "json";

/// Directory-backed implementation of [`BlobStore`]
#[derive(Debug)]
pub struct FileBlobStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, BackendError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "Opened file blob store");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the blobs
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, BackendError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(BackendError::InvalidKey(format!(
                "'{}' must be non-empty, not start with '.', and use only [A-Za-z0-9._-]",
                key
            )));
        }
        Ok(self.root.join(format!("{}.{}", key, BLOB_EXTENSION)))
    }

    fn read(&self, path: &Path) -> Result<Option<String>, BackendError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_atomic(&self, path: &Path, value: &str) -> Result<(), BackendError> {
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, BackendError> {
        self.write_lock
            .lock()
            .map_err(|_| BackendError::Unavailable("file store lock poisoned".to_string()))
    }
}

impl BlobStore for FileBlobStore {
    type Error = BackendError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key)?;
        self.read(&path)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        let _guard = self.lock()?;
        self.write_atomic(&path, value)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, Self::Error> {
        let path = self.path_for(key)?;
        let _guard = self.lock()?;
        if self.read(&path)?.as_deref() != expected {
            return Ok(false);
        }
        self.write_atomic(&path, value)?;
        Ok(true)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        let _guard = self.lock()?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_and_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileBlobStore::new(dir.path()).unwrap();
            store.put("readings", "[1,2,3]").unwrap();
        }

        let store = FileBlobStore::new(dir.path()).unwrap();
        assert_eq!(store.get("readings").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(dir.path().join("readings.json").exists());
    }

    #[test]
    fn test_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path().join("nested")).unwrap();
        assert_eq!(store.get("readings").unwrap(), None);
        store.remove("readings").unwrap();
    }

    #[test]
    fn test_compare_and_swap() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path()).unwrap();

        assert!(store.compare_and_swap("k", None, "a").unwrap());
        assert!(!store.compare_and_swap("k", None, "b").unwrap());
        assert!(store.compare_and_swap("k", Some("a"), "b").unwrap());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path()).unwrap();

        for key in ["", "../escape", ".hidden", "a/b", "a b"] {
            assert!(
                matches!(store.get(key), Err(BackendError::InvalidKey(_))),
                "key should be rejected: {:?}",
                key
            );
        }
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(dir.path()).unwrap();
        store.put("readings", "one").unwrap();
        store.put("readings", "two").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
