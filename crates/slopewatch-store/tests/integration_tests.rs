//! Integration tests for slopewatch-store
//!
//! These tests exercise the full append/load cycle against each backend.

use chrono::{TimeZone, Utc};
use slopewatch_domain::{BlobStore, Reading, ReadingId};
use slopewatch_store::{
    schema, BackendError, FileBlobStore, MemoryBlobStore, ReadingStore, SqliteBlobStore,
    StoreError,
};
use std::cell::Cell;
use tempfile::TempDir;

fn reading(moisture: f64, angle: f64, observation: Option<&str>) -> Reading {
    Reading::new(
        ReadingId::new(),
        Utc::now(),
        moisture,
        angle,
        observation.map(str::to_string),
    )
}

fn exercise_backend<B: BlobStore>(mut store: ReadingStore<B>) {
    assert!(store.load_all().unwrap().is_empty());

    let first = reading(12.0, 8.0, Some("after light rain"));
    let second = reading(72.5, 33.0, None);
    store.append(first.clone()).unwrap();
    store.append(second.clone()).unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded, vec![first, second]);
}

#[test]
fn test_memory_backend_cycle() {
    exercise_backend(ReadingStore::new(MemoryBlobStore::new()));
}

#[test]
fn test_file_backend_cycle() {
    let dir = TempDir::new().unwrap();
    exercise_backend(ReadingStore::new(FileBlobStore::new(dir.path()).unwrap()));
}

#[test]
fn test_sqlite_backend_cycle() {
    exercise_backend(ReadingStore::new(SqliteBlobStore::in_memory().unwrap()));
}

#[test]
fn test_append_then_load_returns_reading_last() {
    let mut store = ReadingStore::new(MemoryBlobStore::new());
    for i in 0..5 {
        store.append(reading(i as f64 * 10.0, 5.0, None)).unwrap();
    }

    let r = reading(44.4, 22.2, Some("seepage at the toe"));
    store.append(r.clone()).unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.len(), 6);
    assert_eq!(loaded.last(), Some(&r));
}

#[test]
fn test_consecutive_loads_identical() {
    let mut store = ReadingStore::new(MemoryBlobStore::new());
    store.append(reading(30.0, 20.0, None)).unwrap();
    store.append(reading(60.0, 40.0, Some("note"))).unwrap();

    assert_eq!(store.load_all().unwrap(), store.load_all().unwrap());
}

#[test]
fn test_duplicate_detection() {
    let mut store = ReadingStore::new(MemoryBlobStore::new());
    let r = reading(30.0, 20.0, None);

    assert!(store.append(r.clone()).is_ok());

    let result = store.append(r.clone());
    assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == r.id));
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_corrupt_blob_surfaces() {
    let backend = MemoryBlobStore::new();
    backend.put("readings", "{ definitely not a log").unwrap();
    let mut store = ReadingStore::new(backend.clone());

    assert!(matches!(store.load_all(), Err(StoreError::CorruptData(_))));

    // Appending must not paper over the damage either
    assert!(matches!(
        store.append(reading(10.0, 10.0, None)),
        Err(StoreError::CorruptData(_))
    ));
    assert_eq!(
        backend.get("readings").unwrap().as_deref(),
        Some("{ definitely not a log")
    );
}

#[test]
fn test_write_failure_leaves_log_untouched() {
    let backend = MemoryBlobStore::new();
    let mut store = ReadingStore::new(backend.clone());
    let kept = reading(20.0, 10.0, None);
    store.append(kept.clone()).unwrap();

    backend.fail_writes(true);
    let result = store.append(reading(90.0, 60.0, None));
    assert!(matches!(result, Err(StoreError::Backend(_))));

    backend.fail_writes(false);
    assert_eq!(store.load_all().unwrap(), vec![kept]);
}

#[test]
fn test_read_failure_surfaces() {
    let backend = MemoryBlobStore::new();
    let store = ReadingStore::new(backend.clone());

    backend.fail_reads(true);
    assert!(matches!(store.load_all(), Err(StoreError::Backend(_))));
}

#[test]
fn test_legacy_log_is_migrated_on_append() {
    let backend = MemoryBlobStore::new();
    backend
        .put(
            "readings",
            r#"[{"id":"9b2f0c8e-6d1a-4f5e-8a77-3c2b1d0e9f41","timestamp":"2024-01-05T08:30:00.000Z","soilMoisture":55,"slopeAngle":20,"observation":""}]"#,
        )
        .unwrap();
    let mut store = ReadingStore::new(backend.clone());

    let legacy = store.load_all().unwrap();
    assert_eq!(legacy.len(), 1);
    assert_eq!(
        legacy[0].timestamp,
        Utc.with_ymd_and_hms(2024, 1, 5, 8, 30, 0).unwrap()
    );

    let fresh = reading(15.0, 5.0, None);
    store.append(fresh.clone()).unwrap();

    let blob = backend.get("readings").unwrap().unwrap();
    let decoded = schema::decode_log(&blob).unwrap();
    assert_eq!(decoded.version, schema::SCHEMA_VERSION);
    assert_eq!(decoded.readings.len(), 2);
    assert_eq!(decoded.readings[0].id, legacy[0].id);
    assert_eq!(decoded.readings[1], fresh);
}

/// Backend that lets another writer sneak in before the first N swaps
struct InterferingBackend {
    inner: MemoryBlobStore,
    interferences_left: Cell<u32>,
}

impl BlobStore for InterferingBackend {
    type Error = BackendError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.inner.put(key, value)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, Self::Error> {
        let left = self.interferences_left.get();
        if left > 0 {
            self.interferences_left.set(left - 1);
            let mut foreign = ReadingStore::new(self.inner.clone());
            foreign
                .append(reading(50.0, 25.0, Some("written by another device")))
                .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        }
        self.inner.compare_and_swap(key, expected, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.inner.remove(key)
    }
}

#[test]
fn test_concurrent_write_is_retried_not_lost() {
    let inner = MemoryBlobStore::new();
    let backend = InterferingBackend {
        inner: inner.clone(),
        interferences_left: Cell::new(1),
    };
    let mut store = ReadingStore::new(backend);

    let mine = reading(10.0, 10.0, None);
    store.append(mine.clone()).unwrap();

    let loaded = ReadingStore::new(inner).load_all().unwrap();
    assert_eq!(loaded.len(), 2, "the foreign write must survive");
    assert_eq!(
        loaded[0].observation.as_deref(),
        Some("written by another device")
    );
    assert_eq!(loaded[1], mine);
}

#[test]
fn test_conflict_after_exhausting_attempts() {
    let inner = MemoryBlobStore::new();
    let backend = InterferingBackend {
        inner: inner.clone(),
        interferences_left: Cell::new(10),
    };
    let mut store = ReadingStore::new(backend).with_max_append_attempts(2);

    let result = store.append(reading(10.0, 10.0, None));
    assert!(matches!(result, Err(StoreError::Conflict { attempts: 2 })));

    // Only the two foreign readings made it in
    assert_eq!(ReadingStore::new(inner).len().unwrap(), 2);
}

#[test]
fn test_file_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let r = reading(33.0, 44.0, Some("persist me"));
    {
        let mut store = ReadingStore::new(FileBlobStore::new(dir.path()).unwrap());
        store.append(r.clone()).unwrap();
    }

    let store = ReadingStore::new(FileBlobStore::new(dir.path()).unwrap());
    assert_eq!(store.load_all().unwrap(), vec![r]);
}

#[test]
fn test_sqlite_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("readings.db");
    let r = reading(61.0, 12.0, None);
    {
        let mut store = ReadingStore::new(SqliteBlobStore::new(&path).unwrap());
        store.append(r.clone()).unwrap();
    }

    let store = ReadingStore::new(SqliteBlobStore::new(&path).unwrap());
    assert_eq!(store.load_all().unwrap(), vec![r]);
}
