//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Implementations live in other crates.

use chrono::{DateTime, Utc};
use std::fmt::Display;

/// Durable key-value blob storage
///
/// Implemented by the infrastructure layer (slopewatch-store). The reading
/// log is kept as a single blob under one key, so every operation here works
/// on whole values.
pub trait BlobStore {
    /// Error type for backend operations
    type Error: Display;

    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite the value stored under `key` as one atomic unit
    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Replace the value under `key` only if it still equals `expected`
    ///
    /// `expected == None` means the key must be absent. Returns `false`
    /// without writing when the current value differs.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, Self::Error>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Source of the current instant
///
/// Implemented by the application layer (slopewatch-monitor) so intake
/// timestamps can be controlled in tests.
pub trait Clock {
    /// Get the current instant
    fn now(&self) -> DateTime<Utc>;
}
