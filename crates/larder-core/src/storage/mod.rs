//! # Storage Module
//!
//! Key -> bytes stores for the last-known-good snapshot.
//!
//! - `RedbSnapshotStore`: disk-backed, ACID (redb)
//! - `MemorySnapshotStore`: volatile, for tests and `--offline` runs

mod redb_snapshots;

pub use redb_snapshots::RedbSnapshotStore;

use crate::LarderError;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A synchronous blob store keyed by logical snapshot name.
///
/// Implementations must make `put` atomic: a reader sees either the old
/// bytes or the new bytes, never a mix.
pub trait SnapshotStore: Send + Sync {
    /// Bytes stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LarderError>;

    /// Replace the bytes stored under `key`.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), LarderError>;
}

/// In-memory snapshot store.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LarderError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| LarderError::PersistenceUnavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), LarderError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| LarderError::PersistenceUnavailable(e.to_string()))?;
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
