//! # redb-backed Snapshot Store
//!
//! The persisted last-known-good snapshot lives in a single redb table keyed
//! by a logical name. redb gives the blob store ACID writes and crash safety,
//! so a torn write never leaves a half snapshot behind.

use super::SnapshotStore;
use crate::LarderError;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Table for snapshots: logical key -> snapshot bytes
const SNAPSHOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

fn persistence(e: impl std::fmt::Display) -> LarderError {
    LarderError::PersistenceUnavailable(e.to_string())
}

/// A disk-backed snapshot store using redb.
pub struct RedbSnapshotStore {
    db: Database,
}

impl std::fmt::Debug for RedbSnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbSnapshotStore").finish_non_exhaustive()
    }
}

impl RedbSnapshotStore {
    /// Open or create a snapshot store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LarderError> {
        let db = Database::create(path.as_ref()).map_err(persistence)?;

        // Initialize the table so first reads see an empty store, not an error.
        let write_txn = db.begin_write().map_err(persistence)?;
        let _ = write_txn.open_table(SNAPSHOTS).map_err(persistence)?;
        write_txn.commit().map_err(persistence)?;

        Ok(Self { db })
    }
}

impl SnapshotStore for RedbSnapshotStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LarderError> {
        let read_txn = self.db.begin_read().map_err(persistence)?;
        let table = read_txn.open_table(SNAPSHOTS).map_err(persistence)?;
        let value = table.get(key).map_err(persistence)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), LarderError> {
        let write_txn = self.db.begin_write().map_err(persistence)?;
        {
            let mut table = write_txn.open_table(SNAPSHOTS).map_err(persistence)?;
            table.insert(key, bytes).map_err(persistence)?;
        }
        write_txn.commit().map_err(persistence)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_store_returns_none() {
        let temp = tempdir().expect("temp dir");
        let store = RedbSnapshotStore::open(temp.path().join("cache.redb")).expect("open");

        assert_eq!(store.get("recipes.db").expect("get"), None);
    }

    #[test]
    fn put_then_get() {
        let temp = tempdir().expect("temp dir");
        let store = RedbSnapshotStore::open(temp.path().join("cache.redb")).expect("open");

        store.put("recipes.db", b"first").expect("put");
        store.put("recipes.db", b"second").expect("put");

        assert_eq!(
            store.get("recipes.db").expect("get"),
            Some(b"second".to_vec())
        );
    }

    #[test]
    fn survives_reopen() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("cache.redb");
        {
            let store = RedbSnapshotStore::open(&path).expect("open");
            store.put("recipes.db", b"persisted").expect("put");
        }

        let store = RedbSnapshotStore::open(&path).expect("reopen");
        assert_eq!(
            store.get("recipes.db").expect("get"),
            Some(b"persisted".to_vec())
        );
    }

    #[test]
    fn unwritable_path_is_persistence_error() {
        let temp = tempdir().expect("temp dir");
        let result = RedbSnapshotStore::open(temp.path().join("missing").join("cache.redb"));
        assert!(matches!(
            result,
            Err(LarderError::PersistenceUnavailable(_))
        ));
    }
}
