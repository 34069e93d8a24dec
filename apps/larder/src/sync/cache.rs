//! Snapshot caches over the core's blocking `SnapshotStore`s.

use super::SnapshotCache;
use async_trait::async_trait;
use larder_core::primitives::SNAPSHOT_KEY;
use larder_core::{LarderError, RedbSnapshotStore, SnapshotStore};
use std::path::PathBuf;
use std::sync::Arc;

fn join_error(e: tokio::task::JoinError) -> LarderError {
    LarderError::PersistenceUnavailable(format!("Storage task failed: {}", e))
}

/// A cache backed by a `SnapshotStore`; store calls run on the blocking pool.
#[derive(Clone)]
pub struct StoreCache {
    store: Arc<dyn SnapshotStore>,
    key: String,
}

impl StoreCache {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self::with_key(store, SNAPSHOT_KEY)
    }

    pub fn with_key(store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl SnapshotCache for StoreCache {
    async fn get(&self) -> Result<Option<Vec<u8>>, LarderError> {
        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        tokio::task::spawn_blocking(move || store.get(&key))
            .await
            .map_err(join_error)?
    }

    async fn put(&self, bytes: Vec<u8>) -> Result<(), LarderError> {
        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        tokio::task::spawn_blocking(move || store.put(&key, &bytes))
            .await
            .map_err(join_error)?
    }
}

/// Persistence is unavailable: never a hit, writes go nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait]
impl SnapshotCache for NullCache {
    async fn get(&self) -> Result<Option<Vec<u8>>, LarderError> {
        Ok(None)
    }

    async fn put(&self, _bytes: Vec<u8>) -> Result<(), LarderError> {
        Ok(())
    }
}

/// Open the redb cache at `path`, degrading to `NullCache` if it can't be opened.
pub async fn open_cache(path: PathBuf) -> Arc<dyn SnapshotCache> {
    let shown = path.display().to_string();
    let opened = tokio::task::spawn_blocking(move || RedbSnapshotStore::open(path))
        .await
        .map_err(join_error)
        .and_then(|r| r);

    match opened {
        Ok(store) => {
            tracing::debug!("Snapshot cache: {}", shown);
            Arc::new(StoreCache::new(Arc::new(store)))
        }
        Err(e) => {
            tracing::warn!(
                "Snapshot cache unavailable at {} ({}); every start will fetch",
                shown,
                e
            );
            Arc::new(NullCache)
        }
    }
}
