//! # Cache Synchronizer
//!
//! Serve from the locally persisted snapshot when one exists, fetch the
//! authoritative copy only when it doesn't, and check once in the background
//! whether the authoritative copy has moved on.
//!
//! ```text
//! load()        cache hit  -> FromCache (no fetch)
//!               cache miss -> fetch -> persist -> FromRemote
//! revalidate()  fetch -> compare fingerprints -> persist if changed
//! ```
//!
//! Only the first-ever load blocks on the network. Every later failure of the
//! source or of the cache is logged and absorbed.
//!
//! Fetched bytes are decoded before they are persisted, so an unreadable
//! payload never displaces the last-known-good snapshot.

mod cache;
mod source;

pub use cache::{NullCache, StoreCache, open_cache};
pub use source::{FileSource, HttpSource, source_from_location};

use async_trait::async_trait;
use larder_core::{ChangeDetection, Fingerprint, LarderError, Provenance, catalog_from_bytes};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// SEAMS
// =============================================================================

/// Where the authoritative snapshot comes from.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the full snapshot, bypassing intermediary caches.
    async fn fetch(&self) -> Result<Vec<u8>, LarderError>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

/// Where the last-known-good snapshot is persisted.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    async fn get(&self) -> Result<Option<Vec<u8>>, LarderError>;

    async fn put(&self, bytes: Vec<u8>) -> Result<(), LarderError>;
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Snapshot bytes and where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub bytes: Vec<u8>,
    pub provenance: Provenance,
}

/// Result of a revalidation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revalidation {
    Unchanged,
    Replaced {
        bytes: Vec<u8>,
        fingerprint: Fingerprint,
    },
}

// =============================================================================
// SYNCHRONIZER
// =============================================================================

pub struct CacheSynchronizer {
    source: Arc<dyn SnapshotSource>,
    cache: Arc<dyn SnapshotCache>,
    detection: ChangeDetection,
    revalidated: AtomicBool,
}

impl std::fmt::Debug for CacheSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSynchronizer")
            .field("source", &self.source.location())
            .field("detection", &self.detection)
            .finish_non_exhaustive()
    }
}

impl CacheSynchronizer {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        cache: Arc<dyn SnapshotCache>,
        detection: ChangeDetection,
    ) -> Self {
        Self {
            source,
            cache,
            detection,
            revalidated: AtomicBool::new(false),
        }
    }

    /// The change detection policy used by `revalidate`.
    pub fn detection(&self) -> ChangeDetection {
        self.detection
    }

    /// Produce snapshot bytes, preferring the persisted copy.
    ///
    /// On a cache miss, a failed fetch or an unreadable payload is an error.
    pub async fn load(&self) -> Result<Loaded, LarderError> {
        match self.cache.get().await {
            Ok(Some(bytes)) => {
                tracing::info!(bytes = bytes.len(), "Loaded snapshot from cache");
                return Ok(Loaded {
                    bytes,
                    provenance: Provenance::FromCache,
                });
            }
            Ok(None) => {
                tracing::info!("No cached snapshot, fetching from {}", self.source.location());
            }
            Err(e) => {
                tracing::warn!("Cache read failed, fetching instead: {}", e);
            }
        }

        self.force_remote().await
    }

    /// Fetch and persist, ignoring the cache.
    ///
    /// A payload that does not decode is an error and is not persisted.
    pub async fn force_remote(&self) -> Result<Loaded, LarderError> {
        let bytes = self.source.fetch().await?;
        tracing::info!(bytes = bytes.len(), "Fetched snapshot from {}", self.source.location());
        catalog_from_bytes(&bytes)?;
        self.persist(&bytes).await;
        Ok(Loaded {
            bytes,
            provenance: Provenance::FromRemote,
        })
    }

    /// Compare the authoritative snapshot against `current`.
    ///
    /// Runs at most once per synchronizer; later calls report `Unchanged`
    /// without fetching. Never fails: fetch errors and undecodable payloads
    /// are logged and reported as `Unchanged`.
    pub async fn revalidate(&self, current: &Fingerprint) -> Revalidation {
        if self.revalidated.swap(true, Ordering::SeqCst) {
            tracing::debug!("Revalidation already ran, skipping");
            return Revalidation::Unchanged;
        }

        let bytes = match self.source.fetch().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Revalidation fetch failed, keeping current snapshot: {}", e);
                return Revalidation::Unchanged;
            }
        };

        let fingerprint = Fingerprint::of(&bytes, self.detection);
        if fingerprint.same_snapshot(current) {
            tracing::debug!(policy = %self.detection, "Snapshot unchanged ({})", fingerprint);
            return Revalidation::Unchanged;
        }

        if let Err(e) = catalog_from_bytes(&bytes) {
            tracing::warn!("Fetched snapshot is unreadable, keeping current one: {}", e);
            return Revalidation::Unchanged;
        }

        tracing::info!("Snapshot changed: {} -> {}", current, fingerprint);
        self.persist(&bytes).await;
        Revalidation::Replaced { bytes, fingerprint }
    }

    async fn persist(&self, bytes: &[u8]) {
        if let Err(e) = self.cache.put(bytes.to_vec()).await {
            tracing::warn!("Failed to persist snapshot: {}", e);
        }
    }
}
