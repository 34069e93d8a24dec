//! # Bootstrap
//!
//! Startup sequencing: build the synchronizer from config, open the first
//! session before anything is served, then optionally revalidate once in the
//! background and swap the session if the snapshot changed.

use crate::config::Config;
use crate::sync::{CacheSynchronizer, Revalidation, open_cache, source_from_location};
use larder_core::{LarderError, Provenance, Session};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// The session shared between query handlers and the revalidation task.
pub type SharedSession = Arc<RwLock<Session>>;

/// Build a synchronizer for the configured source and cache.
pub async fn synchronizer(config: &Config) -> Result<Arc<CacheSynchronizer>, LarderError> {
    let source = source_from_location(config.require_source()?);
    let cache = open_cache(config.cache_path.clone()).await;
    Ok(Arc::new(CacheSynchronizer::new(
        source,
        cache,
        config.change_detection,
    )))
}

/// Load and decode the first session.
///
/// A cached snapshot that fails to decode is discarded in favour of a fresh
/// fetch; a fetched snapshot that fails to decode is an error.
pub async fn open_session(sync: &CacheSynchronizer) -> Result<Session, LarderError> {
    let loaded = sync.load().await?;
    let provenance = loaded.provenance;

    match Session::open(loaded.bytes, provenance, sync.detection()) {
        Ok(session) => Ok(session),
        Err(e) if provenance == Provenance::FromCache => {
            tracing::warn!("Cached snapshot is unreadable ({}), refetching", e);
            let fresh = sync.force_remote().await?;
            Session::open(fresh.bytes, fresh.provenance, sync.detection())
        }
        Err(e) => Err(e),
    }
}

/// Whether a background revalidation should follow this session's load.
pub fn should_revalidate(config: &Config, offline: bool, session: &Session) -> bool {
    config.revalidate && !offline && session.provenance() == Provenance::FromCache
}

/// Revalidate once and, if the snapshot changed, swap it in.
///
/// The replacement is decoded before the write lock is taken, so readers are
/// blocked only for the swap itself. Returns whether a swap happened.
pub async fn refresh(sync: &CacheSynchronizer, shared: &RwLock<Session>) -> Result<bool, LarderError> {
    let current = shared.read().await.fingerprint().clone();

    let Revalidation::Replaced { bytes, fingerprint } = sync.revalidate(&current).await else {
        return Ok(false);
    };

    let next = Session::open(bytes, Provenance::FromRemote, sync.detection())?;
    let retired = shared.write().await.replace(next);
    tracing::info!(
        "Catalog refreshed: {} -> {}",
        retired.fingerprint(),
        fingerprint
    );
    Ok(true)
}

/// Run `refresh` on a background task. Failures are logged, never surfaced.
pub fn spawn_revalidation(sync: Arc<CacheSynchronizer>, shared: SharedSession) -> JoinHandle<bool> {
    tokio::spawn(async move {
        match refresh(&sync, &shared).await {
            Ok(replaced) => replaced,
            Err(e) => {
                tracing::warn!("Revalidated snapshot could not be opened: {}", e);
                false
            }
        }
    })
}

// =============================================================================
// TESTS
// =============================================================================
