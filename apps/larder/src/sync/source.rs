//! Snapshot sources: an HTTP URL or a local file.

use super::SnapshotSource;
use async_trait::async_trait;
use larder_core::LarderError;
use larder_core::primitives::MAX_SNAPSHOT_SIZE;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::path::PathBuf;
use std::sync::Arc;

/// Fetches the snapshot over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    url: String,
    max_bytes: usize,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            max_bytes: MAX_SNAPSHOT_SIZE,
        }
    }

    /// Lower the body size cap (default `MAX_SNAPSHOT_SIZE`).
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn too_large(&self) -> LarderError {
        LarderError::SourceUnavailable(format!(
            "{} exceeds maximum snapshot size {} bytes",
            self.url, self.max_bytes
        ))
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>, LarderError> {
        let mut resp = self
            .http
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| LarderError::SourceUnavailable(format!("{}: {}", self.url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LarderError::SourceUnavailable(format!(
                "{} returned {}",
                self.url, status
            )));
        }
        if resp
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(self.too_large());
        }

        // Content-Length is absent on chunked responses; cap the running total.
        let mut body = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| LarderError::SourceUnavailable(format!("{}: {}", self.url, e)))?
        {
            if body.len().saturating_add(chunk.len()) > self.max_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Reads the snapshot from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>, LarderError> {
        let unavailable =
            |e: std::io::Error| LarderError::SourceUnavailable(format!("{}: {}", self.path.display(), e));

        let metadata = tokio::fs::metadata(&self.path).await.map_err(unavailable)?;
        if metadata.len() > MAX_SNAPSHOT_SIZE as u64 {
            return Err(LarderError::SourceUnavailable(format!(
                "{} exceeds maximum snapshot size {} bytes",
                self.path.display(),
                MAX_SNAPSHOT_SIZE
            )));
        }
        tokio::fs::read(&self.path).await.map_err(unavailable)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// `http://` and `https://` locations fetch over the network; anything else
/// (optionally `file://`-prefixed) is a local path.
pub fn source_from_location(location: &str) -> Arc<dyn SnapshotSource> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpSource::new(location))
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        Arc::new(FileSource::new(path))
    }
}
