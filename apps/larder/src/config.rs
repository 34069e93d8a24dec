//! # Configuration
//!
//! Layered settings: defaults, then an optional TOML file, then `LARDER_*`
//! environment variables. CLI flags are applied last by the caller.
//!
//! ```toml
//! source = "https://example.org/recipes.db"
//! cache_path = "larder-cache.redb"
//! change_detection = "content-hash"
//! revalidate = true
//!
//! [http]
//! host = "127.0.0.1"
//! port = 8080
//! cors_origins = "http://localhost:3000"
//! rate_limit = 100
//! ```

use larder_core::{ChangeDetection, LarderError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// URL or file path of the authoritative snapshot.
    pub source: Option<String>,
    /// redb file holding the last-known-good snapshot.
    pub cache_path: PathBuf,
    pub change_detection: ChangeDetection,
    /// Background revalidation after a cached load.
    pub revalidate: bool,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            cache_path: PathBuf::from("larder-cache.redb"),
            change_detection: ChangeDetection::default(),
            revalidate: true,
            http: HttpConfig::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated origins, `*` for any; localhost only when unset.
    pub cors_origins: Option<String>,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
            rate_limit: 100,
        }
    }
}

impl Config {
    /// Load defaults, the optional file at `path`, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, LarderError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, LarderError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            LarderError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(LarderError::InvalidInput(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            LarderError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, LarderError> {
        toml::from_str(text)
            .map_err(|e| LarderError::InvalidInput(format!("Invalid config: {}", e)))
    }

    /// Apply `LARDER_*` overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, LarderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup("LARDER_SOURCE").filter(|s| !s.trim().is_empty()) {
            self.source = Some(source.trim().to_string());
        }
        if let Some(path) = lookup("LARDER_CACHE_PATH").filter(|s| !s.trim().is_empty()) {
            self.cache_path = PathBuf::from(path.trim());
        }
        if let Some(policy) = lookup("LARDER_CHANGE_DETECTION") {
            self.change_detection = policy.parse().map_err(LarderError::InvalidInput)?;
        }
        if let Some(flag) = lookup("LARDER_REVALIDATE") {
            self.revalidate = parse_bool(&flag).ok_or_else(|| {
                LarderError::InvalidInput(format!("LARDER_REVALIDATE: not a boolean: '{}'", flag))
            })?;
        }
        if let Some(origins) = lookup("LARDER_CORS_ORIGINS") {
            self.http.cors_origins = Some(origins);
        }
        if let Some(limit) = lookup("LARDER_RATE_LIMIT") {
            self.http.rate_limit = limit.trim().parse().map_err(|_| {
                LarderError::InvalidInput(format!("LARDER_RATE_LIMIT: not a number: '{}'", limit))
            })?;
        }
        Ok(self)
    }

    /// The configured source, or an error telling the user how to set one.
    pub fn require_source(&self) -> Result<&str, LarderError> {
        self.source.as_deref().ok_or_else(|| {
            LarderError::InvalidInput(
                "No snapshot source configured (use --source or LARDER_SOURCE)".to_string(),
            )
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
