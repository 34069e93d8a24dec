//! # Snapshot Identity
//!
//! How two snapshot byte images are compared during revalidation, and where
//! the currently open one came from.
//!
//! `ChangeDetection::ByteLength` treats equal lengths as "unchanged". It is
//! cheap but unsound: an edit that keeps the length (renaming "Ham" to "Yam")
//! goes unnoticed. `ChangeDetection::ContentHash` also compares a digest of
//! the bytes and is the default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy used to decide whether a fetched snapshot differs from the open one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeDetection {
    /// Compare byte lengths only.
    ByteLength,
    /// Compare byte lengths and content digests.
    #[default]
    ContentHash,
}

impl fmt::Display for ChangeDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteLength => write!(f, "byte-length"),
            Self::ContentHash => write!(f, "content-hash"),
        }
    }
}

impl FromStr for ChangeDetection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "byte-length" | "length" => Ok(Self::ByteLength),
            "content-hash" | "hash" => Ok(Self::ContentHash),
            other => Err(format!(
                "unknown change detection '{}' (expected byte-length or content-hash)",
                other
            )),
        }
    }
}

/// Where the bytes behind the open session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Read from the local snapshot store.
    FromCache,
    /// Fetched from the authoritative source.
    FromRemote,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FromCache => write!(f, "cache"),
            Self::FromRemote => write!(f, "remote"),
        }
    }
}

/// Comparable identity of a snapshot byte image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub byte_len: u64,
    /// Hex digest; present only under `ChangeDetection::ContentHash`.
    pub digest: Option<String>,
}

impl Fingerprint {
    /// Fingerprint `bytes` under `policy`.
    #[must_use]
    pub fn of(bytes: &[u8], policy: ChangeDetection) -> Self {
        let digest = match policy {
            ChangeDetection::ByteLength => None,
            ChangeDetection::ContentHash => Some(content_digest(bytes)),
        };
        Self {
            byte_len: bytes.len() as u64,
            digest,
        }
    }

    /// Whether two fingerprints describe the same snapshot.
    ///
    /// Digests are compared only when both sides carry one, so a
    /// length-only fingerprint never claims more than it knows.
    #[must_use]
    pub fn same_snapshot(&self, other: &Self) -> bool {
        if self.byte_len != other.byte_len {
            return false;
        }
        match (&self.digest, &other.digest) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.digest {
            Some(digest) => write!(f, "{} bytes, {}", self.byte_len, digest),
            None => write!(f, "{} bytes", self.byte_len),
        }
    }
}

/// BLAKE3 hex digest of the snapshot bytes.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn content_digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// SipHash digest of the snapshot bytes (used without `crypto-hash`).
///
/// Good enough to notice an edited snapshot; not collision resistant.
#[cfg(not(feature = "crypto-hash"))]
#[must_use]
pub fn content_digest(bytes: &[u8]) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

// =============================================================================
// TESTS
// =============================================================================
