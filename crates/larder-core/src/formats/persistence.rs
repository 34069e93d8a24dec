//! # Snapshot Format
//!
//! Binary serialization for Larder catalogs.
//!
//! Format: Header (5 bytes) + postcard-serialized catalog data.
//! - 4 bytes: Magic ("LRDR")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded, so a
//! truncated or hostile download fails fast without large allocations.

use crate::catalog::{Catalog, SerializableCatalog};
use crate::primitives::{self, HEADER_LEN, MAX_SNAPSHOT_SIZE};
use crate::LarderError;

// =============================================================================
// SNAPSHOT HEADER
// =============================================================================

/// The header precedes all catalog data.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), LarderError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(LarderError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(LarderError::SerializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LarderError> {
        if bytes.len() < HEADER_LEN {
            return Err(LarderError::SerializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a catalog to snapshot bytes (header + payload).
///
/// This is a pure transformation - no file I/O.
pub fn catalog_to_bytes(catalog: &Catalog) -> Result<Vec<u8>, LarderError> {
    let header = SnapshotHeader::new();
    let serializable = SerializableCatalog::from(catalog);

    let payload = postcard::to_stdvec(&serializable)
        .map_err(|e| LarderError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_LEN + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a catalog from snapshot bytes.
///
/// This is a pure transformation - no file I/O.
pub fn catalog_from_bytes(bytes: &[u8]) -> Result<Catalog, LarderError> {
    if bytes.len() < HEADER_LEN {
        return Err(LarderError::SerializationError(format!(
            "Snapshot too short: minimum {} bytes required",
            HEADER_LEN
        )));
    }

    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(LarderError::SerializationError(format!(
            "Snapshot size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[HEADER_LEN..];
    let serializable: SerializableCatalog = postcard::from_bytes(payload).map_err(|e| {
        LarderError::SerializationError(format!("Failed to decode catalog data: {}", e))
    })?;

    Ok(Catalog::from(serializable))
}

// =============================================================================
// TESTS
// =============================================================================
