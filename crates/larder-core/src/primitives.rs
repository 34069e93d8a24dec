//! # Primitives
//!
//! Hardcoded runtime constants for the Larder core.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Magic bytes for the Larder snapshot header.
///
/// - Snapshot = Magic Bytes ("LRDR") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"LRDR";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the snapshot header in bytes (magic + version).
pub const HEADER_LEN: usize = 5;

/// Logical key under which the last-known-good snapshot is persisted.
pub const SNAPSHOT_KEY: &str = "recipes.db";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for recipe and ingredient names, in bytes.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum length for an ingredient search term, in bytes.
///
/// Enforced at the CLI/API boundary. The resolver itself accepts any string.
pub const MAX_SEARCH_TERM_LENGTH: usize = 256;

/// Maximum accepted snapshot size.
///
/// Checked BEFORE decoding so a corrupt or hostile payload cannot force a
/// large allocation.
pub const MAX_SNAPSHOT_SIZE: usize = 256 * 1024 * 1024; // 256 MB
