//! # larder-core
//!
//! The deterministic recipe catalog engine for Larder - THE LOGIC.
//!
//! A catalog holds recipes, ingredients, recipe -> ingredient links and
//! parent -> child recipe components. Recipes nest to arbitrary depth; the
//! resolver answers transitive questions over that graph:
//! - which ingredients a recipe needs, including through its sub-recipes
//! - which recipes need a given ingredient, at any depth
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - `BTreeMap`/`BTreeSet` only, so every answer and every encoded snapshot
//!   is deterministic
//! - Closure resolution terminates on any input, including cyclic data
//! - Snapshots are opened whole; nothing mutates an open `Session`

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod editor;
pub mod formats;
pub mod primitives;
pub mod query;
pub mod resolver;
pub mod session;
pub mod snapshot;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Ingredient, IngredientId, LarderError, Recipe, RecipeDetail, RecipeId, RecipeRef};

// =============================================================================
// RE-EXPORTS: Catalog Engine
// =============================================================================

pub use catalog::{Catalog, CatalogStore, SerializableCatalog};
pub use editor::{CatalogEditor, LinkRow};
pub use query::{Query, QueryOutcome, QueryType};
pub use resolver::ClosureResolver;
pub use session::{Session, SessionStats};
pub use snapshot::{ChangeDetection, Fingerprint, Provenance};
pub use storage::{MemorySnapshotStore, RedbSnapshotStore, SnapshotStore};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{SnapshotHeader, catalog_from_bytes, catalog_to_bytes};
