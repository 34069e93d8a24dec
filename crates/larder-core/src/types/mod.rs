//! # Core Type Definitions
//!
//! This module contains all core types for the Larder recipe catalog:
//! - Row identifiers (`RecipeId`, `IngredientId`)
//! - Rows (`Recipe`, `Ingredient`) and projections (`RecipeRef`, `RecipeDetail`)
//! - Error types (`LarderError`)
//!
//! ## Ordering Guarantees
//!
//! All identifiers implement `Ord` so they can key `BTreeMap`/`BTreeSet`.
//! `RecipeRef` orders by name first, then by id, which is the presentation
//! order for every recipe listing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

// =============================================================================
// ROW IDENTIFIERS
// =============================================================================

/// Identity of a recipe row. Assigned by the store, stable for the row's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u64);

/// Identity of an ingredient row. Assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IngredientId(pub u64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ROWS
// =============================================================================

/// A recipe row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
}

impl Recipe {
    #[must_use]
    pub fn new(id: RecipeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An ingredient row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
}

impl Ingredient {
    #[must_use]
    pub fn new(id: IngredientId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// =============================================================================
// PROJECTIONS
// =============================================================================

/// `{id, name}` pair returned by sub-recipe listings and searches.
///
/// Ordered by name (byte-wise), ties broken by ascending id. Names are unique
/// in a well-formed catalog, so the tie-break only matters for malformed data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeRef {
    pub id: RecipeId,
    pub name: String,
}

impl RecipeRef {
    #[must_use]
    pub fn new(id: RecipeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl From<&Recipe> for RecipeRef {
    fn from(recipe: &Recipe) -> Self {
        Self::new(recipe.id, recipe.name.clone())
    }
}

impl Ord for RecipeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for RecipeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Everything the detail view shows for one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    /// Distinct ingredient names across the recipe's closure, sorted.
    pub ingredients: Vec<String>,
    /// Immediate children only, sorted by name.
    pub subrecipes: Vec<RecipeRef>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Larder system.
///
/// - No silent failures
/// - Use `Result<T, LarderError>` for fallible operations
/// - Nothing in the core panics; the worst outcome is staying on the last
///   good snapshot
#[derive(Debug, Error)]
pub enum LarderError {
    /// A referenced recipe row does not exist.
    #[error("Recipe not found: {0}")]
    RecipeNotFound(RecipeId),

    /// A referenced ingredient row does not exist.
    #[error("Ingredient not found: {0}")]
    IngredientNotFound(IngredientId),

    /// A link would break the catalog's structure (self-loop, duplicate, cycle).
    #[error("Structural violation: {0}")]
    StructuralViolation(String),

    /// A recipe or ingredient with this name already exists.
    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// Input rejected at the boundary (empty name, oversized term).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The authoritative snapshot could not be fetched.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// The local snapshot store could not be read or written.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// A snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl LarderError {
    /// Returns `true` for the not-found family.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecipeNotFound(_) | Self::IngredientNotFound(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================
