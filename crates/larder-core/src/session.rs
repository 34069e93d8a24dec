//! # Session Module
//!
//! An open snapshot: the decoded catalog plus the identity of the bytes it
//! was decoded from.
//!
//! A session is immutable once opened. Refreshing the catalog means opening
//! a new session from new bytes and swapping it in with `replace`, so a
//! reader holding a session never observes a half-applied snapshot.

use crate::catalog::{Catalog, CatalogStore};
use crate::formats::catalog_from_bytes;
use crate::query::{Query, QueryOutcome, QueryType};
use crate::resolver::ClosureResolver;
use crate::snapshot::{ChangeDetection, Fingerprint, Provenance};
use crate::{LarderError, RecipeDetail, RecipeId, RecipeRef};

/// Row counts of an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub recipes: usize,
    pub ingredients: usize,
    pub components: usize,
}

/// A decoded snapshot ready for queries.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    bytes: Vec<u8>,
    fingerprint: Fingerprint,
    provenance: Provenance,
}

impl Session {
    /// Decode `bytes` into a session.
    ///
    /// The bytes are kept so the session can be re-served verbatim.
    pub fn open(
        bytes: Vec<u8>,
        provenance: Provenance,
        detection: ChangeDetection,
    ) -> Result<Self, LarderError> {
        let catalog = catalog_from_bytes(&bytes)?;
        let fingerprint = Fingerprint::of(&bytes, detection);
        Ok(Self {
            catalog,
            bytes,
            fingerprint,
            provenance,
        })
    }

    /// Swap in `next`, returning the retired session.
    #[must_use = "the retired session should be dropped explicitly or inspected"]
    pub fn replace(&mut self, next: Session) -> Session {
        std::mem::replace(self, next)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The raw snapshot bytes this session was opened from.
    #[must_use]
    pub fn snapshot_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Row counts.
    pub fn stats(&self) -> Result<SessionStats, LarderError> {
        Ok(SessionStats {
            recipes: self.catalog.recipe_count()?,
            ingredients: self.catalog.ingredient_count()?,
            components: self.catalog.component_count()?,
        })
    }

    // =========================================================================
    // QUERY OPERATIONS
    // =========================================================================

    /// Closure ingredient names of `recipe`; `None` if absent.
    pub fn resolve_ingredients(&self, recipe: RecipeId) -> Result<Option<Vec<String>>, LarderError> {
        ClosureResolver::resolve_ingredients(&self.catalog, recipe)
    }

    /// Direct sub-recipes of `recipe`, name ordered.
    pub fn resolve_direct_subrecipes(&self, recipe: RecipeId) -> Result<Vec<RecipeRef>, LarderError> {
        ClosureResolver::resolve_direct_subrecipes(&self.catalog, recipe)
    }

    /// Recipes using an ingredient that matches `term` at any depth.
    pub fn search_by_ingredient(&self, term: &str) -> Result<Vec<RecipeRef>, LarderError> {
        ClosureResolver::search_by_ingredient(&self.catalog, term)
    }

    /// Detail view of `recipe`; `None` if absent.
    pub fn resolve_detail(&self, recipe: RecipeId) -> Result<Option<RecipeDetail>, LarderError> {
        ClosureResolver::resolve_detail(&self.catalog, recipe)
    }

    /// Execute a structured query.
    pub fn execute(&self, query: &Query) -> Result<QueryOutcome, LarderError> {
        match &query.query_type {
            QueryType::Recipe { id } => self.resolve_detail(*id).map(QueryOutcome::Recipe),
            QueryType::Ingredients { id } => {
                self.resolve_ingredients(*id).map(QueryOutcome::Ingredients)
            }
            QueryType::Subrecipes { id } => {
                self.resolve_direct_subrecipes(*id).map(QueryOutcome::Recipes)
            }
            QueryType::Search { term } => self.search_by_ingredient(term).map(QueryOutcome::Recipes),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
