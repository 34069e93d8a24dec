//! # Catalog Editor
//!
//! Validation and write protocol for building a catalog.
//!
//! - Validate names before the store sees them
//! - Reject self-referential, duplicate, and cycle-closing component links
//! - Export the finished catalog as snapshot bytes
//!
//! The catalog's own constraints (`Catalog::insert_*`) remain the final
//! backstop; the editor rejects earlier and with clearer messages.

use crate::catalog::{Catalog, CatalogStore};
use crate::formats::catalog_to_bytes;
use crate::primitives::MAX_NAME_LENGTH;
use crate::resolver::ClosureResolver;
use crate::{IngredientId, LarderError, RecipeId};

/// A name-resolved (left, right) link row for admin listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub from: String,
    pub to: String,
}

/// The CatalogEditor handles validation and catalog writes.
pub struct CatalogEditor;

impl CatalogEditor {
    /// Create an empty catalog (schema only, no rows).
    #[must_use]
    pub fn create_empty() -> Catalog {
        Catalog::new()
    }

    /// Trim and validate a display name.
    ///
    /// A name is valid if it is non-empty after trimming and within
    /// `MAX_NAME_LENGTH` bytes.
    pub fn validate_name(raw: &str) -> Result<&str, LarderError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(LarderError::InvalidInput("name must not be empty".into()));
        }
        if name.len() > MAX_NAME_LENGTH {
            return Err(LarderError::InvalidInput(format!(
                "name is {} bytes, maximum is {}",
                name.len(),
                MAX_NAME_LENGTH
            )));
        }
        Ok(name)
    }

    /// Add a recipe row.
    pub fn add_recipe(catalog: &mut Catalog, name: &str) -> Result<RecipeId, LarderError> {
        let name = Self::validate_name(name)?;
        catalog.insert_recipe(name)
    }

    /// Add an ingredient row.
    pub fn add_ingredient(catalog: &mut Catalog, name: &str) -> Result<IngredientId, LarderError> {
        let name = Self::validate_name(name)?;
        catalog.insert_ingredient(name)
    }

    /// Link an ingredient to a recipe.
    pub fn link_ingredient(
        catalog: &mut Catalog,
        recipe: RecipeId,
        ingredient: IngredientId,
    ) -> Result<(), LarderError> {
        if !catalog.contains_recipe(recipe) {
            return Err(LarderError::RecipeNotFound(recipe));
        }
        if !catalog.contains_ingredient(ingredient) {
            return Err(LarderError::IngredientNotFound(ingredient));
        }
        if catalog.has_recipe_ingredient(recipe, ingredient) {
            return Err(LarderError::StructuralViolation(format!(
                "ingredient {} is already linked to recipe {}",
                ingredient, recipe
            )));
        }
        catalog.insert_recipe_ingredient(recipe, ingredient)?;
        Ok(())
    }

    /// Link `child` as a sub-recipe of `parent`.
    ///
    /// Rejected when `parent == child`, when the link already exists, or when
    /// `parent` is already reachable from `child` (the link would close a
    /// cycle).
    pub fn link_subrecipe(
        catalog: &mut Catalog,
        parent: RecipeId,
        child: RecipeId,
    ) -> Result<(), LarderError> {
        if parent == child {
            return Err(LarderError::StructuralViolation(
                "a recipe cannot be its own sub-recipe".into(),
            ));
        }
        if !catalog.contains_recipe(parent) {
            return Err(LarderError::RecipeNotFound(parent));
        }
        if !catalog.contains_recipe(child) {
            return Err(LarderError::RecipeNotFound(child));
        }
        if catalog.has_component(parent, child) {
            return Err(LarderError::StructuralViolation(format!(
                "recipe {} is already a sub-recipe of {}",
                child, parent
            )));
        }
        if ClosureResolver::closure(catalog, child)?.contains(&parent) {
            return Err(LarderError::StructuralViolation(format!(
                "linking {} under {} would create a cycle",
                child, parent
            )));
        }
        catalog.insert_component(parent, child)?;
        Ok(())
    }

    /// Export the catalog as snapshot bytes.
    pub fn export(catalog: &Catalog) -> Result<Vec<u8>, LarderError> {
        catalog_to_bytes(catalog)
    }

    // =========================================================================
    // LISTINGS
    // =========================================================================

    /// Recipe -> ingredient links by name, sorted by (recipe, ingredient).
    pub fn ingredient_links(catalog: &Catalog) -> Result<Vec<LinkRow>, LarderError> {
        let mut rows = Vec::new();
        for (recipe, ingredient) in catalog.recipe_ingredient_pairs() {
            let (Some(r), Some(i)) = (catalog.recipe(recipe)?, catalog.ingredient(ingredient)?)
            else {
                continue;
            };
            rows.push(LinkRow {
                from: r.name,
                to: i.name,
            });
        }
        rows.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| a.to.cmp(&b.to)));
        Ok(rows)
    }

    /// Parent -> child component links by name, sorted by (parent, child).
    pub fn component_links(catalog: &Catalog) -> Result<Vec<LinkRow>, LarderError> {
        let mut rows = Vec::new();
        for (parent, child) in catalog.component_pairs() {
            let (Some(p), Some(c)) = (catalog.recipe(parent)?, catalog.recipe(child)?) else {
                continue;
            };
            rows.push(LinkRow {
                from: p.name,
                to: c.name,
            });
        }
        rows.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| a.to.cmp(&b.to)));
        Ok(rows)
    }
}

// =============================================================================
// TESTS
// =============================================================================
