//! # Closure Resolver
//!
//! Transitive queries over the recipe component graph.
//!
//! - Downward closure: a recipe plus every recipe reachable through
//!   "contains sub-recipe" edges. Used to aggregate ingredients.
//! - Upward closure: a seed set plus every ancestor reachable by reversing
//!   those edges. Used so that searching for an ingredient also finds every
//!   recipe that embeds a matching recipe.
//!
//! Both closures are worklist fixpoints guarded by a visited set, so they
//! terminate on any input. The store only forbids direct self-loops; if a
//! snapshot does contain a longer cycle, its closure is the deduplicated set
//! of its members. Cycles are never reported as errors here.
//!
//! Name ordering is byte-wise (`str::cmp`), which is case-sensitive and
//! matches SQLite's default `BINARY` collation.

use crate::catalog::CatalogStore;
use crate::{LarderError, RecipeDetail, RecipeId, RecipeRef};
use std::collections::{BTreeSet, VecDeque};

/// Stateless resolver over any `CatalogStore`.
pub struct ClosureResolver;

impl ClosureResolver {
    // =========================================================================
    // CLOSURE PRIMITIVES
    // =========================================================================

    /// Downward closure of `root`, including `root` itself.
    ///
    /// The root is included even if it has no row; callers that need the row
    /// check for it first.
    pub fn closure<S: CatalogStore + ?Sized>(
        store: &S,
        root: RecipeId,
    ) -> Result<BTreeSet<RecipeId>, LarderError> {
        Self::fixpoint(std::iter::once(root), |id| store.child_recipes(id))
    }

    /// Upward closure of `seeds`: the seeds plus all of their ancestors.
    pub fn upward_closure<S, I>(store: &S, seeds: I) -> Result<BTreeSet<RecipeId>, LarderError>
    where
        S: CatalogStore + ?Sized,
        I: IntoIterator<Item = RecipeId>,
    {
        Self::fixpoint(seeds, |id| store.parent_recipes(id))
    }

    /// Breadth-first worklist. Each id is expanded at most once.
    fn fixpoint<I, F>(seeds: I, mut expand: F) -> Result<BTreeSet<RecipeId>, LarderError>
    where
        I: IntoIterator<Item = RecipeId>,
        F: FnMut(RecipeId) -> Result<Vec<RecipeId>, LarderError>,
    {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();

        for seed in seeds {
            if visited.insert(seed) {
                queue.push_back(seed);
            }
        }

        while let Some(current) = queue.pop_front() {
            for next in expand(current)? {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        Ok(visited)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// All ingredient names used by `recipe` directly or through nested
    /// sub-recipes, distinct and sorted.
    ///
    /// Returns `None` if the recipe does not exist.
    pub fn resolve_ingredients<S: CatalogStore + ?Sized>(
        store: &S,
        recipe: RecipeId,
    ) -> Result<Option<Vec<String>>, LarderError> {
        if store.recipe(recipe)?.is_none() {
            return Ok(None);
        }

        let closure = Self::closure(store, recipe)?;

        let mut ingredient_ids = BTreeSet::new();
        for member in &closure {
            ingredient_ids.extend(store.ingredients_of(*member)?);
        }

        let mut names = BTreeSet::new();
        for id in ingredient_ids {
            if let Some(ingredient) = store.ingredient(id)? {
                names.insert(ingredient.name);
            }
        }

        Ok(Some(names.into_iter().collect()))
    }

    /// Immediate children of `recipe`, sorted by name then id.
    ///
    /// Empty when the recipe has no components or does not exist.
    pub fn resolve_direct_subrecipes<S: CatalogStore + ?Sized>(
        store: &S,
        recipe: RecipeId,
    ) -> Result<Vec<RecipeRef>, LarderError> {
        let children = store.child_recipes(recipe)?;
        Self::refs_sorted(store, children)
    }

    /// Recipes that use an ingredient whose name contains `term`
    /// (case-insensitive), directly or through any chain of sub-recipes.
    ///
    /// `term` is matched as a literal substring. The empty string matches
    /// every ingredient; rejecting blank terms is the caller's job.
    pub fn search_by_ingredient<S: CatalogStore + ?Sized>(
        store: &S,
        term: &str,
    ) -> Result<Vec<RecipeRef>, LarderError> {
        let needle = term.to_lowercase();

        let mut direct = BTreeSet::new();
        for ingredient in store.ingredients()? {
            if ingredient.name.to_lowercase().contains(&needle) {
                direct.extend(store.recipes_using(ingredient.id)?);
            }
        }

        if direct.is_empty() {
            return Ok(Vec::new());
        }

        let matches = Self::upward_closure(store, direct)?;
        Self::refs_sorted(store, matches)
    }

    /// Detail view: the recipe row, its closure ingredients, and its direct
    /// sub-recipes. `None` if the recipe does not exist.
    pub fn resolve_detail<S: CatalogStore + ?Sized>(
        store: &S,
        recipe: RecipeId,
    ) -> Result<Option<RecipeDetail>, LarderError> {
        let Some(row) = store.recipe(recipe)? else {
            return Ok(None);
        };
        let ingredients = Self::resolve_ingredients(store, recipe)?.unwrap_or_default();
        let subrecipes = Self::resolve_direct_subrecipes(store, recipe)?;

        Ok(Some(RecipeDetail {
            recipe: row,
            ingredients,
            subrecipes,
        }))
    }

    /// Resolve ids to `{id, name}` pairs, skipping ids without a row.
    fn refs_sorted<S, I>(store: &S, ids: I) -> Result<Vec<RecipeRef>, LarderError>
    where
        S: CatalogStore + ?Sized,
        I: IntoIterator<Item = RecipeId>,
    {
        let mut refs = BTreeSet::new();
        for id in ids {
            if let Some(recipe) = store.recipe(id)? {
                refs.insert(RecipeRef::from(&recipe));
            }
        }
        Ok(refs.into_iter().collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================
