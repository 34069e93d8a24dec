//! # Catalog Store
//!
//! The relational store for Larder: recipes, ingredients, and the two edge
//! relations between them.
//!
//! `CatalogStore` is the read capability the resolver depends on. `Catalog`
//! is the in-memory implementation opened from a snapshot; it also enforces
//! the store-level constraints (unique names, unique pairs, no component
//! self-loop) that act as the final backstop behind `CatalogEditor`.
//!
//! All data structures use `BTreeMap` for deterministic ordering.

use crate::{Ingredient, IngredientId, LarderError, Recipe, RecipeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// CATALOGSTORE TRAIT
// =============================================================================

/// Read-only relational view over the catalog.
///
/// Every list this trait returns is in ascending id order. Fallible so that a
/// disk-backed or remote implementation can sit behind the same resolver.
pub trait CatalogStore {
    /// Lookup a recipe row.
    fn recipe(&self, id: RecipeId) -> Result<Option<Recipe>, LarderError>;

    /// Lookup an ingredient row.
    fn ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, LarderError>;

    /// All ingredient rows.
    fn ingredients(&self) -> Result<Vec<Ingredient>, LarderError>;

    /// Ingredients linked directly to a recipe.
    fn ingredients_of(&self, recipe: RecipeId) -> Result<Vec<IngredientId>, LarderError>;

    /// Recipes linked directly to an ingredient.
    fn recipes_using(&self, ingredient: IngredientId) -> Result<Vec<RecipeId>, LarderError>;

    /// Children of a recipe (parent -> child component edges).
    fn child_recipes(&self, parent: RecipeId) -> Result<Vec<RecipeId>, LarderError>;

    /// Parents of a recipe (reverse component edges).
    fn parent_recipes(&self, child: RecipeId) -> Result<Vec<RecipeId>, LarderError>;

    /// Number of recipe rows.
    fn recipe_count(&self) -> Result<usize, LarderError>;

    /// Number of ingredient rows.
    fn ingredient_count(&self) -> Result<usize, LarderError>;

    /// Number of component edges.
    fn component_count(&self) -> Result<usize, LarderError>;
}

// =============================================================================
// CATALOG IMPLEMENTATION
// =============================================================================

/// The in-memory catalog.
///
/// Component edges are indexed both ways so that downward and upward closures
/// are each a plain adjacency walk.
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: BTreeMap<RecipeId, Recipe>,
    ingredients: BTreeMap<IngredientId, Ingredient>,

    /// Name indexes. Inserts keep names unique; a decoded snapshot may not.
    recipe_names: BTreeMap<String, BTreeSet<RecipeId>>,
    ingredient_names: BTreeMap<String, BTreeSet<IngredientId>>,

    /// recipe -> ingredients, and the reverse.
    recipe_ingredients: BTreeMap<RecipeId, BTreeSet<IngredientId>>,
    ingredient_recipes: BTreeMap<IngredientId, BTreeSet<RecipeId>>,

    /// parent -> children, and child -> parents.
    children: BTreeMap<RecipeId, BTreeSet<RecipeId>>,
    parents: BTreeMap<RecipeId, BTreeSet<RecipeId>>,

    next_recipe_id: u64,
    next_ingredient_id: u64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            recipes: BTreeMap::new(),
            ingredients: BTreeMap::new(),
            recipe_names: BTreeMap::new(),
            ingredient_names: BTreeMap::new(),
            recipe_ingredients: BTreeMap::new(),
            ingredient_recipes: BTreeMap::new(),
            children: BTreeMap::new(),
            parents: BTreeMap::new(),
            // Row ids start at 1, like an integer primary key.
            next_recipe_id: 1,
            next_ingredient_id: 1,
        }
    }
}

impl Catalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a recipe row and return its id.
    ///
    /// The name is stored as given; trimming and length checks belong to the
    /// editor. Only uniqueness is enforced here.
    pub fn insert_recipe(&mut self, name: &str) -> Result<RecipeId, LarderError> {
        if self.recipe_names.contains_key(name) {
            return Err(LarderError::DuplicateName(name.to_string()));
        }
        let id = RecipeId(self.next_recipe_id);
        self.next_recipe_id = self.next_recipe_id.saturating_add(1);
        self.index_recipe(Recipe::new(id, name));
        Ok(id)
    }

    /// Insert an ingredient row and return its id.
    pub fn insert_ingredient(&mut self, name: &str) -> Result<IngredientId, LarderError> {
        if self.ingredient_names.contains_key(name) {
            return Err(LarderError::DuplicateName(name.to_string()));
        }
        let id = IngredientId(self.next_ingredient_id);
        self.next_ingredient_id = self.next_ingredient_id.saturating_add(1);
        self.index_ingredient(Ingredient::new(id, name));
        Ok(id)
    }

    fn index_recipe(&mut self, recipe: Recipe) {
        self.recipe_names
            .entry(recipe.name.clone())
            .or_default()
            .insert(recipe.id);
        self.recipes.insert(recipe.id, recipe);
    }

    fn index_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredient_names
            .entry(ingredient.name.clone())
            .or_default()
            .insert(ingredient.id);
        self.ingredients.insert(ingredient.id, ingredient);
    }

    /// Link an ingredient to a recipe.
    ///
    /// Returns `false` if the pair already existed (the insert is ignored).
    pub fn insert_recipe_ingredient(
        &mut self,
        recipe: RecipeId,
        ingredient: IngredientId,
    ) -> Result<bool, LarderError> {
        if !self.recipes.contains_key(&recipe) {
            return Err(LarderError::RecipeNotFound(recipe));
        }
        if !self.ingredients.contains_key(&ingredient) {
            return Err(LarderError::IngredientNotFound(ingredient));
        }
        Ok(self.link_ingredient_unchecked(recipe, ingredient))
    }

    fn link_ingredient_unchecked(&mut self, recipe: RecipeId, ingredient: IngredientId) -> bool {
        self.ingredient_recipes
            .entry(ingredient)
            .or_default()
            .insert(recipe);
        self.recipe_ingredients
            .entry(recipe)
            .or_default()
            .insert(ingredient)
    }

    /// Link a child recipe as a component of a parent.
    ///
    /// Rejects `parent == child`. Longer cycles are not checked here.
    /// Returns `false` if the pair already existed.
    pub fn insert_component(
        &mut self,
        parent: RecipeId,
        child: RecipeId,
    ) -> Result<bool, LarderError> {
        if parent == child {
            return Err(LarderError::StructuralViolation(format!(
                "recipe {} cannot be a component of itself",
                parent
            )));
        }
        if !self.recipes.contains_key(&parent) {
            return Err(LarderError::RecipeNotFound(parent));
        }
        if !self.recipes.contains_key(&child) {
            return Err(LarderError::RecipeNotFound(child));
        }
        Ok(self.link_component_unchecked(parent, child))
    }

    fn link_component_unchecked(&mut self, parent: RecipeId, child: RecipeId) -> bool {
        self.parents.entry(child).or_default().insert(parent);
        self.children.entry(parent).or_default().insert(child)
    }

    /// Check whether a recipe row exists.
    #[must_use]
    pub fn contains_recipe(&self, id: RecipeId) -> bool {
        self.recipes.contains_key(&id)
    }

    /// Check whether an ingredient row exists.
    #[must_use]
    pub fn contains_ingredient(&self, id: IngredientId) -> bool {
        self.ingredients.contains_key(&id)
    }

    /// Check whether a recipe is directly linked to an ingredient.
    #[must_use]
    pub fn has_recipe_ingredient(&self, recipe: RecipeId, ingredient: IngredientId) -> bool {
        self.recipe_ingredients
            .get(&recipe)
            .is_some_and(|set| set.contains(&ingredient))
    }

    /// Check whether a component edge exists.
    #[must_use]
    pub fn has_component(&self, parent: RecipeId, child: RecipeId) -> bool {
        self.children
            .get(&parent)
            .is_some_and(|set| set.contains(&child))
    }

    /// Lookup a recipe id by exact name; the lowest id if the name repeats.
    #[must_use]
    pub fn recipe_by_name(&self, name: &str) -> Option<RecipeId> {
        self.recipe_names
            .get(name)
            .and_then(|ids| ids.first())
            .copied()
    }

    /// All recipe rows in id order.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// All (recipe, ingredient) pairs in deterministic order.
    pub fn recipe_ingredient_pairs(
        &self,
    ) -> impl Iterator<Item = (RecipeId, IngredientId)> + '_ {
        self.recipe_ingredients
            .iter()
            .flat_map(|(recipe, set)| set.iter().map(move |ingredient| (*recipe, *ingredient)))
    }

    /// All (parent, child) component pairs in deterministic order.
    pub fn component_pairs(&self) -> impl Iterator<Item = (RecipeId, RecipeId)> + '_ {
        self.children
            .iter()
            .flat_map(|(parent, set)| set.iter().map(move |child| (*parent, *child)))
    }

    fn children_internal(&self, parent: RecipeId) -> impl Iterator<Item = RecipeId> + '_ {
        self.children.get(&parent).into_iter().flatten().copied()
    }

    fn parents_internal(&self, child: RecipeId) -> impl Iterator<Item = RecipeId> + '_ {
        self.parents.get(&child).into_iter().flatten().copied()
    }
}

impl CatalogStore for Catalog {
    fn recipe(&self, id: RecipeId) -> Result<Option<Recipe>, LarderError> {
        Ok(self.recipes.get(&id).cloned())
    }

    fn ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, LarderError> {
        Ok(self.ingredients.get(&id).cloned())
    }

    fn ingredients(&self) -> Result<Vec<Ingredient>, LarderError> {
        Ok(self.ingredients.values().cloned().collect())
    }

    fn ingredients_of(&self, recipe: RecipeId) -> Result<Vec<IngredientId>, LarderError> {
        Ok(self
            .recipe_ingredients
            .get(&recipe)
            .into_iter()
            .flatten()
            .copied()
            .collect())
    }

    fn recipes_using(&self, ingredient: IngredientId) -> Result<Vec<RecipeId>, LarderError> {
        Ok(self
            .ingredient_recipes
            .get(&ingredient)
            .into_iter()
            .flatten()
            .copied()
            .collect())
    }

    fn child_recipes(&self, parent: RecipeId) -> Result<Vec<RecipeId>, LarderError> {
        Ok(self.children_internal(parent).collect())
    }

    fn parent_recipes(&self, child: RecipeId) -> Result<Vec<RecipeId>, LarderError> {
        Ok(self.parents_internal(child).collect())
    }

    fn recipe_count(&self) -> Result<usize, LarderError> {
        Ok(self.recipes.len())
    }

    fn ingredient_count(&self) -> Result<usize, LarderError> {
        Ok(self.ingredients.len())
    }

    fn component_count(&self) -> Result<usize, LarderError> {
        Ok(self.children.values().map(BTreeSet::len).sum())
    }
}

// =============================================================================
// SERIALIZATION SUPPORT
// =============================================================================

/// Serializable representation of the catalog for snapshots.
///
/// Rows and edges are flattened into sorted vectors so the encoding is
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableCatalog {
    pub recipes: Vec<Recipe>,
    pub ingredients: Vec<Ingredient>,
    pub recipe_ingredients: Vec<(RecipeId, IngredientId)>,
    pub recipe_components: Vec<(RecipeId, RecipeId)>,
    pub next_recipe_id: u64,
    pub next_ingredient_id: u64,
}

impl From<&Catalog> for SerializableCatalog {
    fn from(catalog: &Catalog) -> Self {
        Self {
            recipes: catalog.recipes.values().cloned().collect(),
            ingredients: catalog.ingredients.values().cloned().collect(),
            recipe_ingredients: catalog.recipe_ingredient_pairs().collect(),
            recipe_components: catalog.component_pairs().collect(),
            next_recipe_id: catalog.next_recipe_id,
            next_ingredient_id: catalog.next_ingredient_id,
        }
    }
}

impl From<SerializableCatalog> for Catalog {
    /// Rebuild a catalog, preserving row ids.
    ///
    /// Every row is kept, including rows whose names repeat; a repeated id
    /// keeps its first row. Edges that reference missing rows, and component
    /// self-loops, are dropped.
    fn from(sc: SerializableCatalog) -> Self {
        let mut catalog = Catalog::new();

        for recipe in sc.recipes {
            if !catalog.recipes.contains_key(&recipe.id) {
                catalog.index_recipe(recipe);
            }
        }

        for ingredient in sc.ingredients {
            if !catalog.ingredients.contains_key(&ingredient.id) {
                catalog.index_ingredient(ingredient);
            }
        }

        for (recipe, ingredient) in sc.recipe_ingredients {
            if catalog.contains_recipe(recipe) && catalog.contains_ingredient(ingredient) {
                catalog.link_ingredient_unchecked(recipe, ingredient);
            }
        }

        for (parent, child) in sc.recipe_components {
            if parent != child && catalog.contains_recipe(parent) && catalog.contains_recipe(child) {
                catalog.link_component_unchecked(parent, child);
            }
        }

        // Never hand out an id that is already taken.
        let max_recipe = catalog.recipes.keys().next_back().map_or(0, |id| id.0);
        let max_ingredient = catalog.ingredients.keys().next_back().map_or(0, |id| id.0);
        catalog.next_recipe_id = sc.next_recipe_id.max(max_recipe.saturating_add(1));
        catalog.next_ingredient_id = sc
            .next_ingredient_id
            .max(max_ingredient.saturating_add(1));

        catalog
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one() {
        let mut catalog = Catalog::new();
        let bread = catalog.insert_recipe("Bread").expect("insert");
        let flour = catalog.insert_ingredient("Flour").expect("insert");

        assert_eq!(bread, RecipeId(1));
        assert_eq!(flour, IngredientId(1));
    }

    #[test]
    fn duplicate_recipe_name_rejected() {
        let mut catalog = Catalog::new();
        catalog.insert_recipe("Bread").expect("insert");

        let result = catalog.insert_recipe("Bread");
        assert!(matches!(result, Err(LarderError::DuplicateName(_))));
        assert_eq!(catalog.recipe_count().expect("count"), 1);
    }

    #[test]
    fn repeated_link_is_ignored() {
        let mut catalog = Catalog::new();
        let r = catalog.insert_recipe("Bread").expect("insert");
        let i = catalog.insert_ingredient("Flour").expect("insert");

        assert!(catalog.insert_recipe_ingredient(r, i).expect("link"));
        assert!(!catalog.insert_recipe_ingredient(r, i).expect("link"));
        assert_eq!(catalog.ingredients_of(r).expect("get"), vec![i]);
    }

    #[test]
    fn component_self_loop_rejected() {
        let mut catalog = Catalog::new();
        let r = catalog.insert_recipe("Bread").expect("insert");

        let result = catalog.insert_component(r, r);
        assert!(matches!(result, Err(LarderError::StructuralViolation(_))));
        assert_eq!(catalog.component_count().expect("count"), 0);
    }

    #[test]
    fn component_to_missing_recipe_rejected() {
        let mut catalog = Catalog::new();
        let r = catalog.insert_recipe("Bread").expect("insert");

        let result = catalog.insert_component(r, RecipeId(99));
        assert!(matches!(result, Err(LarderError::RecipeNotFound(RecipeId(99)))));
    }

    #[test]
    fn component_edges_indexed_both_ways() {
        let mut catalog = Catalog::new();
        let bread = catalog.insert_recipe("Bread").expect("insert");
        let sandwich = catalog.insert_recipe("Sandwich").expect("insert");
        catalog.insert_component(sandwich, bread).expect("link");

        assert_eq!(catalog.child_recipes(sandwich).expect("get"), vec![bread]);
        assert_eq!(catalog.parent_recipes(bread).expect("get"), vec![sandwich]);
        assert!(catalog.has_component(sandwich, bread));
        assert!(!catalog.has_component(bread, sandwich));
    }

    #[test]
    fn serializable_roundtrip_preserves_ids_and_edges() {
        let mut catalog = Catalog::new();
        let bread = catalog.insert_recipe("Bread").expect("insert");
        let sandwich = catalog.insert_recipe("Sandwich").expect("insert");
        let flour = catalog.insert_ingredient("Flour").expect("insert");
        catalog.insert_recipe_ingredient(bread, flour).expect("link");
        catalog.insert_component(sandwich, bread).expect("link");

        let restored = Catalog::from(SerializableCatalog::from(&catalog));

        assert_eq!(restored.recipe_by_name("Sandwich"), Some(sandwich));
        assert!(restored.has_recipe_ingredient(bread, flour));
        assert!(restored.has_component(sandwich, bread));
    }

    #[test]
    fn restore_drops_dangling_edges_and_keeps_ids_fresh() {
        let sc = SerializableCatalog {
            recipes: vec![Recipe::new(RecipeId(7), "Bread")],
            ingredients: vec![],
            recipe_ingredients: vec![(RecipeId(7), IngredientId(3))],
            recipe_components: vec![(RecipeId(7), RecipeId(8)), (RecipeId(7), RecipeId(7))],
            next_recipe_id: 1,
            next_ingredient_id: 1,
        };

        let mut catalog = Catalog::from(sc);
        assert_eq!(catalog.component_count().expect("count"), 0);
        assert!(catalog.ingredients_of(RecipeId(7)).expect("get").is_empty());

        let next = catalog.insert_recipe("Soup").expect("insert");
        assert_eq!(next, RecipeId(8));
    }

    #[test]
    fn restore_keeps_rows_with_repeated_names() {
        let sc = SerializableCatalog {
            recipes: vec![
                Recipe::new(RecipeId(2), "Soup"),
                Recipe::new(RecipeId(1), "Soup"),
            ],
            ingredients: vec![Ingredient::new(IngredientId(1), "Salt")],
            recipe_ingredients: vec![
                (RecipeId(2), IngredientId(1)),
                (RecipeId(1), IngredientId(1)),
            ],
            recipe_components: vec![],
            next_recipe_id: 3,
            next_ingredient_id: 2,
        };

        let mut catalog = Catalog::from(sc);
        assert_eq!(catalog.recipe_count().expect("count"), 2);
        assert_eq!(catalog.recipe_by_name("Soup"), Some(RecipeId(1)));
        assert_eq!(
            catalog.recipes_using(IngredientId(1)).expect("get"),
            vec![RecipeId(1), RecipeId(2)]
        );

        // Inserts still enforce uniqueness.
        let result = catalog.insert_recipe("Soup");
        assert!(matches!(result, Err(LarderError::DuplicateName(_))));
    }
}
