//! # Query Module
//!
//! Structured query types for catalog reads.
//!
//! - One variant per read operation the catalog answers
//! - Deterministic: the same query against the same snapshot gives the same
//!   outcome, byte for byte

use crate::{RecipeDetail, RecipeId, RecipeRef};
use serde::{Deserialize, Serialize};

/// Read operations supported by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryType {
    /// Recipe row with closure ingredients and direct sub-recipes.
    Recipe { id: RecipeId },

    /// Closure ingredients of a recipe.
    Ingredients { id: RecipeId },

    /// Direct sub-recipes of a recipe.
    Subrecipes { id: RecipeId },

    /// Recipes that use a matching ingredient at any depth.
    Search { term: String },
}

/// A structured catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub query_type: QueryType,
}

impl Query {
    #[must_use]
    pub fn new(query_type: QueryType) -> Self {
        Self { query_type }
    }

    /// Recipe detail helper.
    #[must_use]
    pub fn recipe(id: RecipeId) -> Self {
        Self::new(QueryType::Recipe { id })
    }

    /// Ingredient closure helper.
    #[must_use]
    pub fn ingredients(id: RecipeId) -> Self {
        Self::new(QueryType::Ingredients { id })
    }

    /// Direct sub-recipes helper.
    #[must_use]
    pub fn subrecipes(id: RecipeId) -> Self {
        Self::new(QueryType::Subrecipes { id })
    }

    /// Ingredient search helper.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self::new(QueryType::Search { term: term.into() })
    }
}

/// The answer to a `Query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Detail view; `None` when the recipe does not exist.
    Recipe(Option<RecipeDetail>),
    /// Ingredient names; `None` when the recipe does not exist.
    Ingredients(Option<Vec<String>>),
    /// Sorted recipe references (sub-recipes or search matches).
    Recipes(Vec<RecipeRef>),
}

impl QueryOutcome {
    /// Whether the outcome carries any rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Recipe(detail) => detail.is_none(),
            Self::Ingredients(names) => names.as_ref().is_none_or(Vec::is_empty),
            Self::Recipes(refs) => refs.is_empty(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
