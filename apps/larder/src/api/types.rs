//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use crate::messages;
use larder_core::{
    LarderError, Query, QueryOutcome, QueryType, RecipeDetail, RecipeId, RecipeRef, Session,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Snapshot status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// "cache" or "remote".
    pub provenance: String,
    pub byte_len: u64,
    pub digest: Option<String>,
    pub recipe_count: usize,
    pub ingredient_count: usize,
    pub component_count: usize,
}

impl StatusResponse {
    pub fn from_session(session: &Session) -> Result<Self, LarderError> {
        let stats = session.stats()?;
        let fingerprint = session.fingerprint();
        Ok(Self {
            provenance: session.provenance().to_string(),
            byte_len: fingerprint.byte_len,
            digest: fingerprint.digest.clone(),
            recipe_count: stats.recipes,
            ingredient_count: stats.ingredients,
            component_count: stats.components,
        })
    }
}

// =============================================================================
// RECIPE JSON
// =============================================================================

/// `{id, name}` pair as listed in search results and sub-recipe lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeJson {
    pub id: u64,
    pub name: String,
}

impl From<&RecipeRef> for RecipeJson {
    fn from(r: &RecipeRef) -> Self {
        Self {
            id: r.id.0,
            name: r.name.clone(),
        }
    }
}

fn recipes_json(refs: &[RecipeRef]) -> Vec<RecipeJson> {
    refs.iter().map(RecipeJson::from).collect()
}

/// Recipe detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetailJson {
    pub id: u64,
    pub name: String,
    pub ingredients: Vec<String>,
    pub subrecipes: Vec<RecipeJson>,
}

impl From<&RecipeDetail> for RecipeDetailJson {
    fn from(d: &RecipeDetail) -> Self {
        Self {
            id: d.recipe.id.0,
            name: d.recipe.name.clone(),
            ingredients: d.ingredients.clone(),
            subrecipes: recipes_json(&d.subrecipes),
        }
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// `GET /search?q=` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// Search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    pub recipes: Vec<RecipeJson>,
}

impl SearchResponse {
    pub fn found(recipes: &[RecipeRef]) -> Self {
        Self {
            success: true,
            message: messages::search_summary(recipes.len()),
            recipes: recipes_json(recipes),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            message: msg.into(),
            recipes: Vec::new(),
        }
    }
}

// =============================================================================
// RECIPE ROUTES
// =============================================================================

/// `GET /recipes/{id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub found: bool,
    pub recipe: Option<RecipeDetailJson>,
    pub error: Option<String>,
}

impl RecipeResponse {
    pub fn found(detail: &RecipeDetail) -> Self {
        Self {
            found: true,
            recipe: Some(RecipeDetailJson::from(detail)),
            error: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            recipe: None,
            error: Some(messages::RECIPE_NOT_FOUND.to_string()),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            found: false,
            recipe: None,
            error: Some(msg.into()),
        }
    }
}

/// `GET /recipes/{id}/ingredients` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientsResponse {
    pub recipe_id: u64,
    pub ingredients: Vec<String>,
}

/// `GET /recipes/{id}/subrecipes` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubrecipesResponse {
    pub recipe_id: u64,
    pub subrecipes: Vec<RecipeJson>,
}

impl SubrecipesResponse {
    pub fn new(recipe: RecipeId, subrecipes: &[RecipeRef]) -> Self {
        Self {
            recipe_id: recipe.0,
            subrecipes: recipes_json(subrecipes),
        }
    }
}

// =============================================================================
// QUERY REQUEST/RESPONSE
// =============================================================================

/// Query request (tagged union).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryRequest {
    Recipe { id: u64 },
    Ingredients { id: u64 },
    Subrecipes { id: u64 },
    Search { term: String },
}

impl QueryRequest {
    /// Convert to a core query, validating the search term.
    pub fn to_query(&self) -> Result<Query, LarderError> {
        let query_type = match self {
            Self::Recipe { id } => QueryType::Recipe { id: RecipeId(*id) },
            Self::Ingredients { id } => QueryType::Ingredients { id: RecipeId(*id) },
            Self::Subrecipes { id } => QueryType::Subrecipes { id: RecipeId(*id) },
            Self::Search { term } => QueryType::Search {
                term: messages::normalize_search_term(term)?,
            },
        };
        Ok(Query::new(query_type))
    }
}

/// Query response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub recipe: Option<RecipeDetailJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub recipes: Vec<RecipeJson>,
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn from_outcome(outcome: &QueryOutcome) -> Self {
        let mut response = Self {
            success: true,
            found: !outcome.is_empty(),
            recipe: None,
            ingredients: Vec::new(),
            recipes: Vec::new(),
            error: None,
        };
        match outcome {
            QueryOutcome::Recipe(detail) => {
                response.recipe = detail.as_ref().map(RecipeDetailJson::from);
            }
            QueryOutcome::Ingredients(names) => {
                response.ingredients = names.clone().unwrap_or_default();
            }
            QueryOutcome::Recipes(refs) => {
                response.recipes = recipes_json(refs);
            }
        }
        response
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            found: false,
            recipe: None,
            ingredients: Vec::new(),
            recipes: Vec::new(),
            error: Some(msg.into()),
        }
    }
}
