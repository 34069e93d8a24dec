//! # API Endpoint Handlers
//!
//! Every handler holds the session read guard for the whole query, so a
//! concurrent snapshot swap is observed either entirely or not at all.

use super::{
    AppState,
    types::{
        HealthResponse, IngredientsResponse, QueryRequest, QueryResponse, RecipeResponse,
        SearchParams, SearchResponse, StatusResponse, SubrecipesResponse,
    },
};
use crate::messages;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use larder_core::{LarderError, RecipeId};

/// HTTP status for a core error.
fn status_for(e: &LarderError) -> StatusCode {
    match e {
        LarderError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HEALTH / STATUS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Snapshot provenance, fingerprint and row counts.
pub async fn status_handler(State(state): State<AppState>) -> Response {
    let session = state.session.read().await;
    match StatusResponse::from_session(&session) {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => (status_for(&e), e.to_string()).into_response(),
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// `GET /search?q=term`
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let term = match messages::normalize_search_term(params.q.as_deref().unwrap_or_default()) {
        Ok(term) => term,
        Err(e) => {
            let msg = match e {
                LarderError::InvalidInput(msg) => msg,
                other => other.to_string(),
            };
            return (StatusCode::BAD_REQUEST, Json(SearchResponse::error(msg)));
        }
    };

    let session = state.session.read().await;
    match session.search_by_ingredient(&term) {
        Ok(recipes) => (StatusCode::OK, Json(SearchResponse::found(&recipes))),
        Err(e) => (status_for(&e), Json(SearchResponse::error(e.to_string()))),
    }
}

// =============================================================================
// RECIPES
// =============================================================================

/// `GET /recipes/{id}`
pub async fn recipe_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let session = state.session.read().await;
    match session.resolve_detail(RecipeId(id)) {
        Ok(Some(detail)) => (StatusCode::OK, Json(RecipeResponse::found(&detail))),
        Ok(None) => (StatusCode::NOT_FOUND, Json(RecipeResponse::not_found())),
        Err(e) => (status_for(&e), Json(RecipeResponse::error(e.to_string()))),
    }
}

/// `GET /recipes/{id}/ingredients`
pub async fn ingredients_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Response {
    let session = state.session.read().await;
    match session.resolve_ingredients(RecipeId(id)) {
        Ok(Some(ingredients)) => (
            StatusCode::OK,
            Json(IngredientsResponse {
                recipe_id: id,
                ingredients,
            }),
        )
            .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(RecipeResponse::not_found())).into_response(),
        Err(e) => (status_for(&e), Json(RecipeResponse::error(e.to_string()))).into_response(),
    }
}

/// `GET /recipes/{id}/subrecipes`
pub async fn subrecipes_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Response {
    let recipe = RecipeId(id);
    let session = state.session.read().await;
    if !session.catalog().contains_recipe(recipe) {
        return (StatusCode::NOT_FOUND, Json(RecipeResponse::not_found())).into_response();
    }
    match session.resolve_direct_subrecipes(recipe) {
        Ok(subs) => (StatusCode::OK, Json(SubrecipesResponse::new(recipe, &subs))).into_response(),
        Err(e) => (status_for(&e), Json(RecipeResponse::error(e.to_string()))).into_response(),
    }
}

// =============================================================================
// QUERY HANDLER
// =============================================================================

/// Execute a structured query.
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    let query = match request.to_query() {
        Ok(q) => q,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(QueryResponse::error(format!("Invalid query: {}", e))),
            );
        }
    };

    let session = state.session.read().await;
    match session.execute(&query) {
        Ok(outcome) => (StatusCode::OK, Json(QueryResponse::from_outcome(&outcome))),
        Err(e) => (
            status_for(&e),
            Json(QueryResponse::error(format!("Query failed: {}", e))),
        ),
    }
}

// =============================================================================
// SNAPSHOT HANDLER
// =============================================================================

/// Serve the open snapshot verbatim, so one server can be another's source.
pub async fn snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        session.snapshot_bytes().to_vec(),
    )
}
