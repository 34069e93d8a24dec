//! Integration tests for the Larder HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use larder::api::{
    AppState, HealthResponse, IngredientsResponse, QueryResponse, RecipeJson, RecipeResponse,
    SearchResponse, StatusResponse, SubrecipesResponse, create_router,
};
use larder::config::HttpConfig;
use larder::messages;
use larder_core::{CatalogEditor, ChangeDetection, Provenance, Session};
use serde_json::json;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Bread(1) <- Sandwich(2) <- Club(3); Flour on Bread, Ham on Sandwich.
fn sandwich_bytes() -> Vec<u8> {
    let mut catalog = CatalogEditor::create_empty();
    let bread = CatalogEditor::add_recipe(&mut catalog, "Bread").unwrap();
    let sandwich = CatalogEditor::add_recipe(&mut catalog, "Sandwich").unwrap();
    let club = CatalogEditor::add_recipe(&mut catalog, "Club").unwrap();
    let flour = CatalogEditor::add_ingredient(&mut catalog, "Flour").unwrap();
    let ham = CatalogEditor::add_ingredient(&mut catalog, "Ham").unwrap();
    CatalogEditor::link_ingredient(&mut catalog, bread, flour).unwrap();
    CatalogEditor::link_ingredient(&mut catalog, sandwich, ham).unwrap();
    CatalogEditor::link_subrecipe(&mut catalog, sandwich, bread).unwrap();
    CatalogEditor::link_subrecipe(&mut catalog, club, sandwich).unwrap();
    CatalogEditor::export(&catalog).unwrap()
}

fn test_http_config() -> HttpConfig {
    HttpConfig {
        rate_limit: 0,
        ..HttpConfig::default()
    }
}

fn create_test_server() -> TestServer {
    let session = Session::open(
        sandwich_bytes(),
        Provenance::FromCache,
        ChangeDetection::ContentHash,
    )
    .unwrap();
    let router = create_router(AppState::new(session), &test_http_config());
    TestServer::new(router).unwrap()
}

// =============================================================================
// HEALTH / STATUS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_status_reports_snapshot() {
    let server = create_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.provenance, "cache");
    assert_eq!(status.recipe_count, 3);
    assert_eq!(status.ingredient_count, 2);
    assert_eq!(status.component_count, 2);
    assert_eq!(status.byte_len, sandwich_bytes().len() as u64);
    assert!(status.digest.is_some());
}

// =============================================================================
// SEARCH
// =============================================================================

#[tokio::test]
async fn test_search_walks_up_the_tree() {
    let server = create_test_server();

    let response = server.get("/search").add_query_param("q", "flo").await;

    response.assert_status_ok();
    let body: SearchResponse = response.json();
    assert!(body.success);
    assert_eq!(body.message, "Found 3 recipes.");
    let names: Vec<&str> = body.recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Bread", "Club", "Sandwich"]);
}

#[tokio::test]
async fn test_search_no_matches() {
    let server = create_test_server();

    let response = server.get("/search").add_query_param("q", "quinoa").await;

    response.assert_status_ok();
    let body: SearchResponse = response.json();
    assert!(body.recipes.is_empty());
    assert_eq!(body.message, messages::NO_MATCHES);
}

#[tokio::test]
async fn test_search_blank_term_rejected() {
    let server = create_test_server();

    let response = server.get("/search").add_query_param("q", "   ").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: SearchResponse = response.json();
    assert!(!body.success);
    assert_eq!(body.message, messages::EMPTY_SEARCH);

    let response = server.get("/search").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_wildcards_are_literal() {
    let server = create_test_server();

    let response = server.get("/search").add_query_param("q", "%").await;

    response.assert_status_ok();
    let body: SearchResponse = response.json();
    assert!(body.recipes.is_empty());
}

// =============================================================================
// RECIPES
// =============================================================================

#[tokio::test]
async fn test_recipe_detail() {
    let server = create_test_server();

    let response = server.get("/recipes/3").await;

    response.assert_status_ok();
    let body: RecipeResponse = response.json();
    assert!(body.found);
    let recipe = body.recipe.unwrap();
    assert_eq!(recipe.name, "Club");
    assert_eq!(recipe.ingredients, vec!["Flour", "Ham"]);
    assert_eq!(
        recipe.subrecipes,
        vec![RecipeJson {
            id: 2,
            name: "Sandwich".to_string()
        }]
    );
}

#[tokio::test]
async fn test_recipe_not_found() {
    let server = create_test_server();

    let response = server.get("/recipes/99").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: RecipeResponse = response.json();
    assert!(!body.found);
    assert_eq!(body.error.as_deref(), Some(messages::RECIPE_NOT_FOUND));
}

#[tokio::test]
async fn test_recipe_ingredients() {
    let server = create_test_server();

    let response = server.get("/recipes/2/ingredients").await;

    response.assert_status_ok();
    let body: IngredientsResponse = response.json();
    assert_eq!(body.recipe_id, 2);
    assert_eq!(body.ingredients, vec!["Flour", "Ham"]);

    server
        .get("/recipes/42/ingredients")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_subrecipes_are_direct_only() {
    let server = create_test_server();

    let response = server.get("/recipes/3/subrecipes").await;

    response.assert_status_ok();
    let body: SubrecipesResponse = response.json();
    assert_eq!(body.subrecipes.len(), 1);
    assert_eq!(body.subrecipes[0].name, "Sandwich");

    let response = server.get("/recipes/1/subrecipes").await;
    let body: SubrecipesResponse = response.json();
    assert!(body.subrecipes.is_empty());
}

#[tokio::test]
async fn test_non_numeric_id_rejected() {
    let server = create_test_server();

    let response = server.get("/recipes/bread").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// QUERY ENDPOINT
// =============================================================================

#[tokio::test]
async fn test_query_ingredients() {
    let server = create_test_server();

    let response = server
        .post("/query")
        .json(&json!({ "type": "ingredients", "id": 3 }))
        .await;

    response.assert_status_ok();
    let body: QueryResponse = response.json();
    assert!(body.success);
    assert!(body.found);
    assert_eq!(body.ingredients, vec!["Flour", "Ham"]);
}

#[tokio::test]
async fn test_query_search() {
    let server = create_test_server();

    let response = server
        .post("/query")
        .json(&json!({ "type": "search", "term": "HAM" }))
        .await;

    response.assert_status_ok();
    let body: QueryResponse = response.json();
    let ids: Vec<u64> = body.recipes.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2]);
}

#[tokio::test]
async fn test_query_missing_recipe() {
    let server = create_test_server();

    let response = server
        .post("/query")
        .json(&json!({ "type": "recipe", "id": 77 }))
        .await;

    response.assert_status_ok();
    let body: QueryResponse = response.json();
    assert!(body.success);
    assert!(!body.found);
    assert!(body.recipe.is_none());
}

#[tokio::test]
async fn test_query_blank_search_rejected() {
    let server = create_test_server();

    let response = server
        .post("/query")
        .json(&json!({ "type": "search", "term": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: QueryResponse = response.json();
    assert!(!body.success);
}

#[tokio::test]
async fn test_query_unknown_type_rejected() {
    let server = create_test_server();

    let response = server
        .post("/query")
        .json(&json!({ "type": "traverse", "id": 1 }))
        .await;

    assert!(response.status_code().is_client_error());
}

// =============================================================================
// SNAPSHOT ENDPOINT
// =============================================================================

#[tokio::test]
async fn test_snapshot_served_verbatim() {
    let server = create_test_server();

    let response = server.get("/snapshot").await;

    response.assert_status_ok();
    assert_eq!(response.header("cache-control"), "no-store");
    assert_eq!(response.as_bytes().to_vec(), sandwich_bytes());
}

// =============================================================================
// SWAP
// =============================================================================

#[tokio::test]
async fn test_swapped_session_is_visible() {
    let session = Session::open(
        sandwich_bytes(),
        Provenance::FromCache,
        ChangeDetection::ContentHash,
    )
    .unwrap();
    let state = AppState::new(session);
    let server = TestServer::new(create_router(state.clone(), &test_http_config())).unwrap();

    let mut catalog = CatalogEditor::create_empty();
    CatalogEditor::add_recipe(&mut catalog, "Soup").unwrap();
    let next = Session::open(
        CatalogEditor::export(&catalog).unwrap(),
        Provenance::FromRemote,
        ChangeDetection::ContentHash,
    )
    .unwrap();
    let _retired = state.session.write().await.replace(next);

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.provenance, "remote");
    assert_eq!(status.recipe_count, 1);
}

// =============================================================================
// RATE LIMITING
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_excess() {
    let session = Session::open(
        sandwich_bytes(),
        Provenance::FromRemote,
        ChangeDetection::ByteLength,
    )
    .unwrap();
    let http = HttpConfig {
        rate_limit: 1,
        ..HttpConfig::default()
    };
    let server = TestServer::new(create_router(AppState::new(session), &http)).unwrap();

    server.get("/health").await.assert_status_ok();
    server
        .get("/health")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}
