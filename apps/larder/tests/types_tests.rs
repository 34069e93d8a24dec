//! Serialization tests for the API request/response types.

#![allow(clippy::unwrap_used)]

use larder::api::{QueryRequest, QueryResponse, RecipeJson, SearchResponse};
use larder_core::{QueryOutcome, QueryType, RecipeId, RecipeRef};
use serde_json::json;

#[test]
fn query_request_tags() {
    let req: QueryRequest = serde_json::from_value(json!({ "type": "subrecipes", "id": 4 })).unwrap();
    assert_eq!(
        req.to_query().unwrap().query_type,
        QueryType::Subrecipes { id: RecipeId(4) }
    );

    let req: QueryRequest =
        serde_json::from_value(json!({ "type": "search", "term": "  Flour " })).unwrap();
    assert_eq!(
        req.to_query().unwrap().query_type,
        QueryType::Search {
            term: "Flour".to_string()
        }
    );
}

#[test]
fn query_request_missing_field_rejected() {
    let result = serde_json::from_value::<QueryRequest>(json!({ "type": "recipe" }));
    assert!(result.is_err());
}

#[test]
fn query_request_serializes_with_tag() {
    let value = serde_json::to_value(QueryRequest::Ingredients { id: 9 }).unwrap();
    assert_eq!(value, json!({ "type": "ingredients", "id": 9 }));
}

#[test]
fn query_response_omits_empty_lists() {
    let outcome = QueryOutcome::Ingredients(Some(vec!["Salt".to_string()]));
    let value = serde_json::to_value(QueryResponse::from_outcome(&outcome)).unwrap();

    assert_eq!(value["success"], json!(true));
    assert_eq!(value["found"], json!(true));
    assert_eq!(value["ingredients"], json!(["Salt"]));
    assert!(value.get("recipes").is_none());
    assert!(value.get("recipe").is_none());
}

#[test]
fn query_response_for_missing_recipe() {
    let response = QueryResponse::from_outcome(&QueryOutcome::Ingredients(None));
    assert!(response.success);
    assert!(!response.found);
    assert!(response.ingredients.is_empty());
}

#[test]
fn search_response_message_tracks_count() {
    let refs = vec![
        RecipeRef::new(RecipeId(1), "Bread"),
        RecipeRef::new(RecipeId(2), "Sandwich"),
    ];
    let response = SearchResponse::found(&refs);
    assert_eq!(response.message, "Found 2 recipes.");
    assert_eq!(
        response.recipes[1],
        RecipeJson {
            id: 2,
            name: "Sandwich".to_string()
        }
    );
}
