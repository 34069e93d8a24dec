//! # Larder HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Snapshot provenance, fingerprint and row counts
//! - `GET /search?q=` - Recipes using a matching ingredient at any depth
//! - `GET /recipes/{id}` - Recipe detail
//! - `GET /recipes/{id}/ingredients` - Ingredient closure
//! - `GET /recipes/{id}/subrecipes` - Direct sub-recipes
//! - `POST /query` - Execute a structured query
//! - `GET /snapshot` - Raw snapshot bytes
//!
//! ## Security Configuration
//!
//! - `cors_origins` / `LARDER_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `rate_limit` / `LARDER_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use handlers::{
    health_handler, ingredients_handler, query_handler, recipe_handler, search_handler,
    snapshot_handler, status_handler, subrecipes_handler,
};
pub use middleware::{GlobalRateLimiter, create_rate_limiter, rate_limit_middleware};
pub use types::{
    HealthResponse, IngredientsResponse, QueryRequest, QueryResponse, RecipeDetailJson,
    RecipeJson, RecipeResponse, SearchParams, SearchResponse, StatusResponse, SubrecipesResponse,
};

use crate::bootstrap::SharedSession;
use crate::config::HttpConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use larder_core::{LarderError, Session};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request bodies are small JSON queries.
const MAX_BODY_BYTES: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the open session.
#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
}

impl AppState {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self::from_shared(Arc::new(RwLock::new(session)))
    }

    /// State over a session that is also held by the revalidation task.
    #[must_use]
    pub fn from_shared(session: SharedSession) -> Self {
        Self { session }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `*`: any origin
/// - unset or no valid entries: localhost only
/// - otherwise: the comma-separated list
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins.map(str::trim) {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) if !trimmed.is_empty() => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Ok(_) => None,
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => build_localhost_cors(),
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - global quota (if enabled)
pub fn create_router(state: AppState, http: &HttpConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/search", get(handlers::search_handler))
        .route("/recipes/{id}", get(handlers::recipe_handler))
        .route("/recipes/{id}/ingredients", get(handlers::ingredients_handler))
        .route("/recipes/{id}/subrecipes", get(handlers::subrecipes_handler))
        .route("/query", post(handlers::query_handler))
        .route("/snapshot", get(handlers::snapshot_handler));

    if http.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", http.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(http.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(http.cors_origins.as_deref()))
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve `state` until the process is interrupted.
pub async fn run_server(state: AppState, http: &HttpConfig) -> Result<(), LarderError> {
    let router = create_router(state, http);
    let addr = format!("{}:{}", http.host, http.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LarderError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Larder HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LarderError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
