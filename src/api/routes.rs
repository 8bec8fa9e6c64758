//! API Routes
//!
//! Configures the Axum router with all coordination-service endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    generate_handler, health_handler, invalidate_handler, preload_handler,
    refresh_saved_handler, state_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /cases/:id/scenarios/generate` - Get-or-generate a scenario bundle
/// - `GET /cases/:id/scenarios` - Observable state snapshot
/// - `POST /cases/:id/scenarios/saved/refresh` - Refresh saved records
/// - `POST /cases/:id/scenarios/preload` - Proximity preload signal
/// - `DELETE /cases/:id/cache` - Invalidate both caches for a case
/// - `GET /cache/stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cases/:id/scenarios/generate", post(generate_handler))
        .route("/cases/:id/scenarios", get(state_handler))
        .route(
            "/cases/:id/scenarios/saved/refresh",
            post(refresh_saved_handler),
        )
        .route("/cases/:id/scenarios/preload", post(preload_handler))
        .route("/cases/:id/cache", delete(invalidate_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
