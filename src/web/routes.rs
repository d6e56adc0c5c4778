//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/delayed-flights",
            get(handlers::delayed_flights).fallback(handlers::method_not_allowed),
        )
        .route("/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}
