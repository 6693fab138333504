//! Axum router configuration with middleware.
//!
//! Routes: `/chat` (POST, OPTIONS), `/invoke` (POST), `/health` (GET).
//! CORS headers come from the chat handler itself, so no CORS layer is
//! installed here. Other methods on `/chat` get a JSON 405 with the same
//! headers.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/chat",
            post(handlers::chat::chat)
                .options(handlers::chat::chat)
                .fallback(handlers::chat::method_not_allowed),
        )
        .route("/invoke", post(handlers::chat::invoke))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
