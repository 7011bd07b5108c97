//! Router assembly.

mod api;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(api::chat))
        .route("/health", get(api::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
