//! HTTP API server with observability for the auction store.
//!
//! Provides REST endpoints for users, items and bids, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::Services;
use entity_store::Database;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/users", post(routes::users::create).get(routes::users::list))
        .route("/users/{user_id}", get(routes::users::get))
        .route("/users/{user_id}/bids/items", get(routes::bids::items_by_user))
        .route(
            "/users/{user_id}/items/{item_id}/bids",
            post(routes::bids::create),
        )
        .route("/items", post(routes::items::create).get(routes::items::list))
        .route("/items/{item_id}", get(routes::items::get))
        .route("/items/{item_id}/bids", get(routes::bids::list_by_item))
        .route("/items/{item_id}/bids/highest", get(routes::bids::highest))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over a fresh, empty database.
pub fn create_default_state() -> Arc<AppState> {
    let db = Database::new();
    Arc::new(AppState::new(Services::new(&db)))
}
