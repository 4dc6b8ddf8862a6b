//! Liveness endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub users: usize,
    pub items: usize,
    pub bids: usize,
}

/// GET /health: reports liveness and table sizes.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let services = &state.services;
    Json(HealthResponse {
        status: "ok",
        users: services.users.store().len().await,
        items: services.items.store().len().await,
        bids: services.bids.store().bid_count().await,
    })
}
