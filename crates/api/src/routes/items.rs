//! Item endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{Amount, Item, ItemId};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub initial_value: Amount,
}

/// POST /items: put an item up for auction.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let Json(req) = payload?;
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::required("name"))?;

    let item = state
        .services
        .items
        .tx_create(Item::new(name, req.initial_value))
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /items: list every item.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<Item>> {
    Json(state.services.items.list_items().await)
}

/// GET /items/{item_id}: load an item by id.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    item_id: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<Item>, ApiError> {
    let Path(item_id) = item_id?;
    let item = state.services.items.get(item_id).await?;
    Ok(Json(item))
}
