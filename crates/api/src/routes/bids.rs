//! Bid endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{Amount, Bid, Item, ItemId, UserId};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceBidRequest {
    pub amount: Option<Amount>,
}

/// POST /users/{user_id}/items/{item_id}/bids: place a bid.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    ids: Result<Path<(UserId, ItemId)>, PathRejection>,
    payload: Result<Json<PlaceBidRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Bid>), ApiError> {
    let Path((user_id, item_id)) = ids?;
    let Json(req) = payload?;
    let amount = req.amount.ok_or_else(|| ApiError::required("amount"))?;

    let bid = state
        .services
        .bids
        .tx_create(Bid::new(item_id, user_id, amount))
        .await?;

    Ok((StatusCode::CREATED, Json(bid)))
}

/// GET /items/{item_id}/bids: every bid on an item.
#[tracing::instrument(skip(state))]
pub async fn list_by_item(
    State(state): State<Arc<AppState>>,
    item_id: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<Vec<Bid>>, ApiError> {
    let Path(item_id) = item_id?;
    let bids = state.services.bids.list_bids_by_item_id(item_id).await?;
    Ok(Json(bids))
}

/// GET /items/{item_id}/bids/highest: the winning bid on an item.
#[tracing::instrument(skip(state))]
pub async fn highest(
    State(state): State<Arc<AppState>>,
    item_id: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<Bid>, ApiError> {
    let Path(item_id) = item_id?;
    let bid = state.services.bids.get_winning_bid(item_id).await?;
    Ok(Json(bid))
}

/// GET /users/{user_id}/bids/items: every item the user has bid on, ordered by
/// the user's first bid on each.
#[tracing::instrument(skip(state))]
pub async fn items_by_user(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let Path(user_id) = user_id?;
    let bids = state.services.bids.list_bids_by_user_id(user_id).await?;

    let item_ids: Vec<ItemId> = bids.iter().map(|b| b.item_id).collect();
    let items = state.services.items.list_items_by_ids(&item_ids).await?;
    Ok(Json(items))
}
