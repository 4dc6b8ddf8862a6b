//! User endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{User, UserId};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub name: Option<String>,
}

/// POST /users: register a user.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(req) = payload?;
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::required("name"))?;

    let user = state.services.users.tx_create(User::new(name)).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users: list every user.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<User>> {
    Json(state.services.users.list_users().await)
}

/// GET /users/{user_id}: load a user by id.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let Path(user_id) = user_id?;
    let user = state.services.users.get(user_id).await?;
    Ok(Json(user))
}
