//! API error types with HTTP response mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ModelError, ValidationError};
use serde_json::{Value, json};
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request that never reached a service.
    #[error("{0}")]
    BadRequest(String),

    /// Error returned by a service.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    /// Shorthand for a single missing or empty field.
    pub fn required(field: &str) -> Self {
        DomainError::from(ValidationError::single(field, ModelError::Required)).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "bad_request", "message": msg }),
            ),
            ApiError::Domain(DomainError::Model(err)) => (
                model_status(err),
                json!({ "error": err.code(), "message": err.detail() }),
            ),
            ApiError::Domain(DomainError::Validation(ve)) => validation_body(&ve),
            ApiError::Domain(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "server_error", "message": "internal server error" }),
                )
            }
        };

        tracing::debug!(%status, %body, "request failed");
        (status, Json(body)).into_response()
    }
}

fn model_status(err: ModelError) -> StatusCode {
    match err {
        ModelError::NotFound => StatusCode::NOT_FOUND,
        ModelError::Conflict => StatusCode::CONFLICT,
        ModelError::LowValue | ModelError::Required => StatusCode::BAD_REQUEST,
    }
}

fn validation_body(ve: &ValidationError) -> (StatusCode, Value) {
    let status = if ve.iter().any(|(_, err)| err == ModelError::Conflict) {
        StatusCode::CONFLICT
    } else {
        StatusCode::BAD_REQUEST
    };

    let fields: Vec<Value> = ve
        .iter()
        .map(|(field, err)| {
            json!({ "field": field, "code": err.code(), "message": err.detail() })
        })
        .collect();

    (
        status,
        json!({ "error": "validation_error", "message": ve.to_string(), "fields": fields }),
    )
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use entity_store::StoreError;

    use super::*;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_model_errors_map_to_status() {
        let (status, body) = render(DomainError::Model(ModelError::NotFound).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "resource not found");

        let (status, _) = render(DomainError::Model(ModelError::Conflict).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = render(DomainError::Model(ModelError::LowValue).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "low_value");
    }

    #[tokio::test]
    async fn test_validation_lists_sorted_fields() {
        let ve: ValidationError = [("user", ModelError::NotFound), ("item", ModelError::LowValue)]
            .into_iter()
            .collect();

        let (status, body) = render(DomainError::from(ve).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "validation error on fields item, user");
        assert_eq!(body["fields"][0]["field"], "item");
        assert_eq!(body["fields"][0]["code"], "low_value");
        assert_eq!(body["fields"][1]["field"], "user");
        assert_eq!(body["fields"][1]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_validation_with_conflict_is_409() {
        let ve = ValidationError::single("item", ModelError::Conflict);

        let (status, _) = render(DomainError::from(ve).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_store_failure_is_opaque() {
        let err = DomainError::Store(StoreError::Backend("secret detail".into()));

        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "server_error");
        assert!(!body.to_string().contains("secret detail"));
    }

    #[tokio::test]
    async fn test_required_shorthand() {
        let (status, body) = render(ApiError::required("name")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "name");
        assert_eq!(body["fields"][0]["code"], "required");
    }
}
