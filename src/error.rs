//! API error type and the `{"detail": ...}` error envelope

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::services::order_store::StoreError;

pub const FORBIDDEN_DETAIL: &str = "Staff privileges required.";
pub const NOT_FOUND_DETAIL: &str = "Order not found.";
pub const VALIDATION_DETAIL: &str = "Validation failed.";
pub const STORE_UNAVAILABLE_DETAIL: &str = "Order store unavailable.";
pub const INTERNAL_DETAIL: &str = "Internal server error.";

/// A single offending field in a rejected payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// Caller-facing failure of an order operation
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Staff privileges required.")]
    Forbidden,
    #[error("Validation failed.")]
    Validation(Vec<FieldError>),
    #[error("Order not found.")]
    NotFound,
    #[error("Order store unavailable.")]
    StoreUnavailable,
    #[error("Internal server error.")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Unavailable(e) => {
                tracing::error!(error = %e, "Order store unavailable");
                ApiError::StoreUnavailable
            }
            StoreError::CorruptRow { id, source } => {
                tracing::error!(order_id = id, error = %source, "Stored order cannot be decoded");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();
        let errors = match self {
            ApiError::Validation(errors) => errors,
            _ => Vec::new(),
        };

        (status, Json(ErrorResponse { detail, errors })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_forbidden_envelope() {
        let (status, json) = body_json(ApiError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json, serde_json::json!({ "detail": "Staff privileges required." }));
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let (status, json) = body_json(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, serde_json::json!({ "detail": "Order not found." }));
    }

    #[tokio::test]
    async fn test_validation_envelope_lists_fields() {
        let err = ApiError::Validation(vec![FieldError::new("item", "must not be empty")]);
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["detail"], "Validation failed.");
        assert_eq!(json["errors"][0]["field"], "item");
        assert_eq!(json["errors"][0]["message"], "must not be empty");
    }

    #[test]
    fn test_store_errors_are_not_conflated() {
        let unavailable: ApiError =
            StoreError::Unavailable(sea_orm::DbErr::Custom("down".to_string())).into();
        assert!(matches!(unavailable, ApiError::StoreUnavailable));

        let missing: ApiError = StoreError::NotFound(3).into();
        assert!(matches!(missing, ApiError::NotFound));
    }
}
