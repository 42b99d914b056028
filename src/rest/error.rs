//! API error types and responses.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shows::{ShowError, ValidationErrors};

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found
    NotFound(String),
    /// Show has no steps to point at
    NoStepsAvailable(String),
    /// Validation error, optionally with per-field messages
    ValidationError(String, Option<ValidationErrors>),
    /// Write raced with another writer or hit a uniqueness rule
    Conflict(String),
    /// Internal server error
    InternalError(String),
    /// Bad request
    BadRequest(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, fields) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::NoStepsAvailable(msg) => {
                (StatusCode::NOT_FOUND, "no_steps_available", msg, None)
            }
            ApiError::ValidationError(msg, fields) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                msg,
                fields.map(ValidationErrors::into_fields),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
        };

        if status.is_server_error() {
            tracing::error!(%status, "{}", message);
        }

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
                fields,
            }),
        )
            .into_response()
    }
}

impl From<ShowError> for ApiError {
    fn from(err: ShowError) -> Self {
        match err {
            e @ ShowError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            e @ ShowError::NoStepsAvailable(_) => ApiError::NoStepsAvailable(e.to_string()),
            ShowError::InvalidInput(msg) => ApiError::ValidationError(msg, None),
            ShowError::Validation(errors) => {
                ApiError::ValidationError(errors.to_string(), Some(errors))
            }
            ShowError::Conflict(msg) => ApiError::Conflict(msg),
            e @ (ShowError::DanglingCurrentStep { .. } | ShowError::Store(_)) => {
                ApiError::InternalError(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("JSON error: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use uuid::Uuid;

    async fn body_of(response: Response) -> ErrorResponse {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let error = ApiError::NotFound("show 'abc' not found".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_of(response).await;
        assert_eq!(json.error, "not_found");
        assert!(json.fields.is_none());
    }

    #[tokio::test]
    async fn test_validation_error_carries_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("calories", "The calories field is required.");
        let error: ApiError = ShowError::Validation(errors).into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_of(response).await;
        assert_eq!(json.error, "validation_error");
        assert_eq!(json.message, "The calories field is required.");
        assert!(json.fields.unwrap().contains_key("calories"));
    }

    #[tokio::test]
    async fn test_no_steps_response() {
        let error: ApiError = ShowError::NoStepsAvailable(Uuid::new_v4()).into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await.error, "no_steps_available");
    }

    #[tokio::test]
    async fn test_conflict_response() {
        let error: ApiError = ShowError::Conflict("step_number 1 already exists".to_string()).into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_dangling_step_is_internal() {
        let error: ApiError = ShowError::DanglingCurrentStep {
            show_id: Uuid::new_v4(),
            step_id: Uuid::new_v4(),
        }
        .into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
