use crate::repositories::RepositoryError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Validation messages keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred. Please try again later.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User not found")]
    UserNotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed for: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => AppError::Database(e),
            RepositoryError::Validation(fields) => AppError::Validation(
                fields
                    .into_iter()
                    .map(|field| {
                        (
                            field.to_string(),
                            vec![format!("The {} field must not be empty.", field)],
                        )
                    })
                    .collect(),
            ),
            RepositoryError::Conflict { field } => {
                AppError::Conflict(format!("A user with this {} already exists.", field))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map(|msg| msg.to_string())
                            .unwrap_or_else(|| format!("The {} field is invalid.", field))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        AppError::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::UserNotFound => StatusCode::NOT_FOUND.into_response(),
            AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "One or more validation errors occurred.",
                    "errors": errors,
                })),
            )
                .into_response(),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
