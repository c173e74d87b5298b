//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use wm_core::{CoreError, FieldError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(fields) => ApiError::Validation(fields),
            err if err.is_validation() => ApiError::InvalidInput(err.to_string()),
            CoreError::Io(e) => ApiError::Io(e),
            CoreError::Catalog(msg) | CoreError::Config(msg) => ApiError::Config(msg),
            other => ApiError::Store(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldError]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let fields = match &self {
            ApiError::Validation(fields) => Some(fields.as_slice()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            fields,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let validation = ApiError::from(CoreError::Validation(vec![FieldError::new(
            "totalVolume",
            "must not be negative",
        )]));
        assert_eq!(
            validation.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let volume = ApiError::from(CoreError::InvalidVolume {
            record_id: 3,
            value: "x".to_string(),
        });
        assert_eq!(volume.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let store = ApiError::from(CoreError::Store("connection refused".to_string()));
        assert_eq!(store.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
