/// Error types for the publish service
///
/// One closed taxonomy shared by both API surfaces. Validation carries every
/// violation found; internal failures are logged with full detail and never
/// leak it to the caller.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

/// Result type for publish-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// A single field-level validation violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input fields; carries all violations at once
    #[error("Validation failed, entered data is incorrect.")]
    Validation(Vec<FieldError>),

    /// Missing/invalid/expired token, or bad login credentials. Kept generic
    /// on purpose so login failures never reveal which part was wrong.
    #[error("Not authenticated.")]
    Unauthenticated,

    /// Authenticated but not the resource owner
    #[error("Not authorized.")]
    Forbidden,

    /// Referenced entity does not exist
    #[error("{0} not found.")]
    NotFound(String),

    /// Duplicate unique field
    #[error("{0}")]
    Conflict(String),

    /// Store operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message safe to put on the wire. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "Internal server error.".to_string(),
            other => other.to_string(),
        }
    }

    fn code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.code()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }

        let mut body = serde_json::json!({
            "message": self.public_message(),
            "code": status.as_u16(),
        });
        if let AppError::Validation(errors) = self {
            body["errors"] = serde_json::json!(errors);
        }

        HttpResponse::build(status).json(body)
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        if self.code() == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("graphql request failed: {}", self);
        }

        async_graphql::Error::new(self.public_message()).extend_with(|_, e| {
            e.set("code", self.code().as_u16() as i32);
            if let AppError::Validation(errors) = self {
                if let Ok(data) = async_graphql::Value::from_json(serde_json::json!(errors)) {
                    e.set("data", data);
                }
            }
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("database error: {}", err);
        AppError::Database(err.to_string())
    }
}
