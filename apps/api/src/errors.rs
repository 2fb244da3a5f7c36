use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("An account with this email already exists")]
    DuplicateEmail,

    /// Deliberately covers both "no such account" and "wrong password".
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store error: {0}")]
    Session(#[from] redis::RedisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Underlying error text attached to 5xx responses.
/// Only surfaced to callers when `expose_error_detail` is installed.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                tracing::info!("Rejected request: {msg}");
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::DuplicateEmail => {
                tracing::info!("Rejected registration: email already registered");
                (StatusCode::BAD_REQUEST, "DUPLICATE_EMAIL", self.to_string())
            }
            AppError::InvalidCredentials => {
                tracing::info!("Rejected login: invalid credentials");
                (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    self.to_string(),
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "The service is temporarily unavailable".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                let status = match e {
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Session(e) => {
                tracing::error!("Session store error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SESSION_STORE_ERROR",
                    "The session store is unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut response = (status, error_body(code, &message)).into_response();
        if status.is_server_error() {
            response.extensions_mut().insert(ErrorDetail {
                code,
                detail: self.to_string(),
            });
        }
        response
    }
}

fn error_body(code: &str, message: &str) -> Json<serde_json::Value> {
    Json(json!({
        "error": {
            "code": code,
            "message": message
        }
    }))
}

/// Development-only middleware: swaps the generic 5xx message for the real error text.
pub async fn expose_error_detail(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    match response.extensions().get::<ErrorDetail>().cloned() {
        Some(ErrorDetail { code, detail }) => {
            (response.status(), error_body(code, &detail)).into_response()
        }
        None => response,
    }
}
