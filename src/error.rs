// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authorization header missing or malformed")]
    AuthMissing,

    #[error("Invalid authentication token")]
    AuthInvalid(String),

    #[error("Expired authentication token")]
    AuthExpired,

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                Some(msg.clone()),
            ),
            AppError::AuthMissing => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                Some("Authorization header missing or malformed".to_string()),
            ),
            AppError::AuthInvalid(msg) => {
                tracing::debug!(error = %msg, "Token verification rejected");
                (
                    StatusCode::UNAUTHORIZED,
                    "invalid_token",
                    Some("Invalid or expired authentication token".to_string()),
                )
            }
            AppError::AuthExpired => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                Some("Invalid or expired authentication token".to_string()),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                Some("You do not have permission to perform this action.".to_string()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg.clone())),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
