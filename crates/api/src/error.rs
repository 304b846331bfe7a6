//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Failures map onto a fixed taxonomy: invalid input 400, missing/invalid
//! token 401, unverified email 403, missing entity 404, duplicate email or
//! password mismatch 400, insufficient stock 400, everything else 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found (absent or soft-deleted).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflicting request (duplicate email, password mismatch).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stock check failed before a quantity decrement.
    #[error("Insufficient quantity")]
    InsufficientQuantity,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_))
            || matches!(
                self,
                Self::Auth(
                    AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_)
                )
            )
        {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::EmailNotVerified => StatusCode::FORBIDDEN,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Conflict(_) | Self::InsufficientQuantity => {
                StatusCode::BAD_REQUEST
            }
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Please provide a valid email".to_string(),
                AuthError::WeakPassword(msg) | AuthError::InvalidProfile(msg) => msg.clone(),
                AuthError::PasswordMismatch => "Passwords do not match".to_string(),
                AuthError::UserAlreadyExists => "User already exists".to_string(),
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::EmailNotVerified => "Please verify your email first".to_string(),
                AuthError::MissingToken => "No token, authorization denied".to_string(),
                AuthError::InvalidToken => "Token is not valid".to_string(),
                AuthError::InvalidVerificationToken => "Invalid or expired token".to_string(),
                AuthError::AlreadyVerified => "Email already verified".to_string(),
                AuthError::WrongCurrentPassword => "Current password is incorrect".to_string(),
                AuthError::UserNotFound => "User not found".to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Token(_) => {
                    "Server error".to_string()
                }
            },
            Self::InsufficientQuantity => "Insufficient quantity".to_string(),
            Self::Validation(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg.clone(),
        };

        (status, Json(json!({ "msg": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found");

        let err = AppError::Validation("invalid input".to_string());
        assert_eq!(err.to_string(), "Validation error: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::InsufficientQuantity),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::MissingToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::EmailNotVerified)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserNotFound)),
            StatusCode::NOT_FOUND
        );
    }
}
