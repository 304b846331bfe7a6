//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] palengke_core::EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password and confirmation don't match at signup.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Invalid credentials (wrong password, unknown or deleted user).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Login attempted before the email was verified.
    #[error("email not verified")]
    EmailNotVerified,

    /// No bearer token on a protected route.
    #[error("missing bearer token")]
    MissingToken,

    /// Bearer token malformed, mis-signed or expired.
    #[error("invalid bearer token")]
    InvalidToken,

    /// Email verification token malformed, mis-signed, expired, or not
    /// matching any user.
    #[error("invalid verification token")]
    InvalidVerificationToken,

    /// Email verification attempted twice.
    #[error("email already verified")]
    AlreadyVerified,

    /// Wrong current password on a password change.
    #[error("current password is incorrect")]
    WrongCurrentPassword,

    /// User not found (or soft-deleted).
    #[error("user not found")]
    UserNotFound,

    /// Profile update violated a field requirement.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
