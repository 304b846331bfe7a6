//! Bearer-token authentication extractor.
//!
//! Protected handlers take [`AuthUser`] as an argument; the extractor pulls
//! the `Authorization: Bearer <token>` header, verifies the JWT and yields
//! the actor's user ID. There is no session state - the token is the whole
//! authentication check.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use palengke_core::UserId;

use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Extractor that requires a valid login bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     AuthUser(user_id): AuthUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {user_id}!")
/// }
/// ```
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingToken)?;

        let user_id = state.tokens().verify_login_token(token)?;

        Ok(Self(user_id))
    }
}
