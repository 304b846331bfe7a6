//! Authentication route handlers.
//!
//! Signup, email verification, login, account reads, password changes and
//! account deletion. All handlers delegate to
//! [`AuthService`](crate::services::AuthService).

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::UserView;
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Change-password request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Query parameters for email verification.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(
        state.store(),
        state.mailer(),
        state.tokens(),
        &state.config().frontend_url,
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user. Responds 201 with the verification token.
pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    let (_user, token) = auth_service(&state)
        .signup(&form.email, &form.password, &form.confirm_password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "msg": "User registered successfully, please verify your email",
            "redirectTo": "/login",
            "token": token,
        })),
    ))
}

/// Verify an email address from the emailed token link.
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<impl IntoResponse> {
    auth_service(&state).verify_email(&query.token).await?;

    Ok(Json(json!({ "msg": "Email verified successfully" })))
}

/// Login with email and password. Responds with a one-hour bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (user, token) = auth_service(&state)
        .login(&form.email, &form.password)
        .await?;

    Ok(Json(json!({
        "token": token,
        "redirectTo": "/userinfo",
        "user": { "email": user.email },
    })))
}

/// Logout. Bearer tokens are stateless, so this only confirms the request
/// was authenticated; the client discards the token.
pub async fn logout(AuthUser(_user_id): AuthUser) -> Result<impl IntoResponse> {
    Ok(Json(json!({ "msg": "Logout successful" })))
}

/// Get the authenticated user's account (password omitted).
pub async fn account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let user = auth_service(&state).account(user_id).await?;

    Ok(Json(UserView::from(&user)))
}

/// Soft-delete the authenticated user's account.
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    auth_service(&state).delete_account(user_id).await?;

    Ok(Json(json!({
        "msg": "User deleted successfully and email notification sent"
    })))
}

/// Change the authenticated user's password.
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(form): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    auth_service(&state)
        .change_password(user_id, &form.current_password, &form.new_password)
        .await?;

    Ok(Json(json!({ "msg": "Password updated successfully" })))
}
