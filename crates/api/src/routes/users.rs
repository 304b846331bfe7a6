//! Profile route handlers (`/userinfo`).

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use palengke_core::Role;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::ProfileView;
use crate::services::AuthService;
use crate::services::auth::ProfileUpdate;
use crate::state::AppState;

/// Profile update request body. Everything is optional at the serde layer
/// so missing fields produce the API's own validation messages instead of
/// a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
    pub business_name: Option<String>,
}

fn required(value: Option<String>, message: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Get the authenticated user's profile subset.
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(
        state.store(),
        state.mailer(),
        state.tokens(),
        &state.config().frontend_url,
    )
    .profile(user_id)
    .await?;

    Ok(Json(ProfileView::from(&user)))
}

/// Replace the authenticated user's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(form): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    let role: Role = required(form.role, "Invalid role")?
        .parse()
        .map_err(|_| AppError::Validation("Invalid role".to_string()))?;

    let update = ProfileUpdate {
        first_name: required(form.first_name, "First name is required")?,
        last_name: required(form.last_name, "Last name is required")?,
        contact_number: required(form.contact_number, "Contact number is required")?,
        address: required(form.address, "Address is required")?,
        role,
        business_name: form.business_name,
    };

    AuthService::new(
        state.store(),
        state.mailer(),
        state.tokens(),
        &state.config().frontend_url,
    )
    .update_profile(user_id, update)
    .await?;

    Ok(Json(json!({
        "msg": "User info updated successfully",
        "redirectTo": "/account",
    })))
}
