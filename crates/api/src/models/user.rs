//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use palengke_core::{Email, Role, UserId};

/// A marketplace user (domain type).
///
/// Deliberately not `Serialize`: the password hash must never reach a
/// response body. Handlers convert to [`UserView`] or [`ProfileView`].
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique across the store).
    pub email: Email,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Soft-delete flag. Deletion is permanent; there is no restore path.
    pub is_deleted: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    /// Marketplace role. Unset until the profile is completed.
    pub role: Option<Role>,
    /// Required whenever the role implies selling.
    pub business_name: Option<String>,
    /// Whether the email has been verified. Flips exactly once.
    pub is_email_verified: bool,
    /// Pending verification token, cleared on verification.
    pub email_verification_token: Option<String>,
    /// When the user registered.
    pub registration_date: DateTime<Utc>,
}

impl User {
    /// Create a fresh, unverified user at signup.
    #[must_use]
    pub fn new(email: Email, password_hash: String, verification_token: String) -> Self {
        Self {
            id: UserId::generate(),
            email,
            password_hash,
            is_deleted: false,
            first_name: None,
            last_name: None,
            contact_number: None,
            address: None,
            role: None,
            business_name: None,
            is_email_verified: false,
            email_verification_token: Some(verification_token),
            registration_date: Utc::now(),
        }
    }
}

/// Account view returned by `GET /auth/account` (password omitted).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: Email,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    pub is_email_verified: bool,
    pub registration_date: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_deleted: user.is_deleted,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            contact_number: user.contact_number.clone(),
            address: user.address.clone(),
            role: user.role,
            business_name: user.business_name.clone(),
            is_email_verified: user.is_email_verified,
            registration_date: user.registration_date,
        }
    }
}

/// Profile subset returned by `GET /userinfo`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            contact_number: user.contact_number.clone(),
            address: user.address.clone(),
            role: user.role,
            business_name: user.business_name.clone(),
        }
    }
}
