//! Authentication and account workflows.
//!
//! Covers signup with email verification, login, account reads, password
//! changes, permanent soft-deletion, and profile maintenance. Passwords are
//! hashed with Argon2id; bearer tokens come from [`super::TokenService`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use palengke_core::{Email, Role, UserId};

use crate::db::{RepositoryError, Store};
use crate::models::User;
use crate::services::email::{Mailer, notify};
use crate::services::token::TokenService;

/// Validated input for a profile update. Every field is required by the
/// route; the business name only when the role implies selling.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
    pub address: String,
    pub role: Role,
    pub business_name: Option<String>,
}

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a dyn Store,
    mailer: &'a dyn Mailer,
    tokens: &'a TokenService,
    frontend_url: &'a str,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        store: &'a dyn Store,
        mailer: &'a dyn Mailer,
        tokens: &'a TokenService,
        frontend_url: &'a str,
    ) -> Self {
        Self {
            store,
            mailer,
            tokens,
            frontend_url,
        }
    }

    /// Register a new user and send the verification emails.
    ///
    /// Returns the created user together with the verification token (the
    /// signup response exposes it).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        // A soft-deleted account still occupies its email.
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let verification_token = self.tokens.issue_email_token(&email)?;

        let user = User::new(email, password_hash, verification_token.clone());
        let user = self.store.create_user(user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        let verification_url = format!(
            "{}/auth/verify-email?token={verification_token}",
            self.frontend_url
        );
        notify(
            self.mailer,
            user.email.as_str(),
            "Email Verification",
            &format!("Please verify your email by clicking this link: {verification_url}"),
        )
        .await;
        notify(
            self.mailer,
            user.email.as_str(),
            "Registration Successful",
            &format!(
                "Thank you for registering, {}. Please verify your email.",
                user.email
            ),
        )
        .await;

        Ok((user, verification_token))
    }

    /// Verify an email address. The flag flips exactly once.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidVerificationToken` if the token is bad,
    /// expired, or doesn't match a user.
    /// Returns `AuthError::AlreadyVerified` on a second verification.
    pub async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let email = self.tokens.verify_email_token(token)?;
        let email = Email::parse(&email).map_err(|_| AuthError::InvalidVerificationToken)?;

        let mut user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidVerificationToken)?;

        if user.is_email_verified {
            return Err(AuthError::AlreadyVerified);
        }

        user.is_email_verified = true;
        user.email_verification_token = None;
        self.store.update_user(&user).await?;

        Ok(())
    }

    /// Login with email and password, returning the user and a one-hour
    /// bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for unknown or soft-deleted
    /// users and wrong passwords.
    /// Returns `AuthError::EmailNotVerified` before verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        verify_password(password, &user.password_hash)?;

        let token = self.tokens.issue_login_token(user.id)?;
        Ok((user, token))
    }

    /// Get a non-deleted user's account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if absent or soft-deleted.
    pub async fn account(&self, user_id: UserId) -> Result<User, AuthError> {
        self.store
            .find_user(user_id)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or(AuthError::UserNotFound)
    }

    /// Soft-delete an account. Permanent: there is no restore path.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn delete_account(&self, user_id: UserId) -> Result<(), AuthError> {
        let mut user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        user.is_deleted = true;
        self.store.update_user(&user).await?;

        notify(
            self.mailer,
            user.email.as_str(),
            "Account Deletion",
            &format!(
                "Dear {}, your account has been successfully deleted. \
                 If this was not intended, please contact support.",
                user.email
            ),
        )
        .await;

        Ok(())
    }

    /// Change a user's password after re-checking the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the new password fails policy.
    /// Returns `AuthError::WrongCurrentPassword` if the current password
    /// doesn't match.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let mut user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(current_password, &user.password_hash)
            .map_err(|_| AuthError::WrongCurrentPassword)?;

        user.password_hash = hash_password(new_password)?;
        self.store.update_user(&user).await?;

        Ok(())
    }

    /// Get a non-deleted user's profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if absent or soft-deleted.
    pub async fn profile(&self, user_id: UserId) -> Result<User, AuthError> {
        self.account(user_id).await
    }

    /// Replace a user's profile fields and notify them.
    ///
    /// The business name is kept only for selling roles; switching back to
    /// a plain buyer clears it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidProfile` when a selling role comes
    /// without a business name.
    /// Returns `AuthError::UserNotFound` if absent or soft-deleted.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, AuthError> {
        let business_name = if update.role.requires_business_name() {
            match update.business_name.filter(|b| !b.is_empty()) {
                Some(name) => Some(name),
                None => {
                    return Err(AuthError::InvalidProfile(
                        "Business name is required for sellers".to_string(),
                    ));
                }
            }
        } else {
            None
        };

        let mut user = self
            .store
            .find_user(user_id)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or(AuthError::UserNotFound)?;

        user.first_name = Some(update.first_name);
        user.last_name = Some(update.last_name);
        user.contact_number = Some(update.contact_number);
        user.address = Some(update.address);
        user.role = Some(update.role);
        user.business_name = business_name;
        self.store.update_user(&user).await?;

        notify(
            self.mailer,
            user.email.as_str(),
            "User Info Updated",
            "Your user information has been successfully updated.",
        )
        .await;

        Ok(user)
    }
}

/// Validate password meets requirements: at least 8 characters including
/// one uppercase and one lowercase letter.
fn validate_password(password: &str) -> Result<(), AuthError> {
    let long_enough = password.len() >= 8;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());

    if long_enough && has_lower && has_upper {
        Ok(())
    } else {
        Err(AuthError::WeakPassword(
            "Password must be 8 or more characters and include uppercase and lowercase".to_string(),
        ))
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_policy() {
        assert!(validate_password("Sh0rtPw").is_err()); // 7 chars
        assert!(validate_password("alllowercase").is_err());
        assert!(validate_password("ALLUPPERCASE").is_err());
        assert!(validate_password("MixedCasePassword").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("MixedCasePassword").expect("hashing succeeds");
        assert!(verify_password("MixedCasePassword", &hash).is_ok());
        assert!(verify_password("WrongPassword1", &hash).is_err());
    }
}
