//! JWT issuance and verification.
//!
//! Two token families with separate secrets: short-lived login tokens
//! carrying the user ID in `sub`, and day-long email verification tokens
//! carrying the address being verified.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use palengke_core::{Email, UserId};

use super::auth::AuthError;

/// Login tokens expire after one hour.
const LOGIN_TOKEN_TTL_HOURS: i64 = 1;
/// Email verification tokens expire after one day.
const EMAIL_TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by a login bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct LoginClaims {
    /// The authenticated user's ID.
    #[serde(rename = "userId")]
    user_id: String,
    /// Expiration time as UTC timestamp.
    exp: usize,
}

/// Claims carried by an email verification token.
#[derive(Debug, Serialize, Deserialize)]
struct EmailClaims {
    email: String,
    exp: usize,
}

/// Mints and verifies the API's bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    login_encoding: EncodingKey,
    login_decoding: DecodingKey,
    email_encoding: EncodingKey,
    email_decoding: DecodingKey,
}

impl TokenService {
    /// Build a token service from the two signing secrets.
    #[must_use]
    pub fn new(jwt_secret: &SecretString, jwt_email_secret: &SecretString) -> Self {
        let login = jwt_secret.expose_secret().as_bytes();
        let email = jwt_email_secret.expose_secret().as_bytes();

        Self {
            login_encoding: EncodingKey::from_secret(login),
            login_decoding: DecodingKey::from_secret(login),
            email_encoding: EncodingKey::from_secret(email),
            email_decoding: DecodingKey::from_secret(email),
        }
    }

    /// Issue a one-hour login token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue_login_token(&self, user_id: UserId) -> Result<String, AuthError> {
        let claims = LoginClaims {
            user_id: user_id.to_string(),
            exp: expiry_timestamp(LOGIN_TOKEN_TTL_HOURS),
        };
        Ok(encode(&Header::default(), &claims, &self.login_encoding)?)
    }

    /// Verify a login bearer token, returning the authenticated user ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is malformed, has a
    /// bad signature, or has expired.
    pub fn verify_login_token(&self, token: &str) -> Result<UserId, AuthError> {
        let data = decode::<LoginClaims>(token, &self.login_decoding, &Validation::default())
            .map_err(|_| AuthError::InvalidToken)?;

        data.claims
            .user_id
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Issue a one-day email verification token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue_email_token(&self, email: &Email) -> Result<String, AuthError> {
        let claims = EmailClaims {
            email: email.as_str().to_owned(),
            exp: expiry_timestamp(EMAIL_TOKEN_TTL_HOURS),
        };
        Ok(encode(&Header::default(), &claims, &self.email_encoding)?)
    }

    /// Verify an email verification token, returning the address it was
    /// minted for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidVerificationToken` if the token is
    /// malformed, has a bad signature, or has expired.
    pub fn verify_email_token(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<EmailClaims>(token, &self.email_decoding, &Validation::default())
            .map_err(|_| AuthError::InvalidVerificationToken)?;

        Ok(data.claims.email)
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn expiry_timestamp(ttl_hours: i64) -> usize {
    (Utc::now() + Duration::hours(ttl_hours)).timestamp() as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            &SecretString::from("k9#mQ2$vX7!pL4&wZ8*rT1^nB5@cF3%"),
            &SecretString::from("j8!nR3%wY6#qM1$xA9&uS4*oD7^eG2@"),
        )
    }

    #[test]
    fn test_login_token_roundtrip() {
        let tokens = service();
        let user_id = UserId::generate();

        let token = tokens.issue_login_token(user_id).unwrap();
        let verified = tokens.verify_login_token(&token).unwrap();

        assert_eq!(verified, user_id);
    }

    #[test]
    fn test_email_token_roundtrip() {
        let tokens = service();
        let email = Email::parse("user@example.com").unwrap();

        let token = tokens.issue_email_token(&email).unwrap();
        let verified = tokens.verify_email_token(&token).unwrap();

        assert_eq!(verified, "user@example.com");
    }

    #[test]
    fn test_token_families_are_not_interchangeable() {
        let tokens = service();
        let email = Email::parse("user@example.com").unwrap();
        let email_token = tokens.issue_email_token(&email).unwrap();

        // An email token must not authenticate as a login token.
        assert!(matches!(
            tokens.verify_login_token(&email_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = service();
        assert!(matches!(
            tokens.verify_login_token("not.a.jwt"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            tokens.verify_email_token("not.a.jwt"),
            Err(AuthError::InvalidVerificationToken)
        ));
    }
}
