//! Shared helpers for integration tests.
//!
//! Tests run against the in-memory store and recording mailer injected
//! through the same [`AppState`] constructor production uses.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use palengke_api::config::{ApiConfig, SmtpConfig};
use palengke_api::db::MemoryStore;
use palengke_api::services::email::RecordingMailer;
use palengke_api::services::token::TokenService;
use palengke_api::state::AppState;

/// A config pointing at nothing real; the store and mailer are injected.
pub fn test_config() -> ApiConfig {
    ApiConfig {
        database_url: SecretString::from("postgres://unused/test"),
        host: "127.0.0.1".parse().expect("valid host"),
        port: 5000,
        frontend_url: "http://localhost:5000".to_string(),
        jwt_secret: SecretString::from("k9#mQ2$vX7!pL4&wZ8*rT1^nB5@cF3%"),
        jwt_email_secret: SecretString::from("j8!nR3%wY6#qM1$xA9&uS4*oD7^eG2@"),
        smtp: SmtpConfig {
            host: "smtp.invalid".to_string(),
            port: 587,
            username: "unused".to_string(),
            password: SecretString::from("unused"),
            from_address: "noreply@palengke.test".to_string(),
        },
        upload_dir: PathBuf::from("uploads"),
        sentry_dsn: None,
    }
}

/// Token service built from the test config's secrets.
pub fn test_tokens() -> TokenService {
    let config = test_config();
    TokenService::new(&config.jwt_secret, &config.jwt_email_secret)
}

/// App state over an in-memory store and recording mailer, returned
/// alongside the backends for seeding and assertions.
pub fn test_state() -> (AppState, Arc<MemoryStore>, Arc<RecordingMailer>) {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let state = AppState::new(test_config(), store.clone(), mailer.clone());
    (state, store, mailer)
}
