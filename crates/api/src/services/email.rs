//! Outbound email notifications.
//!
//! Workflows depend on the [`Mailer`] port, not a concrete transport:
//! production wires in [`SmtpMailer`] (lettre over SMTP), tests use
//! [`RecordingMailer`]. Sends are awaited inline before the workflow
//! responds, but a failed send is logged and swallowed - notifications
//! never fail the enclosing operation.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SmtpConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Port for outbound notification delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the message cannot be built or delivered.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

/// Send a notification, swallowing (but logging) any failure.
///
/// The response waits on this call, so delivery is synchronous with the
/// workflow; it just cannot fail it.
pub(crate) async fn notify(mailer: &dyn Mailer, to: &str, subject: &str, body: &str) {
    match mailer.send(to, subject, body).await {
        Ok(()) => tracing::info!(to = %to, subject = %subject, "Email sent successfully"),
        Err(e) => tracing::warn!(to = %to, subject = %subject, error = %e, "Email send failed"),
    }
}

/// SMTP-backed mailer for production.
#[derive(Clone)]
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// Create a mailer from SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay configuration is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.mailer.send(email).await?;
        Ok(())
    }
}

/// A sent email captured by [`RecordingMailer`].
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Test mailer that records every send instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: std::sync::Mutex<Vec<SentEmail>>,
}

impl RecordingMailer {
    /// Create an empty recording mailer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        #[allow(clippy::unwrap_used)]
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_mailer_captures_sends() {
        let mailer = RecordingMailer::new();
        mailer
            .send("user@example.com", "Hello", "Body text")
            .await
            .expect("recording send cannot fail");

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent.first().map(|e| e.to.as_str()), Some("user@example.com"));
    }

    #[tokio::test]
    async fn test_notify_swallows_failures() {
        struct FailingMailer;

        #[async_trait]
        impl Mailer for FailingMailer {
            async fn send(&self, to: &str, _: &str, _: &str) -> Result<(), EmailError> {
                Err(EmailError::InvalidAddress(to.to_string()))
            }
        }

        // Must not panic or propagate.
        notify(&FailingMailer, "broken", "subject", "body").await;
    }
}
