//! Email module for referee invitations and requester notifications.
//!
//! Providers implement [`EmailProvider`]; [`EmailDispatcher`] adapts a
//! provider to the core's `NotificationDispatcher` contract by rendering
//! the matching template.

#[cfg(feature = "email-smtp")]
mod smtp;
mod templates;

pub use templates::EmailContent;

use async_trait::async_trait;
use thiserror::Error;

use vouch_core::{Notification, NotificationDispatcher, NotifyError};

use crate::config::{EmailConfig, EmailProviderConfig};

/// Email sending error
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// Trait for email providers
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send a rendered email
    async fn send(
        &self,
        to: &str,
        content: &EmailContent,
        from_address: &str,
        from_name: Option<&str>,
    ) -> Result<(), EmailError>;
}

/// Create an email provider from configuration
pub fn create_provider(config: &EmailConfig) -> Result<Box<dyn EmailProvider>, EmailError> {
    match &config.provider {
        #[cfg(feature = "email-smtp")]
        EmailProviderConfig::Smtp {
            host,
            port,
            username,
            password,
            use_tls,
        } => {
            let provider = smtp::SmtpProvider::new(
                host.clone(),
                *port,
                username.clone(),
                password.clone(),
                *use_tls,
            )?;
            Ok(Box::new(provider))
        }
        #[cfg(not(feature = "email-smtp"))]
        EmailProviderConfig::Smtp { .. } => Err(EmailError::ProviderNotAvailable(
            "SMTP support not compiled in. Enable the 'email-smtp' feature.".to_string(),
        )),
    }
}

/// Adapts a provider to the core notification contract.
pub struct EmailDispatcher {
    provider: Box<dyn EmailProvider>,
    config: EmailConfig,
}

impl EmailDispatcher {
    pub fn new(provider: Box<dyn EmailProvider>, config: EmailConfig) -> Self {
        Self { provider, config }
    }
}

#[async_trait]
impl NotificationDispatcher for EmailDispatcher {
    async fn send(&self, recipient: &str, notification: Notification) -> Result<(), NotifyError> {
        let content = EmailContent::for_notification(&notification);
        self.provider
            .send(
                recipient,
                &content,
                &self.config.from_address,
                self.config.from_name.as_deref(),
            )
            .await
            .map_err(|e| NotifyError::SendFailed(e.to_string()))
    }
}
