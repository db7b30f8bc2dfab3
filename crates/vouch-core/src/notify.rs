//! Outbound notification contract.
//!
//! The lifecycle service only knows this trait; concrete delivery (SMTP,
//! logging) lives with the caller. Dispatch is best-effort by design: the
//! service spawns it off the request path and a failure can never fail a
//! submission.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

/// Notification dispatch error.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
}

/// Outbound message, matched to a template by the dispatcher.
#[derive(Clone, Debug)]
pub enum Notification {
    /// Sent to the referee when an invitation is created.
    InvitationIssued {
        referee_name: String,
        share_link: String,
        expires_at: DateTime<Utc>,
    },
    /// Sent to the requester when the reference comes back.
    ReferenceCompleted {
        referee_name: String,
        overall_rating: f64,
    },
}

/// Trait for notification dispatchers.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver a notification to `recipient`.
    async fn send(&self, recipient: &str, notification: Notification) -> Result<(), NotifyError>;
}

/// Dispatcher that only writes log lines. Used when no email provider is
/// configured, and as the default in tests.
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn send(&self, recipient: &str, notification: Notification) -> Result<(), NotifyError> {
        match notification {
            Notification::InvitationIssued { share_link, .. } => {
                info!(recipient, %share_link, "invitation issued (email disabled)");
            }
            Notification::ReferenceCompleted { overall_rating, .. } => {
                info!(recipient, overall_rating, "reference completed (email disabled)");
            }
        }
        Ok(())
    }
}
