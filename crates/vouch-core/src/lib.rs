//! Core protocol for soliciting structured professional references.
//!
//! A requester creates an invitation carrying a single-use, expiring token;
//! the referee presents that token to view the invitation and submit
//! ratings, which become a permanent reference record. This crate owns the
//! invitation lifecycle and submission-integrity rules; storage and
//! outbound email are injected collaborators.

pub mod notify;
pub mod rating;
pub mod service;
pub mod token;
pub mod validation;

pub use notify::{LogDispatcher, Notification, NotificationDispatcher, NotifyError};
pub use service::{
    CreateInvitation, CreatedInvitation, InvitationView, ReferenceService, ReferenceSubmission,
    ViewStatus,
};

use chrono::{DateTime, Utc};
use thiserror::Error;
use vouch_storage::StoreError;

/// Errors surfaced by the lifecycle operations.
///
/// Every variant is distinguishable by the caller: a referee should see
/// "never existed", "expired", and "already used" as different outcomes.
/// `Store` covers durable-store failures; the whole operation is safe to
/// retry because nothing partial was committed.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("no invitation matches this token")]
    NotFound,

    #[error("invitation expired at {0}")]
    Expired(DateTime<Utc>),

    #[error("invitation already completed")]
    AlreadyCompleted,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
