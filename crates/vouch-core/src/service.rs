//! The invitation lifecycle service.
//!
//! Sole authority for creating invitations and transitioning them. The
//! token is the only authorization artifact (there is no referee account),
//! so "transition the invitation" is the single point of truth for
//! authorization-to-submit: the conditional update in the store decides the
//! winner under concurrent submissions, never an application-level
//! check-then-act.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use vouch_storage::{
    CreateInvitationParams, CreateReferenceParams, Invitation, InvitationStatus, Reference,
    RequesterId, Store, StoreError,
};

use crate::notify::{Notification, NotificationDispatcher};
use crate::{rating, token, validation, ServiceError};

/// Invitations are valid for 30 days from creation.
pub const INVITATION_TTL_DAYS: i64 = 30;

/// Bound on a single best-effort notification dispatch. After this the
/// attempt is abandoned and logged, never retried inline.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Input for creating an invitation.
#[derive(Clone, Debug)]
pub struct CreateInvitation {
    pub requester_id: String,
    pub referee_email: String,
    pub referee_name: String,
    /// Requester address for the completion notice, if wanted.
    pub notify_email: Option<String>,
    /// Opaque context shown to the referee (e.g. who is being evaluated).
    pub metadata: serde_json::Value,
}

/// A freshly created invitation plus the link to hand to the referee.
#[derive(Clone, Debug)]
pub struct CreatedInvitation {
    pub invitation: Invitation,
    pub share_link: String,
}

/// What a token resolves to, as shown to the referee.
///
/// Deliberately excludes anything that would let a second submission be
/// fabricated: no rating inputs are ever re-exposed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InvitationView {
    pub status: ViewStatus,
    pub referee_name: String,
    pub referee_email: String,
    pub metadata: serde_json::Value,
    pub expires_at: DateTime<Utc>,
}

/// Read-time status. `Expired` is derived from a pending invitation past
/// its expiry; it is never written back to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    Pending,
    Completed,
    Expired,
}

impl ViewStatus {
    /// Project an invitation's stored status to its read-time status.
    /// Every read path goes through this so reads stay consistent.
    pub fn of(invitation: &Invitation, now: DateTime<Utc>) -> Self {
        match invitation.status {
            InvitationStatus::Completed => ViewStatus::Completed,
            InvitationStatus::Pending if now > invitation.expires_at => ViewStatus::Expired,
            InvitationStatus::Pending => ViewStatus::Pending,
        }
    }
}

/// The referee's answers.
#[derive(Clone, Debug)]
pub struct ReferenceSubmission {
    pub relationship: String,
    pub ratings: BTreeMap<String, f64>,
    pub feedback: BTreeMap<String, String>,
}

/// Lifecycle manager over an injected store and notification dispatcher.
///
/// Holds no invitation state between calls; every operation reads through
/// the store so the conditional-update guarantee is never defeated by a
/// stale cache.
pub struct ReferenceService<S> {
    store: Arc<S>,
    notifier: Arc<dyn NotificationDispatcher>,
    public_base_url: String,
}

impl<S: Store + 'static> ReferenceService<S> {
    pub fn new(
        store: Arc<S>,
        notifier: Arc<dyn NotificationDispatcher>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            public_base_url: public_base_url.into(),
        }
    }

    /// Create a pending invitation for a referee.
    pub async fn create_invitation(
        &self,
        input: CreateInvitation,
    ) -> Result<CreatedInvitation, ServiceError> {
        validation::require_non_empty("requester_id", &input.requester_id)?;
        validation::require_non_empty("referee_name", &input.referee_name)?;
        validation::require_email("referee_email", &input.referee_email)?;
        if let Some(ref notify_email) = input.notify_email {
            validation::require_email("notify_email", notify_email)?;
        }

        let token = token::issue_token();
        let invitation = self
            .store
            .create_invitation(&CreateInvitationParams {
                token,
                requester_id: RequesterId(input.requester_id),
                referee_email: input.referee_email,
                referee_name: input.referee_name,
                notify_email: input.notify_email,
                metadata: input.metadata,
                expires_at: Utc::now() + chrono::Duration::days(INVITATION_TTL_DAYS),
            })
            .await?;

        let share_link = self.share_link(&invitation.token);
        self.notify_best_effort(
            invitation.referee_email.clone(),
            Notification::InvitationIssued {
                referee_name: invitation.referee_name.clone(),
                share_link: share_link.clone(),
                expires_at: invitation.expires_at,
            },
        );

        Ok(CreatedInvitation {
            invitation,
            share_link,
        })
    }

    /// Resolve a token to a referee-facing view. Read-only and idempotent.
    pub async fn invitation_view(&self, token: &str) -> Result<InvitationView, ServiceError> {
        let invitation = self.find_by_token(token).await?;
        Ok(InvitationView {
            status: ViewStatus::of(&invitation, Utc::now()),
            referee_name: invitation.referee_name,
            referee_email: invitation.referee_email,
            metadata: invitation.metadata,
            expires_at: invitation.expires_at,
        })
    }

    /// Accept a referee's submission and turn it into a permanent
    /// reference record.
    ///
    /// Exactly-once per token: the store's conditional completion is the
    /// arbiter, and the losing concurrent caller gets `AlreadyCompleted`.
    pub async fn submit_reference(
        &self,
        token: &str,
        submission: ReferenceSubmission,
    ) -> Result<Reference, ServiceError> {
        let invitation = self.find_by_token(token).await?;

        if invitation.status == InvitationStatus::Completed {
            return Err(ServiceError::AlreadyCompleted);
        }
        let now = Utc::now();
        if now > invitation.expires_at {
            return Err(ServiceError::Expired(invitation.expires_at));
        }

        validation::require_non_empty("relationship", &submission.relationship)?;
        validation::validate_ratings(&submission.ratings)?;

        let overall_rating = rating::aggregate(&submission.ratings);

        // The transition itself decides the winner; a second submission of
        // the same token loses here with Conflict regardless of what the
        // earlier read saw.
        match self.store.complete_invitation(&invitation.id, now).await {
            Ok(()) => {}
            Err(StoreError::Conflict) => return Err(ServiceError::AlreadyCompleted),
            Err(StoreError::NotFound) => return Err(ServiceError::NotFound),
            Err(e) => return Err(ServiceError::Store(e)),
        }

        let reference = self
            .store
            .create_reference(&CreateReferenceParams {
                owner_id: invitation.requester_id.clone(),
                referee_name: invitation.referee_name.clone(),
                referee_email: invitation.referee_email.clone(),
                relationship: submission.relationship,
                overall_rating,
                ratings: submission.ratings,
                feedback: submission.feedback,
                invitation_id: invitation.id.clone(),
            })
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists => ServiceError::AlreadyCompleted,
                other => ServiceError::Store(other),
            })?;

        if let Some(notify_email) = invitation.notify_email {
            self.notify_best_effort(
                notify_email,
                Notification::ReferenceCompleted {
                    referee_name: reference.referee_name.clone(),
                    overall_rating: reference.overall_rating,
                },
            );
        }

        Ok(reference)
    }

    /// All invitations created by a requester, newest first.
    pub async fn invitations_for(
        &self,
        requester_id: &str,
    ) -> Result<Vec<Invitation>, ServiceError> {
        validation::require_non_empty("requester_id", requester_id)?;
        Ok(self
            .store
            .list_invitations(&RequesterId(requester_id.to_string()))
            .await?)
    }

    /// All references owned by a requester, newest first.
    pub async fn references_for(&self, owner_id: &str) -> Result<Vec<Reference>, ServiceError> {
        validation::require_non_empty("owner_id", owner_id)?;
        Ok(self
            .store
            .list_references(&RequesterId(owner_id.to_string()))
            .await?)
    }

    async fn find_by_token(&self, token: &str) -> Result<Invitation, ServiceError> {
        match self.store.get_invitation_by_token(token).await {
            Ok(invitation) => Ok(invitation),
            Err(StoreError::NotFound) => Err(ServiceError::NotFound),
            Err(e) => Err(ServiceError::Store(e)),
        }
    }

    fn share_link(&self, token: &str) -> String {
        format!(
            "{}/reference?token={}",
            self.public_base_url.trim_end_matches('/'),
            token
        )
    }

    /// Fire-and-forget dispatch off the request path. Failures and
    /// timeouts are logged and never reach the caller.
    fn notify_best_effort(&self, recipient: String, notification: Notification) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            match tokio::time::timeout(NOTIFY_TIMEOUT, notifier.send(&recipient, notification))
                .await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(%recipient, error = %e, "notification dispatch failed"),
                Err(_) => warn!(%recipient, "notification dispatch timed out"),
            }
        });
    }
}
