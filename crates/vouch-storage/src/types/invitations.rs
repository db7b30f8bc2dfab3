//! Invitation types.

use chrono::{DateTime, Utc};

use super::{InvitationId, RequesterId};

/// Stored lifecycle state of an invitation.
///
/// `Pending → Completed` is the only stored transition. "Expired" is a
/// read-time projection of `Pending` past `expires_at` and is never
/// written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvitationStatus {
    Pending,
    Completed,
}

impl InvitationStatus {
    /// Column value used by SQL backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Completed => "completed",
        }
    }
}

/// Invitation record.
///
/// The token is the sole credential for viewing or submitting against the
/// invitation; it is unique across all invitations for the lifetime of the
/// system (backends enforce this with a unique constraint on insert).
#[derive(Clone, Debug)]
pub struct Invitation {
    pub id: InvitationId,
    pub token: String,
    pub requester_id: RequesterId,
    pub referee_email: String,
    pub referee_name: String,
    /// Requester address for the completion notice, if they asked for one.
    pub notify_email: Option<String>,
    /// Opaque context attached by the requester (e.g. who is being
    /// evaluated). Read-only to the referee flow.
    pub metadata: serde_json::Value,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set exactly once, at the moment of successful submission.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Parameters for creating an invitation.
#[derive(Clone, Debug)]
pub struct CreateInvitationParams {
    pub token: String,
    pub requester_id: RequesterId,
    pub referee_email: String,
    pub referee_name: String,
    pub notify_email: Option<String>,
    pub metadata: serde_json::Value,
    pub expires_at: DateTime<Utc>,
}
