//! Reference record types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{InvitationId, ReferenceId, RequesterId};

/// The durable artifact produced by a completed invitation. Immutable
/// after insert.
#[derive(Clone, Debug)]
pub struct Reference {
    pub id: ReferenceId,
    pub owner_id: RequesterId,
    pub referee_name: String,
    pub referee_email: String,
    pub relationship: String,
    /// Aggregated score, one decimal place.
    pub overall_rating: f64,
    /// Per-criterion values exactly as submitted.
    pub ratings: BTreeMap<String, f64>,
    /// Free-text fields supplied by the referee.
    pub feedback: BTreeMap<String, String>,
    /// Back-reference to the invitation that produced this record
    /// (lookup only, not an ownership relation).
    pub invitation_id: InvitationId,
    pub created_at: DateTime<Utc>,
}

/// Parameters for persisting a reference.
#[derive(Clone, Debug)]
pub struct CreateReferenceParams {
    pub owner_id: RequesterId,
    pub referee_name: String,
    pub referee_email: String,
    pub relationship: String,
    pub overall_rating: f64,
    pub ratings: BTreeMap<String, f64>,
    pub feedback: BTreeMap<String, String>,
    pub invitation_id: InvitationId,
}
