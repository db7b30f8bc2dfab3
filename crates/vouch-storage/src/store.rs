//! The Store trait that backends implement.

use chrono::{DateTime, Utc};

use crate::types::*;
use crate::StoreError;

/// The storage trait `vouch-core` depends on.
///
/// Invitations are never deleted; they are retained for audit. The only
/// mutation a backend must support is the conditional pending→completed
/// transition, and it must be atomic against concurrent callers.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────── Invitations ───────────────────────────────

    /// Insert a new pending invitation (returns the stored record with its
    /// generated ID). Fails with `AlreadyExists` if the token is already
    /// taken; token uniqueness is enforced here, not by the issuer.
    async fn create_invitation(
        &self,
        params: &CreateInvitationParams,
    ) -> Result<Invitation, StoreError>;

    /// Get invitation by token.
    async fn get_invitation_by_token(&self, token: &str) -> Result<Invitation, StoreError>;

    /// List all invitations created by a requester, newest first.
    async fn list_invitations(
        &self,
        requester_id: &RequesterId,
    ) -> Result<Vec<Invitation>, StoreError>;

    /// Atomically transition an invitation from pending to completed,
    /// stamping `completed_at`.
    ///
    /// This is a compare-and-set: if the invitation is no longer pending
    /// the call fails with `Conflict` and nothing is written. Callers must
    /// not check status first and then call this; the conditional update
    /// is the exactly-once enforcement point.
    async fn complete_invitation(
        &self,
        invitation_id: &InvitationId,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    // ─────────────────────────────── References ────────────────────────────────

    /// Persist a completed reference (returns the stored record with its
    /// generated ID).
    async fn create_reference(
        &self,
        params: &CreateReferenceParams,
    ) -> Result<Reference, StoreError>;

    /// Get a reference by ID.
    async fn get_reference(&self, reference_id: &ReferenceId) -> Result<Reference, StoreError>;

    /// List all references owned by a requester, newest first.
    async fn list_references(
        &self,
        owner_id: &RequesterId,
    ) -> Result<Vec<Reference>, StoreError>;
}
