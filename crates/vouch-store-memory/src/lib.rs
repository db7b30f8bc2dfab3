//! In-memory Store backend.
//!
//! Single-process, mutex-guarded maps. Suitable for tests and local
//! development; the conditional completion runs under the same lock as the
//! read, so it provides the same exactly-once guarantee as a SQL backend's
//! conditional UPDATE.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use vouch_storage::{
    CreateInvitationParams, CreateReferenceParams, Invitation, InvitationId, InvitationStatus,
    Reference, ReferenceId, RequesterId, Store, StoreError,
};

#[derive(Default)]
struct Inner {
    /// Invitations keyed by id; `token_index` maps token → id.
    invitations: HashMap<Uuid, Invitation>,
    token_index: HashMap<String, Uuid>,
    references: HashMap<Uuid, Reference>,
}

/// In-memory store. Cheap to construct, one per test.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: rewrite an invitation's expiry window. The service never
    /// mutates `expires_at`, so boundary tests set it here directly.
    pub fn set_expires_at(&self, invitation_id: &InvitationId, expires_at: DateTime<Utc>) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if let Some(inv) = inner.invitations.get_mut(&invitation_id.0) {
            inv.expires_at = expires_at;
        }
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn create_invitation(
        &self,
        params: &CreateInvitationParams,
    ) -> Result<Invitation, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if inner.token_index.contains_key(&params.token) {
            return Err(StoreError::AlreadyExists);
        }
        let id = Uuid::now_v7();
        let invitation = Invitation {
            id: InvitationId(id),
            token: params.token.clone(),
            requester_id: params.requester_id.clone(),
            referee_email: params.referee_email.clone(),
            referee_name: params.referee_name.clone(),
            notify_email: params.notify_email.clone(),
            metadata: params.metadata.clone(),
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
            expires_at: params.expires_at,
            completed_at: None,
        };
        inner.token_index.insert(params.token.clone(), id);
        inner.invitations.insert(id, invitation.clone());
        Ok(invitation)
    }

    async fn get_invitation_by_token(&self, token: &str) -> Result<Invitation, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        let id = inner.token_index.get(token).ok_or(StoreError::NotFound)?;
        inner
            .invitations
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_invitations(
        &self,
        requester_id: &RequesterId,
    ) -> Result<Vec<Invitation>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        let mut out: Vec<Invitation> = inner
            .invitations
            .values()
            .filter(|inv| &inv.requester_id == requester_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn complete_invitation(
        &self,
        invitation_id: &InvitationId,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        let inv = inner
            .invitations
            .get_mut(&invitation_id.0)
            .ok_or(StoreError::NotFound)?;
        if inv.status != InvitationStatus::Pending {
            return Err(StoreError::Conflict);
        }
        inv.status = InvitationStatus::Completed;
        inv.completed_at = Some(completed_at);
        Ok(())
    }

    async fn create_reference(
        &self,
        params: &CreateReferenceParams,
    ) -> Result<Reference, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        let id = Uuid::now_v7();
        let reference = Reference {
            id: ReferenceId(id),
            owner_id: params.owner_id.clone(),
            referee_name: params.referee_name.clone(),
            referee_email: params.referee_email.clone(),
            relationship: params.relationship.clone(),
            overall_rating: params.overall_rating,
            ratings: params.ratings.clone(),
            feedback: params.feedback.clone(),
            invitation_id: params.invitation_id.clone(),
            created_at: Utc::now(),
        };
        inner.references.insert(id, reference.clone());
        Ok(reference)
    }

    async fn get_reference(&self, reference_id: &ReferenceId) -> Result<Reference, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        inner
            .references
            .get(&reference_id.0)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_references(&self, owner_id: &RequesterId) -> Result<Vec<Reference>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        let mut out: Vec<Reference> = inner
            .references
            .values()
            .filter(|r| &r.owner_id == owner_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(token: &str) -> CreateInvitationParams {
        CreateInvitationParams {
            token: token.to_string(),
            requester_id: RequesterId("acct_1".to_string()),
            referee_email: "referee@example.com".to_string(),
            referee_name: "Jordan Referee".to_string(),
            notify_email: None,
            metadata: serde_json::json!({}),
            expires_at: Utc::now() + chrono::Duration::days(30),
        }
    }

    #[tokio::test]
    async fn test_duplicate_token_rejected() {
        let store = MemoryStore::new();
        store.create_invitation(&params("tok-1")).await.unwrap();
        let err = store.create_invitation(&params("tok-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_complete_is_conditional() {
        let store = MemoryStore::new();
        let inv = store.create_invitation(&params("tok-2")).await.unwrap();

        store
            .complete_invitation(&inv.id, Utc::now())
            .await
            .unwrap();

        // Second transition loses the compare-and-set.
        let err = store
            .complete_invitation(&inv.id, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        let stored = store.get_invitation_by_token("tok-2").await.unwrap();
        assert_eq!(stored.status, InvitationStatus::Completed);
        assert!(stored.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_complete_unknown_invitation() {
        let store = MemoryStore::new();
        let err = store
            .complete_invitation(&InvitationId(Uuid::now_v7()), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
