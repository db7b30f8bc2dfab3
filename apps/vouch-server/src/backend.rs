//! Store backend selection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use vouch_storage::*;
use vouch_store_memory::MemoryStore;
use vouch_store_sqlite::SqliteStore;

/// StoreBackend abstracts over the SQLite and in-memory implementations.
#[derive(Clone)]
pub enum StoreBackend {
    Sqlite(Arc<SqliteStore>),
    Memory(Arc<MemoryStore>),
}

#[async_trait::async_trait]
impl Store for StoreBackend {
    async fn create_invitation(
        &self,
        params: &CreateInvitationParams,
    ) -> Result<Invitation, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.create_invitation(params).await,
            StoreBackend::Memory(s) => s.create_invitation(params).await,
        }
    }

    async fn get_invitation_by_token(&self, token: &str) -> Result<Invitation, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_invitation_by_token(token).await,
            StoreBackend::Memory(s) => s.get_invitation_by_token(token).await,
        }
    }

    async fn list_invitations(
        &self,
        requester_id: &RequesterId,
    ) -> Result<Vec<Invitation>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_invitations(requester_id).await,
            StoreBackend::Memory(s) => s.list_invitations(requester_id).await,
        }
    }

    async fn complete_invitation(
        &self,
        invitation_id: &InvitationId,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.complete_invitation(invitation_id, completed_at).await,
            StoreBackend::Memory(s) => s.complete_invitation(invitation_id, completed_at).await,
        }
    }

    async fn create_reference(
        &self,
        params: &CreateReferenceParams,
    ) -> Result<Reference, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.create_reference(params).await,
            StoreBackend::Memory(s) => s.create_reference(params).await,
        }
    }

    async fn get_reference(&self, reference_id: &ReferenceId) -> Result<Reference, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.get_reference(reference_id).await,
            StoreBackend::Memory(s) => s.get_reference(reference_id).await,
        }
    }

    async fn list_references(&self, owner_id: &RequesterId) -> Result<Vec<Reference>, StoreError> {
        match self {
            StoreBackend::Sqlite(s) => s.list_references(owner_id).await,
            StoreBackend::Memory(s) => s.list_references(owner_id).await,
        }
    }
}
