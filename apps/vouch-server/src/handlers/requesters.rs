//! Requester dashboard handlers: list invitations and references.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use vouch_core::ViewStatus;

use crate::error::Result;
use crate::server::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct InvitationSummary {
    pub invitation_id: String,
    pub referee_name: String,
    pub referee_email: String,
    pub status: ViewStatus,
    pub expires_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

pub async fn list_invitations(
    State(state): State<AppState>,
    Path(requester_id): Path<String>,
) -> Result<Json<Vec<InvitationSummary>>> {
    let now = Utc::now();
    let invitations = state
        .service
        .invitations_for(&requester_id)
        .await?
        .into_iter()
        .map(|inv| InvitationSummary {
            invitation_id: inv.id.0.to_string(),
            status: ViewStatus::of(&inv, now),
            referee_name: inv.referee_name,
            referee_email: inv.referee_email,
            expires_at: inv.expires_at,
            completed_at: inv.completed_at,
        })
        .collect();
    Ok(Json(invitations))
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceSummary {
    pub reference_id: String,
    pub referee_name: String,
    pub relationship: String,
    pub overall_rating: f64,
    pub created_at: DateTime<Utc>,
}

pub async fn list_references(
    State(state): State<AppState>,
    Path(requester_id): Path<String>,
) -> Result<Json<Vec<ReferenceSummary>>> {
    let references = state
        .service
        .references_for(&requester_id)
        .await?
        .into_iter()
        .map(|r| ReferenceSummary {
            reference_id: r.id.0.to_string(),
            referee_name: r.referee_name,
            relationship: r.relationship,
            overall_rating: r.overall_rating,
            created_at: r.created_at,
        })
        .collect();
    Ok(Json(references))
}
