//! Invitation handlers: create, view, submit.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vouch_core::{CreateInvitation, InvitationView, ReferenceSubmission};

use crate::error::Result;
use crate::server::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvitationRequest {
    pub requester_id: String,
    pub referee_email: String,
    pub referee_name: String,
    /// Requester address for the completion notice, if wanted.
    pub notify_email: Option<String>,
    /// Opaque context shown to the referee.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateInvitationResponse {
    pub invitation_id: String,
    pub token: String,
    pub share_link: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn create_invitation(
    State(state): State<AppState>,
    Json(input): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<CreateInvitationResponse>)> {
    let created = state
        .service
        .create_invitation(CreateInvitation {
            requester_id: input.requester_id,
            referee_email: input.referee_email,
            referee_name: input.referee_name,
            notify_email: input.notify_email,
            metadata: input.metadata,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateInvitationResponse {
            invitation_id: created.invitation.id.0.to_string(),
            token: created.invitation.token.clone(),
            share_link: created.share_link,
            expires_at: created.invitation.expires_at,
        }),
    ))
}

// No authentication required - the token itself is the credential.
pub async fn get_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<InvitationView>> {
    Ok(Json(state.service.invitation_view(&token).await?))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReferenceRequest {
    pub relationship: String,
    pub ratings: BTreeMap<String, f64>,
    #[serde(default)]
    pub feedback: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitReferenceResponse {
    pub reference_id: String,
    pub overall_rating: f64,
}

pub async fn submit_reference(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<SubmitReferenceRequest>,
) -> Result<(StatusCode, Json<SubmitReferenceResponse>)> {
    let reference = state
        .service
        .submit_reference(
            &token,
            ReferenceSubmission {
                relationship: input.relationship,
                ratings: input.ratings,
                feedback: input.feedback,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitReferenceResponse {
            reference_id: reference.id.0.to_string(),
            overall_rating: reference.overall_rating,
        }),
    ))
}
