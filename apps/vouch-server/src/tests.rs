//! Handler-level tests over the in-memory store.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use vouch_core::{LogDispatcher, ReferenceService, ViewStatus};
use vouch_store_memory::MemoryStore;

use crate::backend::StoreBackend;
use crate::handlers::invitations::{self, CreateInvitationRequest, SubmitReferenceRequest};
use crate::handlers::requesters;
use crate::server::AppState;

fn state() -> AppState {
    let store = StoreBackend::Memory(Arc::new(MemoryStore::new()));
    let service = Arc::new(ReferenceService::new(
        Arc::new(store),
        Arc::new(LogDispatcher),
        "https://vouch.example.com",
    ));
    AppState { service }
}

fn create_request() -> CreateInvitationRequest {
    CreateInvitationRequest {
        requester_id: "acct_1".to_string(),
        referee_email: "referee@example.com".to_string(),
        referee_name: "Jordan Referee".to_string(),
        notify_email: None,
        metadata: serde_json::json!({"candidate": "Alex Doe"}),
    }
}

fn submit_request() -> SubmitReferenceRequest {
    let mut ratings = BTreeMap::new();
    ratings.insert("quality".to_string(), 5.0);
    ratings.insert("reliability".to_string(), 4.0);
    SubmitReferenceRequest {
        relationship: "former manager".to_string(),
        ratings,
        feedback: BTreeMap::new(),
    }
}

#[tokio::test]
async fn test_create_then_view() {
    let state = state();

    let (status, Json(created)) =
        invitations::create_invitation(State(state.clone()), Json(create_request()))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.share_link.contains(&created.token));

    let Json(view) = invitations::get_invitation(State(state), Path(created.token))
        .await
        .unwrap();
    assert_eq!(view.status, ViewStatus::Pending);
    assert_eq!(view.referee_name, "Jordan Referee");
}

#[tokio::test]
async fn test_submit_then_duplicate_is_conflict() {
    let state = state();

    let (_, Json(created)) =
        invitations::create_invitation(State(state.clone()), Json(create_request()))
            .await
            .unwrap();

    let (status, Json(submitted)) = invitations::submit_reference(
        State(state.clone()),
        Path(created.token.clone()),
        Json(submit_request()),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(submitted.overall_rating, 4.5);

    let err = invitations::submit_reference(
        State(state.clone()),
        Path(created.token.clone()),
        Json(submit_request()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

    let Json(view) = invitations::get_invitation(State(state), Path(created.token))
        .await
        .unwrap();
    assert_eq!(view.status, ViewStatus::Completed);
}

#[tokio::test]
async fn test_unknown_token_maps_to_not_found() {
    let state = state();
    let err = invitations::get_invitation(State(state), Path("no-such-token".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_create_maps_to_bad_request() {
    let state = state();
    let mut request = create_request();
    request.referee_email = "not-an-email".to_string();

    let err = invitations::create_invitation(State(state), Json(request))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_requester_dashboard() {
    let state = state();

    let (_, Json(created)) =
        invitations::create_invitation(State(state.clone()), Json(create_request()))
            .await
            .unwrap();
    invitations::submit_reference(
        State(state.clone()),
        Path(created.token),
        Json(submit_request()),
    )
    .await
    .unwrap();

    let Json(invitations) =
        requesters::list_invitations(State(state.clone()), Path("acct_1".to_string()))
            .await
            .unwrap();
    assert_eq!(invitations.len(), 1);
    assert_eq!(invitations[0].status, ViewStatus::Completed);
    assert!(invitations[0].completed_at.is_some());

    let Json(references) = requesters::list_references(State(state), Path("acct_1".to_string()))
        .await
        .unwrap();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].overall_rating, 4.5);
}
