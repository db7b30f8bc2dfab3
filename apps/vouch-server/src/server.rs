//! Router and shared state.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use vouch_core::ReferenceService;

use crate::backend::StoreBackend;
use crate::handlers::{invitations, requesters};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReferenceService<StoreBackend>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        // Referee surface: the token in the path is the only credential.
        .route("/invitations", post(invitations::create_invitation))
        .route("/invitations/{token}", get(invitations::get_invitation))
        .route(
            "/invitations/{token}/reference",
            post(invitations::submit_reference),
        )
        // Requester surface
        .route(
            "/requesters/{requester_id}/invitations",
            get(requesters::list_invitations),
        )
        .route(
            "/requesters/{requester_id}/references",
            get(requesters::list_references),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}
