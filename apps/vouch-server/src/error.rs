//! HTTP error mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use vouch_core::ServiceError;

pub type Result<T> = core::result::Result<T, ApiError>;

/// Turns core errors into HTTP responses with distinguishable status
/// codes, so a referee sees "never existed", "expired" and "already used"
/// as different outcomes instead of a generic failure.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self.0 {
            err @ ServiceError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
            ServiceError::NotFound => (
                StatusCode::NOT_FOUND,
                "No invitation matches this link".to_string(),
            ),
            ServiceError::Expired(expired_at) => (
                StatusCode::GONE,
                format!("This invitation link expired on {}", expired_at.format("%B %e, %Y")),
            ),
            ServiceError::AlreadyCompleted => (
                StatusCode::CONFLICT,
                "This reference has already been submitted".to_string(),
            ),
            ServiceError::Store(err) => {
                error!("store error: {:#?}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage temporarily unavailable, please retry".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
