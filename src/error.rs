use crate::extract::ExtractError;
use crate::models::ErrorResponse;
use crate::replicate::ReplicateError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Everything the edit pipeline can fail with. All variants map to the same
/// `{"error": ...}` body with HTTP 500; only the message differs.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Replicate client not initialized. Check REPLICATE_API_TOKEN.")]
    NotInitialized,
    #[error(transparent)]
    Replicate(#[from] ReplicateError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("{0}")]
    Upload(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
