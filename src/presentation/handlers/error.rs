use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{PlaylistError, PredictionError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Boundary error for every handler: client mistakes map to 4xx, everything else to 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        tracing::error!(error = %e, "Emotion prediction failed");
        ApiError::Internal(format!("Error processing audio: {}", e))
    }
}

impl From<PlaylistError> for ApiError {
    fn from(e: PlaylistError) -> Self {
        match e {
            PlaylistError::UnsupportedEmotion(e) => {
                tracing::warn!(requested = %e.requested, "Unsupported emotion requested");
                ApiError::BadRequest(e.to_string())
            }
            PlaylistError::Catalog(e) => {
                tracing::error!(error = %e, "Playlist fetch failed");
                ApiError::Internal(format!("Error fetching playlist: {}", e))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
