use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::Serialize;

use crate::domain::Emotion;
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Serialize)]
pub struct PredictResponse {
    pub emotion: Emotion,
}

const UPLOAD_FIELD: &str = "file";

fn is_audio(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with("audio/"))
}

fn multipart_error(e: MultipartError, max_upload_bytes: usize, context: &str) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %e, max_upload_bytes, "Upload exceeds body limit");
        return ApiError::PayloadTooLarge(format!(
            "File exceeds the maximum upload size of {} bytes",
            max_upload_bytes
        ));
    }

    tracing::error!(error = %e, "{}", context);
    ApiError::bad_request(format!("{}: {}", context, e))
}

#[tracing::instrument(skip(state, multipart))]
pub async fn predict_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(f)) if f.name() == Some(UPLOAD_FIELD) => break f,
            Ok(Some(f)) => {
                tracing::debug!(field = ?f.name(), "Skipping multipart part");
            }
            Ok(None) => {
                tracing::warn!("Predict request with no file");
                return Err(ApiError::bad_request("No file uploaded"));
            }
            Err(e) => {
                return Err(multipart_error(
                    e,
                    state.max_upload_bytes,
                    "Failed to read multipart",
                ));
            }
        }
    };

    let filename = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    if !is_audio(content_type.as_deref()) {
        tracing::warn!(content_type = ?content_type, "Rejected non-audio upload");
        return Err(ApiError::bad_request("File must be an audio file"));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| multipart_error(e, state.max_upload_bytes, "Failed to read file"))?;

    tracing::debug!(
        filename = ?filename,
        content_type = ?content_type,
        bytes = data.len(),
        "Audio upload received"
    );

    let emotion = state
        .emotion_service
        .predict_upload(&data, filename.as_deref())
        .await?;

    Ok(Json(PredictResponse { emotion }))
}
