use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::application::services::{EmotionPlaylist, TrackSummary};
use crate::domain::Emotion;
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Serialize)]
pub struct PlaylistResponse {
    pub emotion: Emotion,
    pub playlist: PlaylistBody,
}

#[derive(Serialize)]
pub struct PlaylistBody {
    pub name: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub url: String,
    pub tracks: Vec<TrackBody>,
}

#[derive(Serialize)]
pub struct TrackBody {
    pub name: String,
    pub artist: String,
    pub url: String,
    pub preview_url: Option<String>,
}

impl From<TrackSummary> for TrackBody {
    fn from(t: TrackSummary) -> Self {
        Self {
            name: t.name,
            artist: t.artist,
            url: t.url,
            preview_url: t.preview_url,
        }
    }
}

impl From<EmotionPlaylist> for PlaylistResponse {
    fn from(p: EmotionPlaylist) -> Self {
        Self {
            emotion: p.emotion,
            playlist: PlaylistBody {
                name: p.name,
                description: p.description,
                cover_image: p.cover_image,
                url: p.url,
                tracks: p.tracks.into_iter().map(TrackBody::from).collect(),
            },
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn playlist_handler(
    State(state): State<AppState>,
    Path(emotion): Path<String>,
) -> Result<Json<PlaylistResponse>, ApiError> {
    let playlist = state.playlist_service.playlist_for(&emotion).await?;
    Ok(Json(PlaylistResponse::from(playlist)))
}
