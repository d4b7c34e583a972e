use std::sync::Arc;

use crate::application::services::{EmotionService, PlaylistService};

#[derive(Clone)]
pub struct AppState {
    pub emotion_service: Arc<EmotionService>,
    pub playlist_service: Arc<PlaylistService>,
    pub max_upload_bytes: usize,
}
