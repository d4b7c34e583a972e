mod emotion_service;
mod lazy_classifier;
mod playlist_service;

pub use emotion_service::{EmotionService, PredictionError};
pub use lazy_classifier::LazyEmotionClassifier;
pub use playlist_service::{
    DEFAULT_TRACK_LIMIT, EmotionPlaylist, PlaylistError, PlaylistService, TrackSummary,
};
