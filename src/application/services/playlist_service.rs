use std::sync::Arc;

use crate::application::ports::{CatalogPlaylist, MusicCatalog, MusicCatalogError};
use crate::domain::{Emotion, PlaylistDescriptor, UnsupportedEmotion, lookup_playlist};

pub const DEFAULT_TRACK_LIMIT: usize = 5;

/// Resolves an emotion name to its curated playlist and fetches live details.
pub struct PlaylistService {
    catalog: Arc<dyn MusicCatalog>,
    track_limit: usize,
}

impl PlaylistService {
    pub fn new(catalog: Arc<dyn MusicCatalog>, track_limit: usize) -> Self {
        Self {
            catalog,
            track_limit,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn playlist_for(&self, emotion_name: &str) -> Result<EmotionPlaylist, PlaylistError> {
        let (emotion, descriptor) = lookup_playlist(emotion_name)?;

        tracing::debug!(
            emotion = %emotion,
            catalog_id = descriptor.catalog_id,
            "Fetching playlist from catalog"
        );

        let playlist = self.catalog.fetch_playlist(descriptor.catalog_id).await?;
        let summary = summarize(emotion, descriptor, playlist, self.track_limit);

        tracing::info!(
            emotion = %emotion,
            playlist = %summary.name,
            tracks = summary.tracks.len(),
            "Playlist resolved"
        );

        Ok(summary)
    }
}

fn summarize(
    emotion: Emotion,
    descriptor: &'static PlaylistDescriptor,
    playlist: CatalogPlaylist,
    track_limit: usize,
) -> EmotionPlaylist {
    let tracks = playlist
        .tracks
        .into_iter()
        .take(track_limit)
        .flatten()
        .map(|t| TrackSummary {
            name: t.name,
            artist: t.artists.join(", "),
            url: t.external_url,
            preview_url: t.preview_url,
        })
        .collect();

    EmotionPlaylist {
        emotion,
        descriptor,
        name: playlist.name,
        description: playlist.description.unwrap_or_default(),
        cover_image: playlist.images.into_iter().next().map(|i| i.url),
        url: playlist.external_url,
        tracks,
    }
}

#[derive(Debug, Clone)]
pub struct EmotionPlaylist {
    pub emotion: Emotion,
    pub descriptor: &'static PlaylistDescriptor,
    pub name: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub url: String,
    pub tracks: Vec<TrackSummary>,
}

#[derive(Debug, Clone)]
pub struct TrackSummary {
    pub name: String,
    pub artist: String,
    pub url: String,
    pub preview_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error(transparent)]
    UnsupportedEmotion(#[from] UnsupportedEmotion),
    #[error("catalog: {0}")]
    Catalog(#[from] MusicCatalogError),
}
