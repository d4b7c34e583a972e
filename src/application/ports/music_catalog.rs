use async_trait::async_trait;

use super::catalog_playlist::CatalogPlaylist;

#[async_trait]
pub trait MusicCatalog: Send + Sync {
    async fn fetch_playlist(&self, catalog_id: &str) -> Result<CatalogPlaylist, MusicCatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MusicCatalogError {
    #[error(
        "Spotify credentials not configured. Please set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET"
    )]
    MissingCredentials,
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
