use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::application::ports::{
    CatalogImage, CatalogPlaylist, CatalogTrack, MusicCatalog, MusicCatalogError,
};

pub const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tokens are refreshed this long before Spotify says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Client-credentials pair for the Spotify Web API.
#[derive(Clone)]
pub struct SpotifyCredentials {
    client_id: String,
    client_secret: String,
}

impl SpotifyCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_env() -> Result<Self, MusicCatalogError> {
        let client_id = std::env::var(CLIENT_ID_ENV).ok().filter(|v| !v.is_empty());
        let client_secret = std::env::var(CLIENT_SECRET_ENV).ok().filter(|v| !v.is_empty());

        match (client_id, client_secret) {
            (Some(id), Some(secret)) => Ok(Self::new(id, secret)),
            _ => Err(MusicCatalogError::MissingCredentials),
        }
    }
}

impl fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &"[REDACTED]")
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct PlaylistObject {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    images: Option<Vec<ImageObject>>,
    #[serde(default)]
    external_urls: ExternalUrls,
    tracks: TracksPage,
}

#[derive(Deserialize)]
struct ImageObject {
    url: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Deserialize, Default)]
struct ExternalUrls {
    #[serde(default)]
    spotify: Option<String>,
}

#[derive(Deserialize)]
struct TracksPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Deserialize)]
struct PlaylistItem {
    #[serde(default)]
    track: Option<TrackObject>,
}

#[derive(Deserialize)]
struct TrackObject {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistObject>,
    #[serde(default)]
    external_urls: ExternalUrls,
    #[serde(default)]
    preview_url: Option<String>,
}

#[derive(Deserialize)]
struct ArtistObject {
    name: String,
}

/// Spotify Web API client authenticated with the client-credentials flow.
///
/// Credentials are resolved on the first request, so a missing secret only
/// surfaces when a playlist is actually requested.
pub struct SpotifyCatalogClient {
    client: Client,
    accounts_url: String,
    api_url: String,
    credentials: Option<SpotifyCredentials>,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyCatalogClient {
    /// Reads credentials from `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET` at first use.
    pub fn from_env(
        accounts_url: &str,
        api_url: &str,
        timeout: Duration,
    ) -> Result<Self, MusicCatalogError> {
        Self::build(accounts_url, api_url, timeout, None)
    }

    pub fn with_credentials(
        accounts_url: &str,
        api_url: &str,
        timeout: Duration,
        credentials: SpotifyCredentials,
    ) -> Result<Self, MusicCatalogError> {
        Self::build(accounts_url, api_url, timeout, Some(credentials))
    }

    /// Every request is bounded by `timeout`, including the token request made
    /// while the token cache is locked.
    fn build(
        accounts_url: &str,
        api_url: &str,
        timeout: Duration,
        credentials: Option<SpotifyCredentials>,
    ) -> Result<Self, MusicCatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| MusicCatalogError::ApiRequestFailed(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
            token: Mutex::new(None),
        })
    }

    fn credentials(&self) -> Result<SpotifyCredentials, MusicCatalogError> {
        match &self.credentials {
            Some(credentials) => Ok(credentials.clone()),
            None => SpotifyCredentials::from_env(),
        }
    }

    async fn access_token(&self) -> Result<String, MusicCatalogError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let credentials = self.credentials()?;
        let url = format!("{}/api/token", self.accounts_url);

        tracing::debug!("Requesting Spotify access token");

        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| MusicCatalogError::AuthenticationFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MusicCatalogError::AuthenticationFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            MusicCatalogError::AuthenticationFailed(format!("parse response: {}", e))
        })?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        tracing::debug!(expires_in = token.expires_in, "Spotify access token cached");

        Ok(token.access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    async fn get_playlist(
        &self,
        catalog_id: &str,
        token: &str,
    ) -> Result<reqwest::Response, MusicCatalogError> {
        let url = format!("{}/v1/playlists/{}", self.api_url, catalog_id);

        self.client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| MusicCatalogError::ApiRequestFailed(format!("request: {}", e)))
    }
}

#[async_trait]
impl MusicCatalog for SpotifyCatalogClient {
    async fn fetch_playlist(&self, catalog_id: &str) -> Result<CatalogPlaylist, MusicCatalogError> {
        let token = self.access_token().await?;
        let mut response = self.get_playlist(catalog_id, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("Spotify token rejected, refreshing once");
            self.invalidate_token().await;
            let token = self.access_token().await?;
            response = self.get_playlist(catalog_id, &token).await?;
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MusicCatalogError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let playlist: PlaylistObject = response
            .json()
            .await
            .map_err(|e| MusicCatalogError::InvalidResponse(format!("parse playlist: {}", e)))?;

        let playlist = into_catalog_playlist(playlist)?;

        tracing::info!(
            catalog_id,
            playlist = %playlist.name,
            items = playlist.tracks.len(),
            "Spotify playlist fetched"
        );

        Ok(playlist)
    }
}

fn into_catalog_playlist(playlist: PlaylistObject) -> Result<CatalogPlaylist, MusicCatalogError> {
    let external_url = playlist.external_urls.spotify.ok_or_else(|| {
        MusicCatalogError::InvalidResponse("playlist has no spotify url".to_string())
    })?;

    let tracks = playlist
        .tracks
        .items
        .into_iter()
        .map(|item| {
            let track = item.track?;
            let Some(url) = track.external_urls.spotify else {
                tracing::debug!(track = %track.name, "Skipping track without spotify url");
                return None;
            };
            Some(CatalogTrack {
                name: track.name,
                artists: track.artists.into_iter().map(|a| a.name).collect(),
                external_url: url,
                preview_url: track.preview_url,
            })
        })
        .collect();

    let images = playlist
        .images
        .unwrap_or_default()
        .into_iter()
        .map(|i| CatalogImage {
            url: i.url,
            width: i.width,
            height: i.height,
        })
        .collect();

    Ok(CatalogPlaylist {
        name: playlist.name,
        description: playlist.description,
        images,
        external_url,
        tracks,
    })
}
