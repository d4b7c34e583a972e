use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{MusicCatalog, MusicCatalogError};
use crate::presentation::config::{CatalogProvider, CatalogSettings};

use super::mock_catalog::MockMusicCatalog;
use super::spotify_client::SpotifyCatalogClient;

pub struct MusicCatalogFactory;

impl MusicCatalogFactory {
    pub fn create(settings: &CatalogSettings) -> Result<Arc<dyn MusicCatalog>, MusicCatalogError> {
        match settings.provider {
            CatalogProvider::Spotify => {
                tracing::info!(
                    api_url = %settings.api_url,
                    timeout_secs = settings.timeout_secs,
                    "Using Spotify music catalog"
                );
                Ok(Arc::new(SpotifyCatalogClient::from_env(
                    &settings.accounts_url,
                    &settings.api_url,
                    Duration::from_secs(settings.timeout_secs),
                )?))
            }
            CatalogProvider::Mock => {
                tracing::warn!("Using mock music catalog");
                Ok(Arc::new(MockMusicCatalog))
            }
        }
    }
}
