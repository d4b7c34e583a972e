use async_trait::async_trait;

use crate::application::ports::{
    CatalogImage, CatalogPlaylist, CatalogTrack, MusicCatalog, MusicCatalogError,
};

const MOCK_TRACK_COUNT: usize = 8;

/// Offline catalog returning a canned playlist for any id.
pub struct MockMusicCatalog;

#[async_trait]
impl MusicCatalog for MockMusicCatalog {
    async fn fetch_playlist(&self, catalog_id: &str) -> Result<CatalogPlaylist, MusicCatalogError> {
        let tracks = (1..=MOCK_TRACK_COUNT)
            .map(|n| {
                Some(CatalogTrack {
                    name: format!("Mock Track {}", n),
                    artists: vec![format!("Mock Artist {}", n), "Guest".to_string()],
                    external_url: format!(
                        "https://open.spotify.com/track/mock-{}-{}",
                        catalog_id, n
                    ),
                    preview_url: (n % 2 == 0)
                        .then(|| format!("https://p.scdn.co/mp3-preview/mock-{}", n)),
                })
            })
            .collect();

        Ok(CatalogPlaylist {
            name: format!("Mock Playlist {}", catalog_id),
            description: Some("Canned playlist for local development".to_string()),
            images: vec![CatalogImage {
                url: format!("https://i.scdn.co/image/mock-{}", catalog_id),
                width: Some(640),
                height: Some(640),
            }],
            external_url: format!("https://open.spotify.com/playlist/{}", catalog_id),
            tracks,
        })
    }
}
