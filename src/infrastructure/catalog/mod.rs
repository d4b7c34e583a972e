mod catalog_factory;
mod mock_catalog;
mod spotify_client;

pub use catalog_factory::MusicCatalogFactory;
pub use mock_catalog::MockMusicCatalog;
pub use spotify_client::{
    CLIENT_ID_ENV, CLIENT_SECRET_ENV, DEFAULT_ACCOUNTS_URL, DEFAULT_API_URL,
    DEFAULT_REQUEST_TIMEOUT, SpotifyCatalogClient, SpotifyCredentials,
};
