/// Playlist details as returned by the external music catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPlaylist {
    pub name: String,
    pub description: Option<String>,
    pub images: Vec<CatalogImage>,
    pub external_url: String,
    /// One entry per playlist item, in playlist order. `None` marks an item
    /// with no playable track (removed, local-only or unavailable).
    pub tracks: Vec<Option<CatalogTrack>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTrack {
    pub name: String,
    pub artists: Vec<String>,
    pub external_url: String,
    pub preview_url: Option<String>,
}
