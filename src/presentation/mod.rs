pub mod config;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{
    CatalogProvider, CatalogSettings, Environment, LoggingSettings, ModelSettings,
    ModelSourceKind, ServerSettings, Settings, UploadSettings,
};
pub use router::create_router;
pub use state::AppState;
