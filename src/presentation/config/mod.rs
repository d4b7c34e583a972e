mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    CatalogProvider, CatalogSettings, LoggingSettings, ModelSettings, ModelSourceKind,
    ServerSettings, Settings, UploadSettings,
};
