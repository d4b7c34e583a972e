use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub catalog: CatalogSettings,
    pub upload: UploadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub source: ModelSourceKind,
    pub model_id: String,
    pub revision: String,
    pub model_dir: PathBuf,
    pub onnx_file: String,
    pub preprocessor_file: String,
    #[serde(default)]
    pub input_name: Option<String>,
    #[serde(default)]
    pub output_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSourceKind {
    Hub,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    pub provider: CatalogProvider,
    pub accounts_url: String,
    pub api_url: String,
    pub track_limit: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogProvider {
    Spotify,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.{Environment}.toml` (optional) and
    /// `APP_`-prefixed environment variables, e.g. `APP_SERVER__PORT=9000`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?.build()?.try_deserialize()
    }

    fn builder(
        environment: Environment,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.max_upload_mb", 25)?
            .set_default("model.source", "local")?
            .set_default("model.model_id", "superb/hubert-large-superb-er")?
            .set_default("model.revision", "main")?
            .set_default("model.model_dir", "models/hubert-large-superb-er")?
            .set_default("model.onnx_file", "model.onnx")?
            .set_default("model.preprocessor_file", "preprocessor_config.json")?
            .set_default("catalog.provider", "spotify")?
            .set_default("catalog.accounts_url", "https://accounts.spotify.com")?
            .set_default("catalog.api_url", "https://api.spotify.com")?
            .set_default("catalog.track_limit", 5)?
            .set_default("catalog.timeout_secs", 10)?
            .set_default("upload.dir", "temp_audio")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ))
    }
}
