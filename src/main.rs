use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use moodmix::application::services::{EmotionService, PlaylistService};
use moodmix::infrastructure::audio::SymphoniaAudioNormalizer;
use moodmix::infrastructure::catalog::MusicCatalogFactory;
use moodmix::infrastructure::inference::{ModelIoNames, ModelSource, OnnxClassifierLoader};
use moodmix::infrastructure::observability::{TracingConfig, init_tracing};
use moodmix::presentation::{
    AppState, Environment, ModelSettings, ModelSourceKind, Settings, create_router,
};

fn classifier_loader(model: &ModelSettings) -> OnnxClassifierLoader {
    let source = match model.source {
        ModelSourceKind::Hub => ModelSource::Hub {
            model_id: model.model_id.clone(),
            revision: model.revision.clone(),
            onnx_file: model.onnx_file.clone(),
            preprocessor_file: model.preprocessor_file.clone(),
        },
        ModelSourceKind::Local => ModelSource::Local {
            model_dir: model.model_dir.clone(),
            onnx_file: model.onnx_file.clone(),
            preprocessor_file: model.preprocessor_file.clone(),
        },
    };

    let io_names = ModelIoNames {
        input: model.input_name.clone(),
        output: model.output_name.clone(),
    };

    OnnxClassifierLoader::new(source, io_names)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(
        environment,
        &settings.logging,
    ));

    tracing::info!(
        model_source = ?settings.model.source,
        catalog = ?settings.catalog.provider,
        upload_dir = %settings.upload.dir.display(),
        "Settings loaded"
    );

    // The model itself is loaded lazily on the first prediction.
    let emotion_service = Arc::new(
        EmotionService::new(
            Arc::new(SymphoniaAudioNormalizer),
            Arc::new(classifier_loader(&settings.model)),
            settings.upload.dir.clone(),
        )
        .context("Failed to prepare upload directory")?,
    );

    let catalog =
        MusicCatalogFactory::create(&settings.catalog).context("Failed to build music catalog")?;
    let playlist_service = Arc::new(PlaylistService::new(
        catalog,
        settings.catalog.track_limit,
    ));

    let state = AppState {
        emotion_service,
        playlist_service,
        max_upload_bytes: settings.server.max_upload_bytes(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
