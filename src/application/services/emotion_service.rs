use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::application::ports::{
    AudioNormalizer, AudioNormalizerError, ClassifierError, ClassifierLoader, EmotionClassifier,
};
use crate::domain::{Emotion, RawLabel, UploadId};

use super::lazy_classifier::LazyEmotionClassifier;

/// Runs uploaded clips through normalization, classification and label resolution.
pub struct EmotionService {
    normalizer: Arc<dyn AudioNormalizer>,
    classifier: LazyEmotionClassifier,
    upload_dir: PathBuf,
}

impl EmotionService {
    pub fn new(
        normalizer: Arc<dyn AudioNormalizer>,
        loader: Arc<dyn ClassifierLoader>,
        upload_dir: PathBuf,
    ) -> Result<Self, PredictionError> {
        std::fs::create_dir_all(&upload_dir).map_err(PredictionError::Upload)?;
        Ok(Self {
            normalizer,
            classifier: LazyEmotionClassifier::new(loader),
            upload_dir,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn is_model_loaded(&self) -> bool {
        self.classifier.is_loaded()
    }

    /// Predicts the emotion of an uploaded clip.
    ///
    /// The bytes live in a transient file under the upload directory only for
    /// the duration of this call; the file is removed on every exit path.
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn predict_upload(
        &self,
        data: &[u8],
        filename: Option<&str>,
    ) -> Result<Emotion, PredictionError> {
        let upload_id = UploadId::new();
        let transient = self.persist_transient(&upload_id, data, filename)?;

        tracing::debug!(
            upload_id = %upload_id,
            path = %transient.path().display(),
            "Upload persisted for prediction"
        );

        let classifier = self.classifier.get().await?;
        let normalizer = Arc::clone(&self.normalizer);

        tokio::task::spawn_blocking(move || {
            let result = classify_file(normalizer.as_ref(), classifier.as_ref(), transient.path());
            drop(transient);
            result
        })
        .await
        .map_err(|e| PredictionError::TaskFailed(e.to_string()))?
    }

    /// Predicts the emotion of an audio file that already exists on disk.
    pub async fn predict_file(&self, path: &Path) -> Result<Emotion, PredictionError> {
        let classifier = self.classifier.get().await?;
        let normalizer = Arc::clone(&self.normalizer);
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            classify_file(normalizer.as_ref(), classifier.as_ref(), &path)
        })
        .await
        .map_err(|e| PredictionError::TaskFailed(e.to_string()))?
    }

    fn persist_transient(
        &self,
        upload_id: &UploadId,
        data: &[u8],
        filename: Option<&str>,
    ) -> Result<NamedTempFile, PredictionError> {
        let suffix = filename.and_then(extension_hint).unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix(&upload_id.file_prefix())
            .suffix(&suffix)
            .tempfile_in(&self.upload_dir)
            .map_err(PredictionError::Upload)?;

        file.write_all(data).map_err(PredictionError::Upload)?;
        file.flush().map_err(PredictionError::Upload)?;

        Ok(file)
    }
}

fn classify_file(
    normalizer: &dyn AudioNormalizer,
    classifier: &dyn EmotionClassifier,
    path: &Path,
) -> Result<Emotion, PredictionError> {
    let waveform = normalizer.normalize(path)?;

    tracing::debug!(
        samples = waveform.len(),
        duration_secs = waveform.duration_secs(),
        "Waveform ready for classification"
    );

    let id = classifier.classify(&waveform)?;
    let label = RawLabel::from_id(id);
    let emotion = label.emotion();

    tracing::info!(raw_id = id, raw_label = %label, emotion = %emotion, "Predicted emotion");

    Ok(emotion)
}

/// Keeps a short alphanumeric extension so the decoder can use it as a format hint.
fn extension_hint(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("transient upload: {0}")]
    Upload(std::io::Error),
    #[error("{0}")]
    Normalization(#[from] AudioNormalizerError),
    #[error("{0}")]
    Classification(#[from] ClassifierError),
    #[error("prediction task failed: {0}")]
    TaskFailed(String),
}
