use std::sync::Arc;

use crate::domain::Waveform;

/// Scores a waveform against the model's label set and returns the winning raw label id.
pub trait EmotionClassifier: Send + Sync {
    fn classify(&self, waveform: &Waveform) -> Result<usize, ClassifierError>;
}

/// Builds a ready classifier. Called at most once per process by the lazy cell.
pub trait ClassifierLoader: Send + Sync {
    fn load(&self) -> Result<Arc<dyn EmotionClassifier>, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}
