use std::path::Path;

use crate::domain::Waveform;

/// Decodes an audio file of any supported container into a mono 16 kHz waveform.
pub trait AudioNormalizer: Send + Sync {
    fn normalize(&self, path: &Path) -> Result<Waveform, AudioNormalizerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioNormalizerError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("resampling failed: {0}")]
    ResamplingFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
