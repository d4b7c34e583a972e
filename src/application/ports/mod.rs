mod audio_normalizer;
mod catalog_playlist;
mod emotion_classifier;
mod music_catalog;

pub use audio_normalizer::{AudioNormalizer, AudioNormalizerError};
pub use catalog_playlist::{CatalogImage, CatalogPlaylist, CatalogTrack};
pub use emotion_classifier::{ClassifierError, ClassifierLoader, EmotionClassifier};
pub use music_catalog::{MusicCatalog, MusicCatalogError};
