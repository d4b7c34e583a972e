mod symphonia_normalizer;

pub use symphonia_normalizer::{SymphoniaAudioNormalizer, downmix_to_mono, resample};
