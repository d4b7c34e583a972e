mod emotion;
mod playlist_map;
mod raw_label;
mod upload_id;
mod waveform;

pub use emotion::Emotion;
pub use playlist_map::{PlaylistDescriptor, UnsupportedEmotion, lookup_playlist, playlist_for};
pub use raw_label::{RAW_LABELS, RawLabel, resolve_emotion};
pub use upload_id::UploadId;
pub use waveform::{TARGET_SAMPLE_RATE, Waveform};
