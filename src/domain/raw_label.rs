use std::fmt;

use super::emotion::Emotion;

/// Output categories of the deployed emotion recognition model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawLabel {
    Neutral,
    Calm,
    Happy,
    Sad,
    Angry,
    Energetic,
}

/// Raw label table indexed by classifier output id.
///
/// Id 6 repeats `Happy`. Both the duplicate and the neutral collapse in
/// [`RawLabel::emotion`] mirror the deployed model's label config and may be
/// an upstream labelling inconsistency; keep them as they are.
pub const RAW_LABELS: [RawLabel; 7] = [
    RawLabel::Neutral,
    RawLabel::Calm,
    RawLabel::Happy,
    RawLabel::Sad,
    RawLabel::Angry,
    RawLabel::Energetic,
    RawLabel::Happy,
];

impl RawLabel {
    /// Looks up a classifier id. Ids outside the table fall back to `Neutral`.
    pub fn from_id(id: usize) -> Self {
        match RAW_LABELS.get(id) {
            Some(label) => *label,
            None => {
                tracing::warn!(id, "Classifier id outside the label table, treating as neutral");
                RawLabel::Neutral
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RawLabel::Neutral => "neutral",
            RawLabel::Calm => "calm",
            RawLabel::Happy => "happy",
            RawLabel::Sad => "sad",
            RawLabel::Angry => "angry",
            RawLabel::Energetic => "energetic",
        }
    }

    /// The application has no neutral category; calm is its closest match.
    pub fn emotion(&self) -> Emotion {
        match self {
            RawLabel::Neutral | RawLabel::Calm => Emotion::Calm,
            RawLabel::Happy => Emotion::Happy,
            RawLabel::Sad => Emotion::Sad,
            RawLabel::Angry => Emotion::Angry,
            RawLabel::Energetic => Emotion::Energetic,
        }
    }
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a classifier output id onto an application emotion.
pub fn resolve_emotion(id: usize) -> Emotion {
    RawLabel::from_id(id).emotion()
}
