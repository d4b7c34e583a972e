use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Emotion categories the playlist side of the application understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Calm,
    Energetic,
}

impl Emotion {
    /// Canonical ordering, used whenever the valid values are listed back to a client.
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Calm,
        Emotion::Energetic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Calm => "calm",
            Emotion::Energetic => "energetic",
        }
    }

    pub fn supported_names() -> Vec<&'static str> {
        Self::ALL.iter().map(Emotion::as_str).collect()
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "angry" => Ok(Emotion::Angry),
            "calm" => Ok(Emotion::Calm),
            "energetic" => Ok(Emotion::Energetic),
            other => Err(format!("Invalid emotion: {}", other)),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
