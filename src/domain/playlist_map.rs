use super::emotion::Emotion;

/// Static pointer at a curated playlist in the external music catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistDescriptor {
    pub catalog_id: &'static str,
    pub display_name: &'static str,
}

const HAPPY: PlaylistDescriptor = PlaylistDescriptor {
    catalog_id: "37i9dQZF1DXdPec7aLTmlC",
    display_name: "Happy Hits",
};

const SAD: PlaylistDescriptor = PlaylistDescriptor {
    catalog_id: "37i9dQZF1DX7qK8ma5wgG1",
    display_name: "Sad Songs",
};

const ANGRY: PlaylistDescriptor = PlaylistDescriptor {
    catalog_id: "37i9dQZF1DWZUAeYvs88zc",
    display_name: "Angry Music",
};

const CALM: PlaylistDescriptor = PlaylistDescriptor {
    catalog_id: "37i9dQZF1DX3PIPIT6lEg5",
    display_name: "Peaceful Piano",
};

const ENERGETIC: PlaylistDescriptor = PlaylistDescriptor {
    catalog_id: "37i9dQZF1DX8FwnYE6PRvL",
    display_name: "Beast Mode",
};

pub fn playlist_for(emotion: Emotion) -> &'static PlaylistDescriptor {
    match emotion {
        Emotion::Happy => &HAPPY,
        Emotion::Sad => &SAD,
        Emotion::Angry => &ANGRY,
        Emotion::Calm => &CALM,
        Emotion::Energetic => &ENERGETIC,
    }
}

/// Case-insensitive lookup of a playlist by emotion name.
pub fn lookup_playlist(
    name: &str,
) -> Result<(Emotion, &'static PlaylistDescriptor), UnsupportedEmotion> {
    let emotion: Emotion = name.parse().map_err(|_| UnsupportedEmotion {
        requested: name.to_string(),
        supported: Emotion::supported_names(),
    })?;

    Ok((emotion, playlist_for(emotion)))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Emotion '{requested}' not supported. Supported emotions: {supported:?}")]
pub struct UnsupportedEmotion {
    pub requested: String,
    pub supported: Vec<&'static str>,
}
