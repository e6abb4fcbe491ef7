/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Duration;

/// Audio track
///
/// Identity is the `id`: two tracks with the same id are the same track even
/// if their metadata differs (for example after a tag edit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// File path of the playable resource
    pub path: PathBuf,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: Option<String>,

    /// Track duration, if known
    pub duration: Option<Duration>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>, path: PathBuf) -> Self {
        Self {
            id: id.into(),
            path,
            title: title.into(),
            artist: None,
            duration: None,
        }
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
