/// Playlist domain type
use crate::types::{PlaylistId, TrackId};
use serde::{Deserialize, Serialize};

/// Named, ordered list of track references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Track references in playlist order
    pub tracks: Vec<TrackId>,
}

impl Playlist {
    /// Create a new, empty playlist
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            tracks: Vec::new(),
        }
    }
}
