//! Catalog contract
//!
//! The catalog owns the library of tracks and the user's playlists. Playback
//! only reads ordered track lists from it; every mutation here means "the
//! candidate list may have changed" for whoever is scheduling playback.

use crate::error::{CoreError, Result};
use crate::types::{Playlist, PlaylistId, Track, TrackId};
use tracing::debug;

/// Library and playlist storage consumed by the playback layer
pub trait Catalog {
    /// All library tracks in catalog order
    fn list_tracks(&self) -> Vec<Track>;

    /// Tracks of a playlist in playlist order
    ///
    /// References to tracks no longer in the library are skipped.
    fn playlist_tracks(&self, playlist: &PlaylistId) -> Result<Vec<Track>>;

    /// All playlists
    fn playlists(&self) -> Vec<Playlist>;

    /// Create an empty playlist
    fn create_playlist(&mut self, name: &str) -> Result<PlaylistId>;

    /// Rename a playlist
    fn rename_playlist(&mut self, playlist: &PlaylistId, name: &str) -> Result<()>;

    /// Delete a playlist (tracks stay in the library)
    fn delete_playlist(&mut self, playlist: &PlaylistId) -> Result<()>;

    /// Append a library track to a playlist
    fn add_track_to_playlist(&mut self, playlist: &PlaylistId, track: &TrackId) -> Result<()>;

    /// Remove every occurrence of a track from a playlist
    fn remove_track_from_playlist(&mut self, playlist: &PlaylistId, track: &TrackId)
        -> Result<()>;

    /// Remove a track from the library and from every playlist
    fn remove_track_from_library(&mut self, track: &TrackId) -> Result<()>;
}

/// In-memory catalog
///
/// Keeps insertion order for the library so `list_tracks` is stable.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tracks: Vec<Track>,
    playlists: Vec<Playlist>,
}

impl MemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track to the library
    ///
    /// A track with an id that is already present replaces the old entry in place.
    pub fn add_track(&mut self, track: Track) {
        if let Some(existing) = self.tracks.iter_mut().find(|t| t.id == track.id) {
            *existing = track;
        } else {
            self.tracks.push(track);
        }
    }

    fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    fn playlist_mut(&mut self, id: &PlaylistId) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CoreError::PlaylistNotFound(id.clone()))
    }

    /// Trimmed, non-empty name not used by any playlist other than `renaming`
    fn validate_name(&self, name: &str, renaming: Option<&PlaylistId>) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::invalid_input("playlist name is empty"));
        }
        if self
            .playlists
            .iter()
            .any(|p| p.name == name && Some(&p.id) != renaming)
        {
            return Err(CoreError::Duplicate(name.to_string()));
        }
        Ok(name.to_string())
    }
}

impl Catalog for MemoryCatalog {
    fn list_tracks(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    fn playlist_tracks(&self, playlist: &PlaylistId) -> Result<Vec<Track>> {
        let playlist = self
            .playlists
            .iter()
            .find(|p| &p.id == playlist)
            .ok_or_else(|| CoreError::PlaylistNotFound(playlist.clone()))?;

        Ok(playlist
            .tracks
            .iter()
            .filter_map(|id| self.track(id).cloned())
            .collect())
    }

    fn playlists(&self) -> Vec<Playlist> {
        self.playlists.clone()
    }

    fn create_playlist(&mut self, name: &str) -> Result<PlaylistId> {
        let name = self.validate_name(name, None)?;
        let playlist = Playlist::new(name);
        let id = playlist.id.clone();
        debug!("Created playlist {} ({})", playlist.name, id);
        self.playlists.push(playlist);
        Ok(id)
    }

    fn rename_playlist(&mut self, playlist: &PlaylistId, name: &str) -> Result<()> {
        let name = self.validate_name(name, Some(playlist))?;
        self.playlist_mut(playlist)?.name = name;
        Ok(())
    }

    fn delete_playlist(&mut self, playlist: &PlaylistId) -> Result<()> {
        let before = self.playlists.len();
        self.playlists.retain(|p| &p.id != playlist);
        if self.playlists.len() == before {
            return Err(CoreError::PlaylistNotFound(playlist.clone()));
        }
        debug!("Deleted playlist {}", playlist);
        Ok(())
    }

    fn add_track_to_playlist(&mut self, playlist: &PlaylistId, track: &TrackId) -> Result<()> {
        if self.track(track).is_none() {
            return Err(CoreError::TrackNotFound(track.clone()));
        }
        self.playlist_mut(playlist)?.tracks.push(track.clone());
        Ok(())
    }

    fn remove_track_from_playlist(
        &mut self,
        playlist: &PlaylistId,
        track: &TrackId,
    ) -> Result<()> {
        let playlist = self.playlist_mut(playlist)?;
        let before = playlist.tracks.len();
        playlist.tracks.retain(|id| id != track);
        if playlist.tracks.len() == before {
            return Err(CoreError::TrackNotFound(track.clone()));
        }
        Ok(())
    }

    fn remove_track_from_library(&mut self, track: &TrackId) -> Result<()> {
        let before = self.tracks.len();
        self.tracks.retain(|t| &t.id != track);
        if self.tracks.len() == before {
            return Err(CoreError::TrackNotFound(track.clone()));
        }
        for playlist in &mut self.playlists {
            playlist.tracks.retain(|id| id != track);
        }
        debug!("Removed track {} from library", track);
        Ok(())
    }
}
