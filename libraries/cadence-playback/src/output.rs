//! Audio output collaborator
//!
//! Abstracts whatever actually renders audio (a desktop device, a mobile
//! bridge, a test double). The coordinator is its only owner; dropping the
//! coordinator drops the output.

use crate::error::{PlaybackError, Result};
use cadence_core::{Track, TrackId};
use std::time::Duration;

/// Platform-agnostic audio output
///
/// Implementors load one track at a time and report progress back through
/// [`OutputEvent`]s, which the owner feeds to
/// [`PlaybackCoordinator::handle_output_event`](crate::PlaybackCoordinator::handle_output_event).
pub trait AudioOutput: Send {
    /// Load `track`, replacing whatever was loaded
    ///
    /// The play/pause state is not changed by loading.
    fn load(&mut self, track: &Track) -> Result<()>;

    /// Release the loaded track
    fn unload(&mut self);

    /// Start or resume playback of the loaded track
    fn play(&mut self);

    /// Pause, keeping the position
    fn pause(&mut self);

    /// Stop playback
    fn stop(&mut self);

    /// Seek within the loaded track
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Set linear volume (0.0-1.0)
    fn set_volume(&mut self, volume: f64);

    /// Mute or unmute
    fn set_muted(&mut self, muted: bool);

    /// Identity of the loaded track
    fn loaded(&self) -> Option<&TrackId>;

    /// Whether audio is currently playing
    fn is_playing(&self) -> bool;
}

/// Notifications from the audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    /// Periodic position update
    PositionChanged {
        /// Current position
        position: Duration,
        /// Duration of the loaded track
        duration: Duration,
    },

    /// The loaded track played to its end
    PlaybackCompleted,
}

/// Output that renders nothing
///
/// Tracks load/play state faithfully, which makes it usable for headless
/// sessions and as a stand-in when no device is available.
#[derive(Debug, Default)]
pub struct NullOutput {
    loaded: Option<Track>,
    playing: bool,
    position: Duration,
    volume: f64,
    muted: bool,
}

impl NullOutput {
    /// Create an output with nothing loaded
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Last seek position
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Volume last applied
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl AudioOutput for NullOutput {
    fn load(&mut self, track: &Track) -> Result<()> {
        self.loaded = Some(track.clone());
        self.position = Duration::ZERO;
        Ok(())
    }

    fn unload(&mut self) {
        self.loaded = None;
        self.playing = false;
        self.position = Duration::ZERO;
    }

    fn play(&mut self) {
        self.playing = self.loaded.is_some();
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = Duration::ZERO;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let track = self.loaded.as_ref().ok_or(PlaybackError::NoTrackLoaded)?;
        if let Some(duration) = track.duration {
            if position > duration {
                return Err(PlaybackError::output(format!(
                    "seek to {:?} past end of {} ({:?})",
                    position, track.id, duration
                )));
            }
        }
        self.position = position;
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn loaded(&self) -> Option<&TrackId> {
        self.loaded.as_ref().map(|track| &track.id)
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
