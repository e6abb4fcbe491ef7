//! Playback Events
//!
//! Event-based communication for UI synchronization. The coordinator buffers
//! events as it works and hands them out in emission order, either through
//! `drain_events` or the service's event channel.
//!
//! Ordering: when one track replaces another, `TrackUnmounted` for the old
//! track is always emitted before `TrackMounted` for the new one.

use crate::types::PlaybackState;
use cadence_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A track was taken off the audio output
    TrackUnmounted {
        /// ID of the removed track
        track_id: TrackId,
    },

    /// A track was loaded into the audio output
    TrackMounted {
        /// ID of the loaded track
        track_id: TrackId,
    },

    /// Playback state changed (playing, paused, stopped)
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// The selected track changed, or the selection was cleared
    SelectionChanged {
        /// ID of the new current track
        current: Option<TrackId>,
    },

    /// Position update forwarded from the audio output
    PositionChanged {
        /// Current playback position
        position_ms: u64,
        /// Total track duration
        duration_ms: u64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f64,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Error occurred during playback
    Error {
        /// Error message
        message: String,
    },
}

impl PlaybackEvent {
    /// Whether this event reports a mount or unmount
    pub fn is_mount_change(&self) -> bool {
        matches!(
            self,
            PlaybackEvent::TrackMounted { .. } | PlaybackEvent::TrackUnmounted { .. }
        )
    }
}
