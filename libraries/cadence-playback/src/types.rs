//! Core types for playback management

use crate::error::PlaybackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repeat mode
///
/// Shared by the list pickers and the layered schedule. `All` repeats the whole
/// candidate list (pickers) or starts a fresh pass over the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatMode {
    /// Stop when the list or schedule is exhausted
    #[default]
    Off,

    /// Play the current track one extra time, then continue
    TrackOnce,

    /// Loop the current track forever
    Track,

    /// Loop the entire list / schedule
    All,
}

impl RepeatMode {
    /// Numeric code used by older settings stores
    pub fn code(self) -> i32 {
        match self {
            RepeatMode::Off => 0,
            RepeatMode::TrackOnce => 1,
            RepeatMode::Track => 2,
            RepeatMode::All => 3,
        }
    }

    /// Whether any kind of repeat is active
    pub fn is_repeating(self) -> bool {
        self != RepeatMode::Off
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepeatMode::Off => "off",
            RepeatMode::TrackOnce => "track-once",
            RepeatMode::Track => "track",
            RepeatMode::All => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for RepeatMode {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(RepeatMode::Off),
            "track-once" | "repeat-track-once" | "once" => Ok(RepeatMode::TrackOnce),
            "track" | "repeat-track" | "one" => Ok(RepeatMode::Track),
            "all" | "repeat-all" | "repeat-schedule" => Ok(RepeatMode::All),
            other => Err(PlaybackError::UnsupportedRepeatMode(other.to_string())),
        }
    }
}

impl TryFrom<i32> for RepeatMode {
    type Error = PlaybackError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RepeatMode::Off),
            1 => Ok(RepeatMode::TrackOnce),
            2 => Ok(RepeatMode::Track),
            3 => Ok(RepeatMode::All),
            other => Err(PlaybackError::UnsupportedRepeatMode(other.to_string())),
        }
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing audible; a track may still be selected
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}
