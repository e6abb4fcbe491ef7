//! Output volume
//!
//! Linear 0.0-1.0 level plus a mute flag. Muting never loses the level, so
//! unmuting restores what the user last heard.

use serde::{Deserialize, Serialize};

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Linear level (0.0-1.0)
    level: f64,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level` into 0.0-1.0
    pub fn new(level: f64) -> Self {
        let mut volume = Self {
            level: 1.0,
            muted: false,
        };
        volume.set_level(level);
        volume
    }

    /// Set volume level
    ///
    /// Values above 1.0 clamp to 1.0. Zero or below (and NaN) mutes and keeps
    /// the previous level; any audible value unmutes.
    pub fn set_level(&mut self, level: f64) {
        if level.is_nan() || level <= 0.0 {
            self.muted = true;
        } else {
            self.level = level.min(1.0);
            self.muted = false;
        }
    }

    /// Last audible level (0.0-1.0)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Set mute state
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
