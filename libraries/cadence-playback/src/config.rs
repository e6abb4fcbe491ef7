//! Playback configuration

use crate::error::{PlaybackError, Result};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::types::RepeatMode;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Startup settings for the playback coordinator
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Number of previously played tracks kept for "previous"
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Shuffle on startup
    #[serde(default)]
    pub shuffle: bool,

    /// Repeat mode on startup
    #[serde(default)]
    pub repeat: RepeatMode,

    /// Initial linear volume (0.0-1.0)
    #[serde(default = "default_volume")]
    pub volume: f64,

    /// Fixed shuffle seed for reproducible sessions
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            shuffle: false,
            repeat: RepeatMode::Off,
            volume: default_volume(),
            shuffle_seed: None,
        }
    }
}

impl PlaybackConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Environment variables are prefixed with `CADENCE_`, for example
    /// `CADENCE_HISTORY_CAPACITY=64` or `CADENCE_REPEAT=all`. They override
    /// values from the file. The result is validated before it is returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| PlaybackError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(PlaybackError::Config(
                "history_capacity must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.volume) {
            return Err(PlaybackError::Config(format!(
                "volume must be between 0.0 and 1.0, got {}",
                self.volume
            )));
        }

        Ok(())
    }

    /// Random source for shuffling, seeded if a seed is configured
    pub fn rng(&self) -> StdRng {
        match self.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

// Default values
fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_volume() -> f64 {
    1.0
}
