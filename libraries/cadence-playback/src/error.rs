//! Error types for playback management

use cadence_core::CoreError;
use thiserror::Error;

/// Playback errors
///
/// Running out of tracks is never an error; these are contract violations,
/// collaborator failures and configuration problems.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A list-based picker was built over an empty candidate list
    #[error("Candidate list is empty")]
    EmptyCandidates,

    /// Start index does not address a candidate
    #[error("Start index {index} out of range for {len} candidates")]
    StartIndexOutOfRange { index: usize, len: usize },

    /// Repeat mode name or code not recognised
    #[error("Unsupported repeat mode: {0}")]
    UnsupportedRepeatMode(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Audio output failed (load, seek, ...)
    #[error("Audio output error: {0}")]
    Output(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The playback service task is gone
    #[error("Playback service closed")]
    ServiceClosed,

    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CoreError),
}

impl PlaybackError {
    /// Create an output error
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
