//! Cadence - Playback Scheduling
//!
//! Decides which track plays next and keeps an audio output in step with
//! that decision.
//!
//! This crate provides:
//! - Track pickers (sequential, shuffle, single) over a fixed candidate list
//! - A picker factory mapping shuffle/repeat flags to a picker
//! - A layered schedule for ad-hoc enqueueing with repeat-once, repeat-track
//!   and repeat-all
//! - A bounded, browsable playback history
//! - The playback coordinator that ties selection to an [`AudioOutput`]
//! - A tokio service that serializes UI calls and output callbacks
//!
//! # Architecture
//!
//! `cadence-playback` renders no audio itself. The platform supplies an
//! [`AudioOutput`] and feeds its notifications back as [`OutputEvent`]s.
//! All randomness goes through seedable generators.
//!
//! # Example: List Playback
//!
//! ```rust
//! use cadence_core::Track;
//! use cadence_playback::{NullOutput, PlaybackConfig, PlaybackCoordinator, PlaybackEvent};
//! use std::path::PathBuf;
//!
//! let tracks: Vec<Track> = ["a", "b", "c"]
//!     .iter()
//!     .map(|id| Track::new(*id, format!("Track {}", id), PathBuf::from(format!("/music/{}.flac", id))))
//!     .collect();
//!
//! let mut coordinator = PlaybackCoordinator::new(NullOutput::new(), &PlaybackConfig::default());
//! coordinator.play_list(tracks, 0)?;
//! coordinator.resume()?;
//!
//! // Toggling shuffle keeps the current track
//! coordinator.set_shuffle(true)?;
//! assert_eq!(coordinator.current().unwrap().id.as_str(), "a");
//!
//! coordinator.next()?;
//! assert!(coordinator
//!     .drain_events()
//!     .iter()
//!     .any(|e| matches!(e, PlaybackEvent::TrackMounted { .. })));
//! # Ok::<(), cadence_playback::PlaybackError>(())
//! ```
//!
//! # Example: Repeat Modes
//!
//! ```rust
//! use cadence_playback::RepeatMode;
//!
//! let mode: RepeatMode = "track-once".parse().unwrap();
//! assert_eq!(mode, RepeatMode::TrackOnce);
//! assert!("sideways".parse::<RepeatMode>().is_err());
//! ```

mod config;
mod coordinator;
mod error;
mod events;
pub mod factory;
mod history;
mod output;
pub mod picker;
mod schedule;
mod service;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use config::PlaybackConfig;
pub use coordinator::{PlaybackCoordinator, PlaybackSnapshot};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use factory::create_picker;
pub use history::{HistoryRing, DEFAULT_HISTORY_CAPACITY};
pub use output::{AudioOutput, NullOutput, OutputEvent};
pub use picker::{SequentialPicker, ShufflePicker, SinglePicker, TrackPicker};
pub use schedule::{PlaybackSchedule, ScheduleEntry, SATISFIED_LAYER};
pub use service::{PlaybackCommand, PlaybackHandle, PlaybackService};
pub use shuffle::{pick_uniform, shuffled_order};
pub use types::{PlaybackState, RepeatMode};
pub use volume::Volume;
