//! Shared helpers for playback integration tests

use cadence_core::{Track, TrackId};
use cadence_playback::{AudioOutput, PlaybackConfig, PlaybackCoordinator, PlaybackError, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub fn track(id: &str) -> Track {
    Track::new(id, format!("Track {}", id), PathBuf::from(format!("/music/{}.flac", id)))
        .with_duration(Duration::from_secs(200))
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

/// Every call the coordinator made on the output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    Load(TrackId),
    Unload,
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Volume(f64),
    Muted(bool),
}

/// Output double that records calls and can refuse to load given tracks
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub calls: Vec<OutputCall>,
    pub broken: HashSet<TrackId>,
    loaded: Option<TrackId>,
    playing: bool,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loads(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                OutputCall::Load(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl AudioOutput for RecordingOutput {
    fn load(&mut self, track: &Track) -> Result<()> {
        if self.broken.contains(&track.id) {
            return Err(PlaybackError::output(format!("cannot open {}", track.path.display())));
        }
        self.calls.push(OutputCall::Load(track.id.clone()));
        self.loaded = Some(track.id.clone());
        Ok(())
    }

    fn unload(&mut self) {
        self.calls.push(OutputCall::Unload);
        self.loaded = None;
        self.playing = false;
    }

    fn play(&mut self) {
        self.calls.push(OutputCall::Play);
        self.playing = self.loaded.is_some();
    }

    fn pause(&mut self) {
        self.calls.push(OutputCall::Pause);
        self.playing = false;
    }

    fn stop(&mut self) {
        self.calls.push(OutputCall::Stop);
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.calls.push(OutputCall::Seek(position));
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) {
        self.calls.push(OutputCall::Volume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.push(OutputCall::Muted(muted));
    }

    fn loaded(&self) -> Option<&TrackId> {
        self.loaded.as_ref()
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

pub fn seeded_config(seed: u64) -> PlaybackConfig {
    PlaybackConfig {
        shuffle_seed: Some(seed),
        ..PlaybackConfig::default()
    }
}

pub fn coordinator() -> PlaybackCoordinator<RecordingOutput> {
    init_tracing();
    PlaybackCoordinator::new(RecordingOutput::new(), &seeded_config(42))
}

pub fn current_id<O: AudioOutput>(coordinator: &PlaybackCoordinator<O>) -> Option<String> {
    coordinator.current().map(|t| t.id.to_string())
}
