//! Serialized playback dispatch
//!
//! Moves a [`PlaybackCoordinator`] into one tokio task. UI calls and audio
//! output callbacks arrive as [`PlaybackCommand`]s on the same channel, so
//! they run strictly one at a time against the coordinator.

use crate::{
    coordinator::{PlaybackCoordinator, PlaybackSnapshot},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    output::{AudioOutput, OutputEvent},
    types::RepeatMode,
};
use cadence_core::{Track, TrackId};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Commands sent to the playback task
#[derive(Debug)]
pub enum PlaybackCommand {
    /// Play one ad-hoc track
    PlayTrack(Track),

    /// Play a list from a start index
    PlayList {
        /// Candidate list
        tracks: Vec<Track>,
        /// Index of the first track to play
        start_index: usize,
    },

    /// Enqueue a track
    Enqueue(Track),

    /// Drop everything queued behind the current track
    ClearQueue,

    /// Skip to next track
    Next,

    /// Go to previous track
    Previous,

    /// Start or resume playback
    Resume,

    /// Pause playback
    Pause,

    /// Stop playback
    Stop,

    /// Seek within the loaded track
    Seek(Duration),

    /// Set shuffle
    SetShuffle(bool),

    /// Set repeat mode
    SetRepeat(RepeatMode),

    /// Set linear volume (0.0-1.0)
    SetVolume(f64),

    /// Mute or unmute
    SetMuted(bool),

    /// Candidate list changed in the catalog
    RefreshCandidates(Vec<Track>),

    /// Track removed from the library
    RemoveTrack(TrackId),

    /// Notification from the audio output
    Output(OutputEvent),

    /// Request a snapshot of the coordinator
    Snapshot(oneshot::Sender<PlaybackSnapshot>),
}

/// Cloneable handle to a running playback service
///
/// The task ends once every handle is dropped.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    command_tx: mpsc::UnboundedSender<PlaybackCommand>,
}

impl PlaybackHandle {
    /// Send a raw command
    pub fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| PlaybackError::ServiceClosed)
    }

    /// Play one ad-hoc track
    pub fn play_track(&self, track: Track) -> Result<()> {
        self.send(PlaybackCommand::PlayTrack(track))
    }

    /// Play a list from a start index
    pub fn play_list(&self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        self.send(PlaybackCommand::PlayList {
            tracks,
            start_index,
        })
    }

    /// Enqueue a track
    pub fn enqueue(&self, track: Track) -> Result<()> {
        self.send(PlaybackCommand::Enqueue(track))
    }

    /// Drop everything queued behind the current track
    pub fn clear_queue(&self) -> Result<()> {
        self.send(PlaybackCommand::ClearQueue)
    }

    /// Skip to next track
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Result<()> {
        self.send(PlaybackCommand::Next)
    }

    /// Go to previous track
    pub fn previous(&self) -> Result<()> {
        self.send(PlaybackCommand::Previous)
    }

    /// Start or resume playback
    pub fn resume(&self) -> Result<()> {
        self.send(PlaybackCommand::Resume)
    }

    /// Pause playback
    pub fn pause(&self) -> Result<()> {
        self.send(PlaybackCommand::Pause)
    }

    /// Stop playback
    pub fn stop(&self) -> Result<()> {
        self.send(PlaybackCommand::Stop)
    }

    /// Seek within the loaded track
    pub fn seek(&self, position: Duration) -> Result<()> {
        self.send(PlaybackCommand::Seek(position))
    }

    /// Set shuffle
    pub fn set_shuffle(&self, shuffle: bool) -> Result<()> {
        self.send(PlaybackCommand::SetShuffle(shuffle))
    }

    /// Set repeat mode
    pub fn set_repeat(&self, repeat: RepeatMode) -> Result<()> {
        self.send(PlaybackCommand::SetRepeat(repeat))
    }

    /// Set linear volume (0.0-1.0)
    pub fn set_volume(&self, level: f64) -> Result<()> {
        self.send(PlaybackCommand::SetVolume(level))
    }

    /// Mute or unmute
    pub fn set_muted(&self, muted: bool) -> Result<()> {
        self.send(PlaybackCommand::SetMuted(muted))
    }

    /// Report a changed candidate list
    pub fn refresh_candidates(&self, tracks: Vec<Track>) -> Result<()> {
        self.send(PlaybackCommand::RefreshCandidates(tracks))
    }

    /// Report a track removed from the library
    pub fn remove_track(&self, id: TrackId) -> Result<()> {
        self.send(PlaybackCommand::RemoveTrack(id))
    }

    /// Forward an audio output notification
    pub fn output_event(&self, event: OutputEvent) -> Result<()> {
        self.send(PlaybackCommand::Output(event))
    }

    /// Snapshot of the coordinator after all previously sent commands
    pub async fn snapshot(&self) -> Result<PlaybackSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(PlaybackCommand::Snapshot(reply_tx))?;
        reply_rx.await.map_err(|_| PlaybackError::ServiceClosed)
    }
}

/// Playback service
pub struct PlaybackService;

impl PlaybackService {
    /// Spawn the playback task on the current tokio runtime
    ///
    /// Returns the command handle, the event stream and the task handle.
    pub fn spawn<O: AudioOutput + 'static>(
        coordinator: PlaybackCoordinator<O>,
    ) -> (
        PlaybackHandle,
        mpsc::UnboundedReceiver<PlaybackEvent>,
        JoinHandle<()>,
    ) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(Self::run(coordinator, command_rx, event_tx));

        (PlaybackHandle { command_tx }, event_rx, task)
    }

    async fn run<O: AudioOutput>(
        mut coordinator: PlaybackCoordinator<O>,
        mut command_rx: mpsc::UnboundedReceiver<PlaybackCommand>,
        event_tx: mpsc::UnboundedSender<PlaybackEvent>,
    ) {
        info!("Playback service started");

        while let Some(command) = command_rx.recv().await {
            debug!("Dispatching {:?}", command);

            if let Err(e) = Self::dispatch(&mut coordinator, command) {
                warn!("Playback command failed: {}", e);
                // Forward what happened before the failure, then the failure itself
                for event in coordinator.drain_events() {
                    let _ = event_tx.send(event);
                }
                let _ = event_tx.send(PlaybackEvent::Error {
                    message: e.to_string(),
                });
                continue;
            }

            for event in coordinator.drain_events() {
                let _ = event_tx.send(event);
            }
        }

        info!("Playback service stopped");
    }

    fn dispatch<O: AudioOutput>(
        coordinator: &mut PlaybackCoordinator<O>,
        command: PlaybackCommand,
    ) -> Result<()> {
        match command {
            PlaybackCommand::PlayTrack(track) => coordinator.play_track(track),
            PlaybackCommand::PlayList {
                tracks,
                start_index,
            } => coordinator.play_list(tracks, start_index),
            PlaybackCommand::Enqueue(track) => coordinator.enqueue(track),
            PlaybackCommand::ClearQueue => coordinator.clear_queue(),
            PlaybackCommand::Next => coordinator.next().map(|_| ()),
            PlaybackCommand::Previous => coordinator.previous().map(|_| ()),
            PlaybackCommand::Resume => coordinator.resume(),
            PlaybackCommand::Pause => {
                coordinator.pause();
                Ok(())
            }
            PlaybackCommand::Stop => {
                coordinator.stop();
                Ok(())
            }
            PlaybackCommand::Seek(position) => coordinator.seek(position),
            PlaybackCommand::SetShuffle(shuffle) => coordinator.set_shuffle(shuffle),
            PlaybackCommand::SetRepeat(repeat) => coordinator.set_repeat_mode(repeat),
            PlaybackCommand::SetVolume(level) => {
                coordinator.set_volume(level);
                Ok(())
            }
            PlaybackCommand::SetMuted(muted) => {
                coordinator.set_muted(muted);
                Ok(())
            }
            PlaybackCommand::RefreshCandidates(tracks) => coordinator.refresh_candidates(&tracks),
            PlaybackCommand::RemoveTrack(id) => coordinator.remove_track(&id),
            PlaybackCommand::Output(event) => coordinator.handle_output_event(event),
            PlaybackCommand::Snapshot(reply) => {
                let _ = reply.send(coordinator.snapshot());
                Ok(())
            }
        }
    }
}
