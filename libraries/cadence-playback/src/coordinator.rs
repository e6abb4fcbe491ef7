//! Playback coordinator - core orchestration
//!
//! Single entry point for UI calls and audio output callbacks. Owns the
//! selection (a list picker or a layered schedule), the history ring, the
//! volume and the audio output, and keeps the output's loaded track in step
//! with the selected one.
//!
//! Not thread-safe: callers serialize access, typically through
//! [`crate::PlaybackService`].

use crate::{
    config::PlaybackConfig,
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    factory::create_picker,
    history::HistoryRing,
    output::{AudioOutput, OutputEvent},
    picker::{SinglePicker, TrackPicker},
    schedule::PlaybackSchedule,
    types::{PlaybackState, RepeatMode},
    volume::Volume,
};
use cadence_core::{Track, TrackId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Picker over a fixed candidate list
#[derive(Debug)]
struct ListSession {
    candidates: Arc<[Track]>,
    picker: TrackPicker,
}

impl ListSession {
    /// Tracks that would follow the current one
    ///
    /// A repeating single-track picker over a longer list still reports the
    /// rest of the list in list order.
    fn upcoming(&self) -> Vec<Track> {
        match &self.picker {
            TrackPicker::Single(_) if self.candidates.len() > 1 => {
                let index = self.picker.candidate_index();
                self.candidates[index + 1..]
                    .iter()
                    .chain(&self.candidates[..index])
                    .cloned()
                    .collect()
            }
            picker => picker.upcoming(),
        }
    }
}

#[derive(Debug)]
enum Selection {
    Idle,
    List(ListSession),
    Schedule(PlaybackSchedule),
}

/// Point-in-time view of the coordinator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    /// Selected track
    pub current: Option<Track>,
    /// Playback state
    pub state: PlaybackState,
    /// Shuffle flag
    pub shuffle: bool,
    /// Repeat mode
    pub repeat: RepeatMode,
    /// Linear volume (0.0-1.0)
    pub volume: f64,
    /// Mute flag
    pub muted: bool,
    /// Tracks in history
    pub history_len: usize,
    /// Whether "previous" is browsing history
    pub browsing_history: bool,
}

/// Build the picker for a list, degrading one-track lists to a single picker
fn build_picker(
    candidates: Arc<[Track]>,
    start_index: usize,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut StdRng,
) -> Result<TrackPicker> {
    if candidates.len() == 1 {
        return Ok(TrackPicker::Single(SinglePicker::from_candidates(
            &candidates,
            start_index,
            repeat.is_repeating(),
        )?));
    }
    create_picker(candidates, start_index, shuffle, repeat, rng)
}

/// Playback coordinator
pub struct PlaybackCoordinator<O: AudioOutput> {
    output: O,
    selection: Selection,
    history: HistoryRing,
    shuffle: bool,
    repeat: RepeatMode,
    volume: Volume,
    state: PlaybackState,
    rng: StdRng,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<O: AudioOutput> PlaybackCoordinator<O> {
    /// Create a coordinator that owns `output`
    pub fn new(mut output: O, config: &PlaybackConfig) -> Self {
        let volume = Volume::new(config.volume);
        output.set_volume(volume.level());
        output.set_muted(volume.is_muted());

        Self {
            output,
            selection: Selection::Idle,
            history: HistoryRing::new(config.history_capacity),
            shuffle: config.shuffle,
            repeat: config.repeat,
            volume,
            state: PlaybackState::Stopped,
            rng: config.rng(),
            pending_events: Vec::new(),
        }
    }

    // ===== Selection =====

    /// Play a single ad-hoc track, discarding the previous selection
    ///
    /// During schedule playback the schedule is reseeded with the track.
    /// The play/pause state is kept; call [`resume`](Self::resume) to start.
    pub fn play_track(&mut self, track: Track) -> Result<()> {
        let before = self.current_id();
        self.record_departure();
        self.history.return_to_live();

        if let Selection::Schedule(schedule) = &mut self.selection {
            schedule.play_immediately(track);
        } else {
            let candidates: Arc<[Track]> = Arc::from(vec![track]);
            let picker = TrackPicker::Single(SinglePicker::from_candidates(
                &candidates,
                0,
                self.repeat.is_repeating(),
            )?);
            self.selection = Selection::List(ListSession { candidates, picker });
            self.schedule_repeat_once();
        }

        self.selection_changed(before)
    }

    /// Play `tracks` starting at `start_index`
    ///
    /// An empty list clears playback. The play/pause state is kept.
    pub fn play_list(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        let before = self.current_id();

        if tracks.is_empty() {
            debug!("Empty list, clearing playback");
            self.record_departure();
            self.history.return_to_live();
            self.selection = Selection::Idle;
            return self.selection_changed(before);
        }

        let candidates: Arc<[Track]> = Arc::from(tracks);
        let picker = build_picker(
            candidates.clone(),
            start_index,
            self.shuffle,
            self.repeat,
            &mut self.rng,
        )?;

        self.record_departure();
        self.history.return_to_live();
        self.selection = Selection::List(ListSession { candidates, picker });
        self.schedule_repeat_once();
        self.selection_changed(before)
    }

    /// Enqueue a track behind everything currently due
    ///
    /// List playback is converted into a layered schedule first: the current
    /// track stays current, the enqueued track comes next, followed by the
    /// rest of the list in play order. With shuffle on, the enqueued track
    /// and the rest of the list are drawn in random order instead.
    pub fn enqueue(&mut self, track: Track) -> Result<()> {
        let before = self.current_id();
        let seed = self.rng.gen();

        match std::mem::replace(&mut self.selection, Selection::Idle) {
            Selection::Idle => {
                let mut schedule = self.new_schedule(seed);
                schedule.enqueue(track);
                self.selection = Selection::Schedule(schedule);
            }
            Selection::Schedule(mut schedule) => {
                schedule.enqueue(track);
                self.selection = Selection::Schedule(schedule);
            }
            Selection::List(session) => {
                let schedule = self.list_to_schedule(&session, Some(track), seed);
                self.selection = Selection::Schedule(schedule);
            }
        }

        self.selection_changed(before)
    }

    /// Drop everything queued behind the current track
    ///
    /// The current track stays selected and keeps playing. A cleared schedule
    /// stops once it ends; list playback still honors a repeating mode.
    pub fn clear_queue(&mut self) -> Result<()> {
        match &mut self.selection {
            Selection::Idle => {}
            Selection::Schedule(schedule) => schedule.clear(),
            Selection::List(session) => {
                if let Some(current) = session.picker.current().cloned() {
                    let candidates: Arc<[Track]> = Arc::from(vec![current]);
                    session.picker = TrackPicker::Single(SinglePicker::from_candidates(
                        &candidates,
                        0,
                        self.repeat.is_repeating(),
                    )?);
                    session.candidates = candidates;
                }
            }
        }
        debug!("Cleared queue");
        self.schedule_repeat_once();
        Ok(())
    }

    /// Layered schedule holding the session's current track, then `adhoc`,
    /// then the rest of the list in play order
    fn list_to_schedule(
        &self,
        session: &ListSession,
        adhoc: Option<Track>,
        seed: u64,
    ) -> PlaybackSchedule {
        let mut schedule = self.new_schedule(seed);
        if let Some(current) = session.picker.current() {
            schedule.play_immediately(current.clone());
        }
        if let Some(track) = adhoc {
            schedule.enqueue(track);
        }
        let upcoming = session.upcoming();
        debug!(
            "Converting list playback into a schedule ({} upcoming tracks)",
            upcoming.len()
        );
        for track in upcoming {
            schedule.enqueue(track);
        }
        schedule
    }

    /// Move list playback onto a schedule while repeat-once is active
    ///
    /// List pickers have no per-track play count, so they cannot stop after
    /// the single extra play; the schedule can.
    fn schedule_repeat_once(&mut self) {
        if self.repeat != RepeatMode::TrackOnce || !matches!(self.selection, Selection::List(_)) {
            return;
        }
        let seed = self.rng.gen();
        if let Selection::List(session) = std::mem::replace(&mut self.selection, Selection::Idle) {
            self.selection = Selection::Schedule(self.list_to_schedule(&session, None, seed));
        }
    }

    fn new_schedule(&self, seed: u64) -> PlaybackSchedule {
        let mut schedule = PlaybackSchedule::new(StdRng::seed_from_u64(seed));
        schedule.set_shuffle(self.shuffle);
        schedule.set_repeat(self.repeat);
        schedule
    }

    // ===== Navigation =====

    /// Skip to the next track and play it
    ///
    /// Returns `false` when there is nothing left to play; playback is
    /// stopped in that case.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<bool> {
        let departing = self.current().cloned();
        let was_live = !self.history.is_browsing();

        let moved = match &mut self.selection {
            Selection::Idle => false,
            Selection::List(session) => session.picker.move_next(),
            Selection::Schedule(schedule) => schedule.next(&mut self.history).is_some(),
        };

        if !moved {
            debug!("Nothing left to play");
            self.halt();
            return Ok(false);
        }

        if was_live {
            self.record(departing.as_ref());
        }
        self.land(departing.as_ref().map(|t| &t.id))?;
        Ok(true)
    }

    /// Go to the previous track and play it
    ///
    /// Returns `false` when there is nothing earlier; the current track is
    /// restarted instead.
    pub fn previous(&mut self) -> Result<bool> {
        let departing = self.current().cloned();

        let moved = match &mut self.selection {
            Selection::Idle => return Ok(false),
            Selection::List(session) => session.picker.move_previous(),
            Selection::Schedule(schedule) => {
                schedule.previous(&mut self.history);
                self.history.is_browsing()
            }
        };

        if !moved {
            if self.current().is_some() {
                self.restart()?;
                self.resume()?;
            }
            return Ok(false);
        }

        if matches!(self.selection, Selection::List(_)) {
            self.record(departing.as_ref());
        }
        self.land(departing.as_ref().map(|t| &t.id))?;
        Ok(true)
    }

    /// Mount the newly selected track (or restart the same one) and play
    fn land(&mut self, departing: Option<&TrackId>) -> Result<()> {
        if self.current_id().as_ref() == departing {
            self.restart()?;
        } else {
            self.emit_selection();
            self.update_audio_output()?;
        }
        self.resume()
    }

    fn restart(&mut self) -> Result<()> {
        if self.output.loaded().is_some() {
            self.output.seek(Duration::ZERO)
        } else {
            self.update_audio_output()
        }
    }

    // ===== Playback Control =====

    /// Start or resume playback of the selected track
    pub fn resume(&mut self) -> Result<()> {
        let Some(current) = self.current_id() else {
            return Err(PlaybackError::NoTrackLoaded);
        };
        if self.output.loaded() != Some(&current) {
            self.update_audio_output()?;
        }

        self.output.play();
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.output.pause();
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Stop playback
    ///
    /// The selection is kept; [`resume`](Self::resume) starts the current
    /// track again.
    pub fn stop(&mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.output.stop();
        self.set_state(PlaybackState::Stopped);
    }

    /// Seek within the loaded track
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        if self.output.loaded().is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.output.seek(position)
    }

    // ===== Volume =====

    /// Set linear volume (0.0-1.0); zero or below mutes
    pub fn set_volume(&mut self, level: f64) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Mute or unmute, keeping the level
    pub fn set_muted(&mut self, muted: bool) {
        self.volume.set_muted(muted);
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        self.output.set_volume(self.volume.level());
        self.output.set_muted(self.volume.is_muted());
        self.emit(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    // ===== Policy =====

    /// Enable or disable shuffle
    ///
    /// List playback regenerates its picker around the current track.
    pub fn set_shuffle(&mut self, shuffle: bool) -> Result<()> {
        self.shuffle = shuffle;
        self.regenerate()
    }

    /// Simple repeat toggle: on maps to [`RepeatMode::All`]
    pub fn set_repeat(&mut self, repeat: bool) -> Result<()> {
        self.set_repeat_mode(if repeat {
            RepeatMode::All
        } else {
            RepeatMode::Off
        })
    }

    /// Set repeat mode
    pub fn set_repeat_mode(&mut self, repeat: RepeatMode) -> Result<()> {
        self.repeat = repeat;
        self.regenerate()
    }

    fn regenerate(&mut self) -> Result<()> {
        let (shuffle, repeat) = (self.shuffle, self.repeat);
        match &mut self.selection {
            Selection::Idle => {}
            Selection::List(session) => {
                let index = session.picker.candidate_index();
                session.picker =
                    build_picker(session.candidates.clone(), index, shuffle, repeat, &mut self.rng)?;
            }
            Selection::Schedule(schedule) => {
                schedule.set_shuffle(shuffle);
                schedule.set_repeat(repeat);
            }
        }
        self.schedule_repeat_once();
        debug!("Policy changed (shuffle: {}, repeat: {})", shuffle, repeat);
        Ok(())
    }

    // ===== Catalog changes =====

    /// Replace the candidate list after a catalog change
    ///
    /// List playback is rebuilt over `tracks`, keeping the current track. If
    /// the current track is gone, playback falls back to the first upcoming
    /// track still present, else to the first track. Schedule playback drops
    /// entries whose track is not in `tracks`.
    pub fn refresh_candidates(&mut self, tracks: &[Track]) -> Result<()> {
        let before = self.current_id();

        match std::mem::replace(&mut self.selection, Selection::Idle) {
            Selection::Idle => {}
            Selection::List(session) => {
                if tracks.is_empty() {
                    warn!("Candidate list became empty, clearing playback");
                } else {
                    let index = Self::rebase(&session, tracks);
                    let candidates: Arc<[Track]> = Arc::from(tracks);
                    let picker = build_picker(
                        candidates.clone(),
                        index,
                        self.shuffle,
                        self.repeat,
                        &mut self.rng,
                    )?;
                    self.selection = Selection::List(ListSession { candidates, picker });
                    self.schedule_repeat_once();
                }
            }
            Selection::Schedule(schedule) => {
                self.selection = Selection::Schedule(schedule);
                let present: HashSet<&TrackId> = tracks.iter().map(|t| &t.id).collect();
                self.retain_schedule(|t| present.contains(&t.id));
            }
        }

        self.selection_changed(before)
    }

    /// Forget a track removed from the library
    ///
    /// Drops it from the candidate list, the schedule and the history.
    pub fn remove_track(&mut self, id: &TrackId) -> Result<()> {
        self.history.retain(|t| t.id != *id);

        if let Selection::List(session) = &self.selection {
            let remaining: Vec<Track> = session
                .candidates
                .iter()
                .filter(|t| t.id != *id)
                .cloned()
                .collect();
            return self.refresh_candidates(&remaining);
        }

        let before = self.current_id();
        self.retain_schedule(|t| t.id != *id);
        self.selection_changed(before)
    }

    /// Index in `tracks` to continue list playback from
    fn rebase(session: &ListSession, tracks: &[Track]) -> usize {
        let position = |id: &TrackId| tracks.iter().position(|t| t.id == *id);

        let Some(current) = session.picker.current() else {
            return 0;
        };
        if let Some(index) = position(&current.id) {
            return index;
        }

        let fallback = session
            .upcoming()
            .iter()
            .find_map(|track| position(&track.id))
            .unwrap_or(0);
        warn!(
            "Current track {} left the candidate list, continuing with {}",
            current.id, tracks[fallback].id
        );
        fallback
    }

    fn retain_schedule<F: FnMut(&Track) -> bool>(&mut self, keep: F) {
        if let Selection::Schedule(schedule) = &mut self.selection {
            if schedule.retain(keep) {
                warn!("Current track left the schedule, moving on");
                schedule.next(&mut self.history);
            }
        }
    }

    // ===== Audio output =====

    /// Feed an audio output notification
    ///
    /// Completion advances to the next track.
    pub fn handle_output_event(&mut self, event: OutputEvent) -> Result<()> {
        match event {
            OutputEvent::PositionChanged { position, duration } => {
                self.emit(PlaybackEvent::PositionChanged {
                    position_ms: position.as_millis() as u64,
                    duration_ms: duration.as_millis() as u64,
                });
                Ok(())
            }
            OutputEvent::PlaybackCompleted => {
                debug!("Playback completed, advancing");
                self.next().map(|_| ())
            }
        }
    }

    /// Make the output's loaded track match the selected one
    ///
    /// A new track is mounted without changing the play state: playing
    /// continues playing, paused stays paused.
    fn update_audio_output(&mut self) -> Result<()> {
        let Some(track) = self.current().cloned() else {
            if let Some(old) = self.output.loaded().cloned() {
                self.output.stop();
                self.output.unload();
                self.emit(PlaybackEvent::TrackUnmounted { track_id: old });
            }
            self.set_state(PlaybackState::Stopped);
            return Ok(());
        };

        if self.output.loaded() == Some(&track.id) {
            return Ok(());
        }

        if let Some(old) = self.output.loaded().cloned() {
            self.output.unload();
            self.emit(PlaybackEvent::TrackUnmounted { track_id: old });
        }

        if let Err(e) = self.output.load(&track) {
            warn!("Failed to load {}: {}", track.id, e);
            self.set_state(PlaybackState::Stopped);
            return Err(e);
        }
        debug!("Mounted {} ({})", track.id, track.title);
        self.emit(PlaybackEvent::TrackMounted {
            track_id: track.id,
        });

        if self.state == PlaybackState::Playing {
            self.output.play();
        }
        Ok(())
    }

    // ===== History =====

    /// Record the live track before the selection is replaced
    fn record_departure(&mut self) {
        if self.history.is_browsing() {
            return;
        }
        if let Some(track) = self.current().cloned() {
            self.history.push(track);
        }
    }

    /// Push the departing track unless it is still current
    fn record(&mut self, departing: Option<&Track>) {
        if let Some(track) = departing {
            if self.current_id().as_ref() != Some(&track.id) {
                self.history.push(track.clone());
            }
        }
    }

    // ===== Events =====

    fn selection_changed(&mut self, before: Option<TrackId>) -> Result<()> {
        if self.current_id() != before {
            self.emit_selection();
        }
        self.update_audio_output()
    }

    fn emit_selection(&mut self) {
        let current = self.current_id();
        self.emit(PlaybackEvent::SelectionChanged { current });
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    /// Take all events emitted since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== State Queries =====

    /// Selected track
    pub fn current(&self) -> Option<&Track> {
        match &self.selection {
            Selection::Idle => None,
            Selection::List(session) => session.picker.current(),
            Selection::Schedule(schedule) => schedule.current(),
        }
    }

    fn current_id(&self) -> Option<TrackId> {
        self.current().map(|t| t.id.clone())
    }

    /// Playback history
    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    /// Playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if shuffle is enabled
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Get repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Volume
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Whether playback runs from a layered schedule
    pub fn is_scheduled(&self) -> bool {
        matches!(self.selection, Selection::Schedule(_))
    }

    /// The active list picker, if playing from a list
    pub fn picker(&self) -> Option<&TrackPicker> {
        match &self.selection {
            Selection::List(session) => Some(&session.picker),
            _ => None,
        }
    }

    /// The active schedule, if playing from one
    pub fn schedule(&self) -> Option<&PlaybackSchedule> {
        match &self.selection {
            Selection::Schedule(schedule) => Some(schedule),
            _ => None,
        }
    }

    /// The audio output
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Point-in-time view
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current: self.current().cloned(),
            state: self.state,
            shuffle: self.shuffle,
            repeat: self.repeat,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            history_len: self.history.len(),
            browsing_history: self.history.is_browsing(),
        }
    }
}
