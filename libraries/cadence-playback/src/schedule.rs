//! Layered playback schedule
//!
//! Entries carry a *layer*: the pass over the schedule they were last played
//! in. An entry whose layer is below the schedule's current layer is still due
//! in this pass; picking it promotes it to the current layer. Starting a fresh
//! pass (repeat all) is a single increment of the current layer, so no entry
//! is ever removed or re-inserted while the schedule runs.
//!
//! ```text
//! layer 1 | A(1) B(1) C(0) D(0)     C and D still due in pass 1
//! next    | A(1) B(1) C(1) D(0)     C promoted
//! next    | A(1) B(1) C(1) D(1)     pass exhausted
//! next    | layer -> 2, A promoted  repeat all only
//! ```
//!
//! The history ring is owned by the caller and passed in; the schedule only
//! moves its browse cursor, it never records into it.

use crate::history::HistoryRing;
use crate::shuffle::pick_uniform;
use crate::types::RepeatMode;
use cadence_core::Track;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

/// Layer reported for entries replayed from history; no pass ever reaches it
pub const SATISFIED_LAYER: i64 = i64::MAX;

/// One schedulable track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// The track
    pub track: Track,

    /// Pass this entry was last played in
    pub layer: i64,

    /// Extra plays within the current layer
    pub repeat_count: u32,
}

impl ScheduleEntry {
    fn new(track: Track, layer: i64) -> Self {
        Self {
            track,
            layer,
            repeat_count: 0,
        }
    }

    /// Move to `layer`, resetting the repeat count when the layer changes
    fn set_layer(&mut self, layer: i64) {
        if self.layer != layer {
            self.layer = layer;
            self.repeat_count = 0;
        }
    }
}

/// What `current` points at
#[derive(Debug, Clone)]
enum Slot {
    /// Index into the schedule's entries
    Scheduled(usize),
    /// Track taken from history or left over after a clear
    Detached(ScheduleEntry),
}

/// Layered playback schedule
#[derive(Debug)]
pub struct PlaybackSchedule {
    entries: Vec<ScheduleEntry>,
    current: Option<Slot>,
    layer: i64,
    shuffle: bool,
    repeat: RepeatMode,
    rng: StdRng,
}

impl PlaybackSchedule {
    /// Create an empty schedule drawing shuffle picks from `rng`
    pub fn new(rng: StdRng) -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            layer: 0,
            shuffle: false,
            repeat: RepeatMode::Off,
            rng,
        }
    }

    /// Create an empty schedule with a fixed shuffle seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Append a track behind everything already due
    ///
    /// The entry lands one layer below the current one. If nothing is current
    /// it is promoted straight away and becomes current.
    pub fn enqueue(&mut self, track: Track) {
        debug!("Enqueued {} at layer {}", track.id, self.layer.saturating_sub(1));
        self.entries
            .push(ScheduleEntry::new(track, self.layer.saturating_sub(1)));

        if self.current.is_none() {
            let index = self.entries.len() - 1;
            self.promote(index);
            self.current = Some(Slot::Scheduled(index));
        }
    }

    /// Replace the whole schedule with `track`, which becomes current
    pub fn play_immediately(&mut self, track: Track) {
        debug!("Playing {} immediately, dropping {} entries", track.id, self.entries.len());
        self.entries.clear();
        self.entries.push(ScheduleEntry::new(track, self.layer));
        self.current = Some(Slot::Scheduled(0));
    }

    /// Drop every entry and reset the layer
    ///
    /// The current track stays reported (detached) until the next move.
    pub fn clear(&mut self) {
        if let Some(Slot::Scheduled(index)) = self.current {
            self.current = self.entries.get(index).cloned().map(Slot::Detached);
        }
        self.entries.clear();
        self.layer = 0;
    }

    /// Move to the next track
    ///
    /// While browsing history this steps the cursor back toward live and
    /// returns the history entry it lands on. Otherwise the next entry is
    /// picked by policy. `None` means the schedule is exhausted; the current
    /// slot is left untouched in that case.
    pub fn next(&mut self, history: &mut HistoryRing) -> Option<&Track> {
        if let Some(track) = history.step_forward() {
            trace!("Next from history: {}", track.id);
            self.current = Some(Slot::Detached(ScheduleEntry::new(
                track.clone(),
                SATISFIED_LAYER,
            )));
            return self.current();
        }

        let picked = self.pick_next()?;
        self.current = Some(picked);
        self.current()
    }

    /// Move one step back through history
    ///
    /// With an empty history the current track is returned unchanged.
    pub fn previous(&mut self, history: &mut HistoryRing) -> Option<&Track> {
        if let Some(track) = history.step_back() {
            trace!("Previous from history: {}", track.id);
            self.current = Some(Slot::Detached(ScheduleEntry::new(
                track.clone(),
                SATISFIED_LAYER,
            )));
        }
        self.current()
    }

    fn pick_next(&mut self) -> Option<Slot> {
        if self.entries.is_empty() {
            return None;
        }

        let current = match self.current {
            Some(Slot::Scheduled(index)) => Some(index),
            _ => None,
        };

        match (self.repeat, current) {
            (RepeatMode::TrackOnce, Some(index)) if self.entries[index].repeat_count == 0 => {
                self.entries[index].repeat_count = 1;
                return Some(Slot::Scheduled(index));
            }
            (RepeatMode::Track, Some(index)) => {
                let entry = &mut self.entries[index];
                entry.repeat_count = entry.repeat_count.saturating_add(1);
                return Some(Slot::Scheduled(index));
            }
            _ => {}
        }

        if let Some(index) = self.pick_in_pass(current) {
            return Some(Slot::Scheduled(index));
        }

        if self.repeat == RepeatMode::All {
            self.layer += 1;
            debug!("Schedule pass exhausted, starting layer {}", self.layer);
            return self.pick_in_pass(current).map(Slot::Scheduled);
        }

        None
    }

    /// Pick and promote an entry still due in the current pass
    ///
    /// Shuffle draws without replacement per pass: a promoted entry is not
    /// eligible again until the layer moves on.
    fn pick_in_pass(&mut self, current: Option<usize>) -> Option<usize> {
        let index = if self.shuffle {
            let due: Vec<usize> = self.due_indices().collect();
            // Avoid replaying the same track back to back across a pass boundary
            let others: Vec<usize> = due.iter().copied().filter(|&i| Some(i) != current).collect();
            let pool = if others.is_empty() { due } else { others };
            pick_uniform(&pool, &mut self.rng)?
        } else {
            self.due_indices().next()?
        };

        self.promote(index);
        Some(index)
    }

    fn due_indices(&self) -> impl Iterator<Item = usize> + '_ {
        let layer = self.layer;
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.layer < layer)
            .map(|(i, _)| i)
    }

    fn promote(&mut self, index: usize) {
        let layer = self.layer;
        self.entries[index].set_layer(layer);
    }

    /// Keep only entries whose track matches `keep`
    ///
    /// Returns `true` when the current track was dropped; the current slot is
    /// cleared in that case.
    pub fn retain<F: FnMut(&Track) -> bool>(&mut self, mut keep: F) -> bool {
        let mut remap = Vec::with_capacity(self.entries.len());
        let mut kept = 0;
        for entry in &self.entries {
            if keep(&entry.track) {
                remap.push(Some(kept));
                kept += 1;
            } else {
                remap.push(None);
            }
        }
        let mut flags = remap.iter();
        self.entries
            .retain(|_| flags.next().is_some_and(|slot| slot.is_some()));

        let (current, dropped) = match self.current.take() {
            Some(Slot::Scheduled(index)) => match remap.get(index).copied().flatten() {
                Some(new_index) => (Some(Slot::Scheduled(new_index)), false),
                None => (None, true),
            },
            Some(Slot::Detached(entry)) => {
                if keep(&entry.track) {
                    (Some(Slot::Detached(entry)), false)
                } else {
                    (None, true)
                }
            }
            None => (None, false),
        };
        self.current = current;
        dropped
    }

    /// Current track
    pub fn current(&self) -> Option<&Track> {
        self.current_entry().map(|entry| &entry.track)
    }

    /// Current entry, including its layer bookkeeping
    pub fn current_entry(&self) -> Option<&ScheduleEntry> {
        match self.current.as_ref()? {
            Slot::Scheduled(index) => self.entries.get(*index),
            Slot::Detached(entry) => Some(entry),
        }
    }

    /// Whether any entry holds `track`
    pub fn has_track(&self, track: &Track) -> bool {
        self.entries.iter().any(|entry| entry.track.id == track.id)
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Current pass
    pub fn layer(&self) -> i64 {
        self.layer
    }

    /// Enable or disable shuffle
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    /// Check if shuffle is enabled
    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    /// Set repeat mode
    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    /// Get repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the schedule has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
