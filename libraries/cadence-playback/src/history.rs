//! Playback history tracking
//!
//! Bounded ring of previously current tracks, with a browse cursor for
//! "previous" navigation that never removes anything from the ring.

use cadence_core::Track;
use std::collections::VecDeque;

/// Default number of tracks kept in history
pub const DEFAULT_HISTORY_CAPACITY: usize = 128;

/// Playback history with bounded size
///
/// Entries are stored oldest first. The browse cursor counts steps back from
/// the newest entry: `None` means "live" (not browsing), `Some(0)` is the most
/// recent entry, `Some(len - 1)` the oldest.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    /// History buffer (most recent = back)
    tracks: VecDeque<Track>,

    /// Maximum history size
    capacity: usize,

    /// Browse position, counted back from the newest entry
    cursor: Option<usize>,
}

impl HistoryRing {
    /// Create new history with specified capacity
    ///
    /// A capacity of zero falls back to [`DEFAULT_HISTORY_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_HISTORY_CAPACITY
        } else {
            capacity
        };
        Self {
            tracks: VecDeque::with_capacity(capacity),
            capacity,
            cursor: None,
        }
    }

    /// Add track to history
    ///
    /// If history is full, oldest tracks are discarded. A browse cursor keeps
    /// pointing at the same entry (one step further back now); if that entry
    /// was evicted it lands on the oldest remaining entry.
    ///
    /// Returns the number of evicted tracks.
    pub fn push(&mut self, track: Track) -> usize {
        let mut evicted = 0;
        while self.tracks.len() >= self.capacity {
            self.tracks.pop_front();
            evicted += 1;
        }
        self.tracks.push_back(track);

        if let Some(steps) = self.cursor {
            self.cursor = Some((steps + 1).min(self.tracks.len() - 1));
        }
        evicted
    }

    /// Step one entry further into the past
    ///
    /// Starts browsing at the newest entry, then moves toward the oldest and
    /// stays there. With an empty ring the cursor stays live and `None` is
    /// returned.
    pub fn step_back(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            self.cursor = None;
            return None;
        }
        let oldest = self.tracks.len() - 1;
        let steps = match self.cursor {
            None => 0,
            Some(steps) => (steps + 1).min(oldest),
        };
        self.cursor = Some(steps);
        self.back(steps)
    }

    /// Step one entry toward live
    ///
    /// Returns the entry now under the cursor, or `None` once the cursor is
    /// back at live (or was never browsing).
    pub fn step_forward(&mut self) -> Option<&Track> {
        match self.cursor {
            None | Some(0) => {
                self.cursor = None;
                None
            }
            Some(steps) => {
                self.cursor = Some(steps - 1);
                self.back(steps - 1)
            }
        }
    }

    /// Entry `steps` back from the newest one
    pub fn back(&self, steps: usize) -> Option<&Track> {
        let len = self.tracks.len();
        if steps >= len {
            return None;
        }
        self.tracks.get(len - 1 - steps)
    }

    /// Current browse cursor
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Whether the user is browsing back through history
    pub fn is_browsing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Stop browsing
    pub fn return_to_live(&mut self) {
        self.cursor = None;
    }

    /// Most recent track (without removing)
    pub fn peek(&self) -> Option<&Track> {
        self.tracks.back()
    }

    /// All history tracks (oldest first)
    pub fn iter(&self) -> impl Iterator<Item = &Track> + '_ {
        self.tracks.iter()
    }

    /// Number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Maximum history size
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keep only the tracks matching `keep`
    ///
    /// A browse cursor stays on the same entry. If that entry is dropped it
    /// moves to the next older survivor, or the oldest one.
    pub fn retain<F: FnMut(&Track) -> bool>(&mut self, mut keep: F) {
        let kept: Vec<bool> = self.tracks.iter().map(&mut keep).collect();

        if let Some(steps) = self.cursor {
            // Entries newer than the cursor's target that are going away
            let newer_dropped = kept.iter().rev().take(steps).filter(|k| !**k).count();
            self.cursor = Some(steps - newer_dropped);
        }

        let mut flags = kept.iter();
        self.tracks
            .retain(|_| flags.next().copied().unwrap_or(false));
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor = match (self.cursor, self.tracks.len()) {
            (_, 0) | (None, _) => None,
            (Some(steps), len) => Some(steps.min(len - 1)),
        };
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_test_track(id: &str) -> Track {
        Track::new(id, format!("Track {}", id), PathBuf::from(format!("/music/{}.mp3", id)))
    }

    fn ids(history: &HistoryRing) -> Vec<&str> {
        history.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn create_history() {
        let history = HistoryRing::new(10);
        assert_eq!(history.capacity(), 10);
        assert!(history.is_empty());
        assert!(!history.is_browsing());
    }

    #[test]
    fn zero_capacity_uses_default() {
        assert_eq!(HistoryRing::new(0).capacity(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(HistoryRing::default().capacity(), 128);
    }

    #[test]
    fn history_bounded() {
        let mut history = HistoryRing::new(3);
        for id in ["1", "2", "3"] {
            assert_eq!(history.push(create_test_track(id)), 0);
        }

        assert_eq!(history.push(create_test_track("4")), 1);
        assert_eq!(ids(&history), vec!["2", "3", "4"]);
        assert_eq!(history.peek().unwrap().id.as_str(), "4");
    }

    #[test]
    fn browsing_is_non_destructive() {
        let mut history = HistoryRing::new(10);
        history.push(create_test_track("a"));
        history.push(create_test_track("b"));

        assert_eq!(history.step_back().unwrap().id.as_str(), "b");
        assert_eq!(history.step_back().unwrap().id.as_str(), "a");
        // Clamped at the oldest entry
        assert_eq!(history.step_back().unwrap().id.as_str(), "a");
        assert_eq!(history.cursor(), Some(1));

        assert_eq!(history.step_forward().unwrap().id.as_str(), "b");
        assert!(history.step_forward().is_none());
        assert!(!history.is_browsing());

        assert_eq!(ids(&history), vec!["a", "b"]);
    }

    #[test]
    fn step_back_on_empty_stays_live() {
        let mut history = HistoryRing::new(4);
        assert!(history.step_back().is_none());
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn push_while_browsing_keeps_entry_under_cursor() {
        let mut history = HistoryRing::new(10);
        history.push(create_test_track("a"));
        history.push(create_test_track("b"));
        history.step_back(); // b

        history.push(create_test_track("c"));
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.back(1).unwrap().id.as_str(), "b");
    }

    #[test]
    fn eviction_clamps_cursor_to_oldest() {
        let mut history = HistoryRing::new(2);
        history.push(create_test_track("a"));
        history.push(create_test_track("b"));
        history.step_back();
        history.step_back(); // cursor on "a"
        assert_eq!(history.cursor(), Some(1));

        history.push(create_test_track("c"));
        history.push(create_test_track("d"));

        assert_eq!(ids(&history), vec!["c", "d"]);
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.back(1).unwrap().id.as_str(), "c");
    }

    #[test]
    fn retain_drops_tracks_and_clamps_cursor() {
        let mut history = HistoryRing::new(5);
        for id in ["a", "b", "c"] {
            history.push(create_test_track(id));
        }
        history.step_back();
        history.step_back();
        history.step_back(); // "a"

        history.retain(|t| t.id.as_str() != "a" && t.id.as_str() != "b");
        assert_eq!(ids(&history), vec!["c"]);
        assert_eq!(history.cursor(), Some(0));

        history.retain(|_| false);
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn retain_keeps_cursor_on_same_track() {
        let mut history = HistoryRing::new(5);
        for id in ["a", "b", "c"] {
            history.push(create_test_track(id));
        }
        history.step_back();
        assert_eq!(history.step_back().unwrap().id.as_str(), "b");

        history.retain(|t| t.id.as_str() != "c");
        assert_eq!(ids(&history), vec!["a", "b"]);
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.back(0).unwrap().id.as_str(), "b");
    }

    #[test]
    fn retain_moves_cursor_off_dropped_track() {
        let mut history = HistoryRing::new(5);
        for id in ["a", "b", "c", "d"] {
            history.push(create_test_track(id));
        }
        history.step_back();
        history.step_back(); // "c"

        history.retain(|t| t.id.as_str() != "c");
        assert_eq!(ids(&history), vec!["a", "b", "d"]);
        assert_eq!(history.back(history.cursor().unwrap()).unwrap().id.as_str(), "b");
    }
}
