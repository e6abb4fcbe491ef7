//! Track pickers
//!
//! A picker owns a cursor over a fixed candidate list and answers "what is
//! current", "move to next" and "move to previous". The list never changes
//! for the lifetime of a picker: a new candidate list, shuffle flag or repeat
//! mode means building a new picker (see [`crate::factory`]).
//!
//! ```text
//! candidates: [A, B, C, D]          (catalog order, shared)
//! Sequential: A  B [C] D            cursor walks catalog order
//! Shuffle:    D  A [C] B            cursor walks a permutation fixed at construction
//! Single:        [C]                one track, moves only report `repeat`
//! ```

use crate::error::{PlaybackError, Result};
use crate::shuffle::shuffled_order;
use cadence_core::Track;
use rand::Rng;
use std::sync::Arc;

/// Reject empty lists and out-of-range start positions
fn validate(candidates: &[Track], start_index: usize) -> Result<()> {
    if candidates.is_empty() {
        return Err(PlaybackError::EmptyCandidates);
    }
    if start_index >= candidates.len() {
        return Err(PlaybackError::StartIndexOutOfRange {
            index: start_index,
            len: candidates.len(),
        });
    }
    Ok(())
}

/// Cursor over `0..len` with clamp-or-wrap semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    position: usize,
    len: usize,
    repeat: bool,
}

impl Cursor {
    fn forward(&mut self) -> bool {
        if self.position + 1 < self.len {
            self.position += 1;
            true
        } else if self.repeat {
            self.position = 0;
            true
        } else {
            self.position = self.len - 1;
            false
        }
    }

    fn backward(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else if self.repeat {
            self.position = self.len - 1;
            true
        } else {
            self.position = 0;
            false
        }
    }

    /// Positions that follow the cursor in play order, excluding the cursor itself
    fn upcoming(&self) -> impl Iterator<Item = usize> {
        let after = self.position + 1..self.len;
        let wrapped = if self.repeat { 0..self.position } else { 0..0 };
        after.chain(wrapped)
    }
}

/// Walks the candidate list in list order
#[derive(Debug, Clone)]
pub struct SequentialPicker {
    candidates: Arc<[Track]>,
    cursor: Cursor,
}

impl SequentialPicker {
    /// Create a picker positioned at `start_index`
    pub fn new(candidates: Arc<[Track]>, start_index: usize, repeat: bool) -> Result<Self> {
        validate(&candidates, start_index)?;
        let len = candidates.len();
        Ok(Self {
            candidates,
            cursor: Cursor {
                position: start_index,
                len,
                repeat,
            },
        })
    }
}

/// Walks a random permutation of the candidate list
///
/// The permutation is drawn once at construction and kept for the picker's
/// lifetime; it is stored as indices into the shared candidate list.
#[derive(Debug, Clone)]
pub struct ShufflePicker {
    candidates: Arc<[Track]>,
    order: Vec<usize>,
    cursor: Cursor,
}

impl ShufflePicker {
    /// Create a picker whose cursor sits on `candidates[start_index]`
    pub fn new<R: Rng + ?Sized>(
        candidates: Arc<[Track]>,
        start_index: usize,
        repeat: bool,
        rng: &mut R,
    ) -> Result<Self> {
        validate(&candidates, start_index)?;
        let order = shuffled_order(candidates.len(), rng);
        let position = order
            .iter()
            .position(|&i| i == start_index)
            .ok_or(PlaybackError::StartIndexOutOfRange {
                index: start_index,
                len: candidates.len(),
            })?;
        let len = candidates.len();

        Ok(Self {
            candidates,
            order,
            cursor: Cursor {
                position,
                len,
                repeat,
            },
        })
    }
}

/// Wraps exactly one track
#[derive(Debug, Clone)]
pub struct SinglePicker {
    track: Track,
    candidate_index: usize,
    repeat: bool,
}

impl SinglePicker {
    /// Wrap a standalone track
    pub fn new(track: Track, repeat: bool) -> Self {
        Self {
            track,
            candidate_index: 0,
            repeat,
        }
    }

    /// Wrap `candidates[index]`, remembering where it came from
    pub fn from_candidates(candidates: &[Track], index: usize, repeat: bool) -> Result<Self> {
        validate(candidates, index)?;
        Ok(Self {
            track: candidates[index].clone(),
            candidate_index: index,
            repeat,
        })
    }
}

/// Track picker
///
/// Closed set of variants behind one contract. A `false` return from a move
/// means the cursor did not advance; `current` is then exactly what it was
/// before the call.
#[derive(Debug, Clone)]
pub enum TrackPicker {
    /// List order
    Sequential(SequentialPicker),
    /// Fixed random permutation
    Shuffle(ShufflePicker),
    /// One track
    Single(SinglePicker),
}

impl TrackPicker {
    /// Currently selected track
    pub fn current(&self) -> Option<&Track> {
        match self {
            TrackPicker::Sequential(p) => p.candidates.get(p.cursor.position),
            TrackPicker::Shuffle(p) => p
                .order
                .get(p.cursor.position)
                .and_then(|&i| p.candidates.get(i)),
            TrackPicker::Single(p) => Some(&p.track),
        }
    }

    /// Advance the cursor
    pub fn move_next(&mut self) -> bool {
        match self {
            TrackPicker::Sequential(p) => p.cursor.forward(),
            TrackPicker::Shuffle(p) => p.cursor.forward(),
            TrackPicker::Single(p) => p.repeat,
        }
    }

    /// Move the cursor back
    pub fn move_previous(&mut self) -> bool {
        match self {
            TrackPicker::Sequential(p) => p.cursor.backward(),
            TrackPicker::Shuffle(p) => p.cursor.backward(),
            TrackPicker::Single(p) => p.repeat,
        }
    }

    /// Whether moves past either end wrap around
    pub fn repeats(&self) -> bool {
        match self {
            TrackPicker::Sequential(p) => p.cursor.repeat,
            TrackPicker::Shuffle(p) => p.cursor.repeat,
            TrackPicker::Single(p) => p.repeat,
        }
    }

    /// Index of the current track in the original candidate list
    pub fn candidate_index(&self) -> usize {
        match self {
            TrackPicker::Sequential(p) => p.cursor.position,
            TrackPicker::Shuffle(p) => p.order[p.cursor.position],
            TrackPicker::Single(p) => p.candidate_index,
        }
    }

    /// Cursor position in this picker's own play order
    pub fn position(&self) -> usize {
        match self {
            TrackPicker::Sequential(p) => p.cursor.position,
            TrackPicker::Shuffle(p) => p.cursor.position,
            TrackPicker::Single(_) => 0,
        }
    }

    /// Number of tracks this picker can select from
    pub fn len(&self) -> usize {
        match self {
            TrackPicker::Sequential(p) => p.cursor.len,
            TrackPicker::Shuffle(p) => p.cursor.len,
            TrackPicker::Single(_) => 1,
        }
    }

    /// Always false; pickers are never built empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tracks that would follow the current one, in play order
    ///
    /// With repeat on, the tracks before the cursor follow after wrapping.
    /// The current track itself is never included.
    pub fn upcoming(&self) -> Vec<Track> {
        match self {
            TrackPicker::Sequential(p) => p
                .cursor
                .upcoming()
                .map(|i| p.candidates[i].clone())
                .collect(),
            TrackPicker::Shuffle(p) => p
                .cursor
                .upcoming()
                .map(|pos| p.candidates[p.order[pos]].clone())
                .collect(),
            TrackPicker::Single(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    fn tracks(ids: &[&str]) -> Arc<[Track]> {
        ids.iter()
            .map(|id| Track::new(*id, format!("Track {}", id), PathBuf::from(format!("/music/{}.mp3", id))))
            .collect::<Vec<_>>()
            .into()
    }

    fn current_id(picker: &TrackPicker) -> &str {
        picker.current().unwrap().id.as_str()
    }

    #[test]
    fn sequential_walks_to_end_then_clamps() {
        let mut picker =
            TrackPicker::Sequential(SequentialPicker::new(tracks(&["a", "b", "c"]), 0, false).unwrap());

        assert!(picker.move_next());
        assert_eq!(current_id(&picker), "b");
        assert!(picker.move_next());
        assert_eq!(current_id(&picker), "c");

        assert!(!picker.move_next());
        assert_eq!(current_id(&picker), "c");
    }

    #[test]
    fn sequential_previous_clamps_at_start() {
        let mut picker =
            TrackPicker::Sequential(SequentialPicker::new(tracks(&["a", "b"]), 0, false).unwrap());

        assert!(!picker.move_previous());
        assert_eq!(current_id(&picker), "a");
    }

    #[test]
    fn sequential_wraps_with_repeat() {
        let mut picker =
            TrackPicker::Sequential(SequentialPicker::new(tracks(&["a", "b", "c"]), 2, true).unwrap());

        assert!(picker.move_next());
        assert_eq!(current_id(&picker), "a");

        assert!(picker.move_previous());
        assert_eq!(current_id(&picker), "c");
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = SequentialPicker::new(tracks(&[]), 0, false).unwrap_err();
        assert!(matches!(err, PlaybackError::EmptyCandidates));
    }

    #[test]
    fn out_of_range_start_is_rejected_not_clamped() {
        let err = SequentialPicker::new(tracks(&["a", "b"]), 2, false).unwrap_err();
        assert!(matches!(
            err,
            PlaybackError::StartIndexOutOfRange { index: 2, len: 2 }
        ));

        let mut rng = StdRng::seed_from_u64(3);
        assert!(ShufflePicker::new(tracks(&["a"]), 5, true, &mut rng).is_err());
        assert!(SinglePicker::from_candidates(&tracks(&[]), 0, true).is_err());
    }

    #[test]
    fn shuffle_starts_on_requested_track() {
        let list = tracks(&["a", "b", "c", "d", "e", "f"]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picker = TrackPicker::Shuffle(ShufflePicker::new(list.clone(), 3, false, &mut rng).unwrap());
            assert_eq!(current_id(&picker), "d");
            assert_eq!(picker.candidate_index(), 3);
        }
    }

    #[test]
    fn shuffle_order_is_fixed_for_picker_lifetime() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut picker = TrackPicker::Shuffle(
            ShufflePicker::new(tracks(&["a", "b", "c", "d"]), 0, true, &mut rng).unwrap(),
        );

        let mut first_lap = Vec::new();
        for _ in 0..4 {
            first_lap.push(current_id(&picker).to_string());
            picker.move_next();
        }
        let mut second_lap = Vec::new();
        for _ in 0..4 {
            second_lap.push(current_id(&picker).to_string());
            picker.move_next();
        }

        assert_eq!(first_lap, second_lap);
    }

    #[test]
    fn single_reports_repeat_flag_and_never_moves() {
        let mut looping = TrackPicker::Single(SinglePicker::new(tracks(&["a"])[0].clone(), true));
        assert!(looping.move_next());
        assert!(looping.move_previous());
        assert_eq!(current_id(&looping), "a");

        let mut once = TrackPicker::Single(SinglePicker::new(tracks(&["a"])[0].clone(), false));
        assert!(!once.move_next());
        assert!(!once.move_previous());
        assert_eq!(current_id(&once), "a");
    }

    #[test]
    fn upcoming_follows_play_order() {
        let list = tracks(&["a", "b", "c", "d"]);

        let plain = TrackPicker::Sequential(SequentialPicker::new(list.clone(), 1, false).unwrap());
        let ids: Vec<_> = plain.upcoming().into_iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids, vec!["c", "d"]);

        let looping = TrackPicker::Sequential(SequentialPicker::new(list, 1, true).unwrap());
        let ids: Vec<_> = looping.upcoming().into_iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids, vec!["c", "d", "a"]);
    }
}
