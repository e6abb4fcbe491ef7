//! Picker factory
//!
//! Chooses the picker variant for a (shuffle, repeat, list) combination.

use crate::error::Result;
use crate::picker::{SequentialPicker, ShufflePicker, SinglePicker, TrackPicker};
use crate::types::RepeatMode;
use cadence_core::Track;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Build the picker for the given policy
///
/// - `Track` / `TrackOnce`: a repeating single-track picker on
///   `candidates[start_index]`, whatever `shuffle` says
/// - `All`: shuffle or sequential picker that wraps at either end
/// - `Off`: shuffle or sequential picker that stops at either end
///
/// Empty lists and out-of-range start indices are rejected for every mode.
pub fn create_picker<R: Rng + ?Sized>(
    candidates: Arc<[Track]>,
    start_index: usize,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> Result<TrackPicker> {
    let picker = match repeat {
        RepeatMode::Track | RepeatMode::TrackOnce => {
            TrackPicker::Single(SinglePicker::from_candidates(&candidates, start_index, true)?)
        }
        RepeatMode::All | RepeatMode::Off => {
            let wrap = repeat == RepeatMode::All;
            if shuffle {
                TrackPicker::Shuffle(ShufflePicker::new(candidates, start_index, wrap, rng)?)
            } else {
                TrackPicker::Sequential(SequentialPicker::new(candidates, start_index, wrap)?)
            }
        }
    };

    debug!(
        "Created {} picker at index {} (shuffle: {}, repeat: {})",
        variant_name(&picker),
        start_index,
        shuffle,
        repeat
    );
    Ok(picker)
}

fn variant_name(picker: &TrackPicker) -> &'static str {
    match picker {
        TrackPicker::Sequential(_) => "sequential",
        TrackPicker::Shuffle(_) => "shuffle",
        TrackPicker::Single(_) => "single",
    }
}
