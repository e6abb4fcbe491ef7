//! Shuffle primitives
//!
//! Everything random in playback goes through an explicit `Rng` so callers can
//! seed it (tests, reproducible sessions) instead of sharing a global generator.

use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly random permutation of `0..len`
///
/// Fisher-Yates: walks `i` from `len - 1` down to 1 and swaps slot `i` with a
/// uniformly chosen slot in `[0, i]`, which is what `SliceRandom::shuffle` does.
pub fn shuffled_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

/// Pick one element uniformly at random
pub fn pick_uniform<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Option<T> {
    items.choose(rng).copied()
}
