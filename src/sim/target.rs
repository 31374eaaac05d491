//! Target generation
//!
//! The number the player must build next.

use rand::Rng;

use crate::tuning::{TowerTuning, ValueRange};

/// Bubble game: any value in the level's target range
pub fn bubble_target<R: Rng>(rng: &mut R, range: &ValueRange) -> u32 {
    range.sample(rng)
}

/// Tower game opening target: both bases plus a bonus, so at least one
/// decomposition or extra sum is needed
pub fn tower_initial_target<R: Rng>(rng: &mut R, base_a: u32, base_b: u32, tuning: &TowerTuning) -> u32 {
    base_a
        .saturating_add(base_b)
        .saturating_add(tuning.target_bonus.sample(rng))
}

/// Tower game follow-up target after `reached` was built.
///
/// Prefers `reached` plus the last unused base value so the next goal is
/// reachable by one more sum; otherwise adds a random bonus.
pub fn tower_next_target<R: Rng>(
    rng: &mut R,
    reached: u32,
    unused_bases: &[u32],
    tuning: &TowerTuning,
) -> u32 {
    match unused_bases.last() {
        Some(&base) => reached.saturating_add(base),
        None => reached.saturating_add(tuning.target_bonus.sample(rng)),
    }
}
