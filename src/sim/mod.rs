//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-driven steps only (no wall clock)
//! - Seeded RNG only
//! - Ids come from the entity store counter
//! - No rendering or platform dependencies

pub mod bubble;
pub mod camera;
pub mod collision;
pub mod session;
pub mod store;
pub mod target;
pub mod tower;

pub use bubble::{Bubble, BubbleEvent, BubbleGame, BubbleState};
pub use camera::{Camera, Viewport, screen_to_world, world_to_screen};
pub use session::{Hud, Session, SessionPhase};
pub use store::{Entity, EntityId, EntityStore};
pub use tower::{Connection, NodeOrigin, NodeState, TowerEvent, TowerGame, TowerNode};

use rand::Rng;

/// Uniform sample in `[lo, hi)`; degenerate ranges collapse to `lo`.
pub(crate) fn random_between<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
