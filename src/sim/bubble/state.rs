//! Bubble game state
//!
//! Bubbles live in screen space. A bubble's radius is derived from its value
//! on every read and is never stored.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::camera::Viewport;
use crate::sim::random_between;
use crate::sim::session::{Hud, Session};
use crate::sim::store::{Entity, EntityId, EntityStore};
use crate::sim::target::bubble_target;
use crate::tuning::BubbleTuning;

/// Animation / interaction state of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Growing in; behaves like idle for physics
    Spawning,
    Idle,
    /// Shrinking into its partner; replaced by the sum when both finish
    Merging { partner: EntityId },
    /// Popping; replaced by two parts when finished
    Splitting,
}

impl BubbleState {
    /// Spawning and idle bubbles drift, collide and accept input
    pub fn is_free(&self) -> bool {
        matches!(self, BubbleState::Spawning | BubbleState::Idle)
    }
}

/// Radius for a value: strictly increasing in `value`
#[inline]
pub fn bubble_radius(value: u32) -> f32 {
    (value as f32).sqrt() * BUBBLE_SIZE_FACTOR + BUBBLE_BASE_RADIUS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    id: EntityId,
    value: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub dragged: bool,
    pub state: BubbleState,
    /// 0..=1, advanced every frame whatever the state
    pub progress: f32,
}

impl Entity for Bubble {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Bubble {
    pub fn new(id: EntityId, value: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            value,
            pos,
            vel,
            dragged: false,
            state: BubbleState::Spawning,
            progress: 0.0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn radius(&self) -> f32 {
        bubble_radius(self.value)
    }

    /// Free to move, collide and be grabbed
    pub fn is_interactive(&self) -> bool {
        self.state.is_free() && !self.dragged
    }
}

/// Things that happened inside the engine, for sound/visual collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum BubbleEvent {
    /// Ask the render layer for a ripple ring
    Ripple { pos: Vec2, radius: f32 },
    Split { value: u32, parts: (u32, u32) },
    Merged { value: u32, parts: (u32, u32) },
    TargetReached { value: u32, next_target: u32 },
}

/// Active drag: which bubble and where it was grabbed relative to its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Drag {
    pub id: EntityId,
    pub offset: Vec2,
}

/// The bubble merging/splitting game
pub struct BubbleGame {
    pub(crate) tuning: BubbleTuning,
    pub(crate) rng: Pcg32,
    pub(crate) bubbles: EntityStore<Bubble>,
    pub(crate) session: Session,
    pub(crate) target: u32,
    /// Global drift multiplier; dips after merges/splits then recovers
    pub(crate) time_scale: f32,
    pub(crate) viewport: Option<Viewport>,
    pub(crate) drag: Option<Drag>,
    pub(crate) events: Vec<BubbleEvent>,
}

impl BubbleGame {
    pub fn new(seed: u64, tuning: BubbleTuning) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            bubbles: EntityStore::new(),
            session: Session::new(BUBBLE_GAME_DURATION),
            target: 0,
            time_scale: 1.0,
            viewport: None,
            drag: None,
            events: Vec::new(),
        }
    }

    /// Surface size changed (or became known)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Some(Viewport::new(width, height));
    }

    /// Fresh session: new target, full clock, a full seed population.
    ///
    /// Returns false (and changes nothing) while there is no surface.
    pub fn reset(&mut self) -> bool {
        let Some(view) = self.viewport.filter(Viewport::is_ready) else {
            log::warn!("Bubble reset skipped: no drawing surface yet");
            return false;
        };

        self.session.restart();
        self.target = bubble_target(&mut self.rng, &self.tuning.target_range);
        self.time_scale = 1.0;
        self.drag = None;
        self.events.clear();
        self.bubbles.reset();

        for _ in 0..self.tuning.max_bubbles {
            let value = self.tuning.value_range.sample(&mut self.rng);
            let r = bubble_radius(value);
            let pos = Vec2::new(
                random_between(&mut self.rng, r, view.width - r),
                random_between(&mut self.rng, r, view.height - r),
            );
            let vel = self.random_velocity();
            self.spawn_bubble(value, pos, vel);
        }

        log::info!(
            "Bubble game started: {} bubbles, target {}",
            self.bubbles.len(),
            self.target
        );
        true
    }

    /// One-second timer callback; true when the session just ended
    pub fn tick_second(&mut self) -> bool {
        self.session.tick_second()
    }

    pub fn bubbles(&self) -> &[Bubble] {
        self.bubbles.as_slice()
    }

    pub fn bubble(&self, id: EntityId) -> Option<&Bubble> {
        self.bubbles.get(id)
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn hud(&self) -> Hud {
        self.session.hud(self.target)
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn dragged_id(&self) -> Option<EntityId> {
        self.drag.map(|d| d.id)
    }

    /// Take everything emitted since the last call
    pub fn drain_events(&mut self) -> Vec<BubbleEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn random_velocity(&mut self) -> Vec2 {
        let max = self.tuning.max_speed;
        Vec2::new(
            random_between(&mut self.rng, -max, max),
            random_between(&mut self.rng, -max, max),
        )
    }

    pub(crate) fn spawn_bubble(&mut self, value: u32, pos: Vec2, vel: Vec2) -> EntityId {
        self.bubbles.spawn(|id| Bubble::new(id, value, pos, vel))
    }

    /// Tag two bubbles as merging into each other and slow time down
    pub(crate) fn begin_merge(&mut self, a: EntityId, b: EntityId) {
        for (id, partner) in [(a, b), (b, a)] {
            if let Some(bubble) = self.bubbles.get_mut(id) {
                bubble.state = BubbleState::Merging { partner };
                bubble.progress = 0.0;
                bubble.vel = Vec2::ZERO;
            }
        }
        self.time_scale = SLOW_MOTION_SCALE;
        log::debug!("Merge started: {} + {}", a, b);
    }

    /// Start popping a bubble. Values below 2 cannot split.
    pub(crate) fn begin_split(&mut self, id: EntityId) -> bool {
        let Some(bubble) = self.bubbles.get_mut(id) else {
            return false;
        };
        if bubble.value < 2 || !bubble.is_interactive() {
            log::debug!("Split rejected for bubble {} (value {})", id, bubble.value);
            return false;
        }
        bubble.state = BubbleState::Splitting;
        bubble.progress = 0.0;
        self.time_scale = SLOW_MOTION_SCALE;
        true
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::tuning::ValueRange;

    /// Tuning with no population floor so tests control every bubble
    pub fn quiet_tuning() -> BubbleTuning {
        BubbleTuning {
            min_bubbles: 0,
            max_bubbles: 7,
            max_speed: 0.5,
            target_range: ValueRange::new(15, 30),
            value_range: ValueRange::new(5, 30),
        }
    }

    /// Running 800x600 game holding exactly the given resting bubbles
    pub fn game_with(tuning: BubbleTuning, bubbles: &[(u32, Vec2)]) -> BubbleGame {
        let mut game = BubbleGame::new(42, tuning);
        game.resize(800.0, 600.0);
        assert!(game.reset());
        game.bubbles.reset();
        for &(value, pos) in bubbles {
            let id = game.spawn_bubble(value, pos, Vec2::ZERO);
            let bubble = game.bubbles.get_mut(id).unwrap();
            bubble.state = BubbleState::Idle;
            bubble.progress = 1.0;
        }
        game
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_radius_strictly_increasing() {
        let mut last = bubble_radius(1);
        for value in 2..500 {
            let r = bubble_radius(value);
            assert!(r > last);
            last = r;
        }
        assert_eq!(bubble_radius(4), 25.0);
    }

    #[test]
    fn test_reset_needs_surface() {
        let mut game = BubbleGame::new(1, Tuning::default().easy.bubble);
        assert!(!game.reset());
        assert!(game.bubbles().is_empty());

        game.resize(0.0, 0.0);
        assert!(!game.reset());
    }

    #[test]
    fn test_reset_seeds_max_population_inside_canvas() {
        let tuning = Tuning::default().hard.bubble;
        let mut game = BubbleGame::new(9, tuning.clone());
        game.resize(1024.0, 768.0);
        assert!(game.reset());

        assert_eq!(game.bubbles().len(), tuning.max_bubbles);
        assert!(tuning.target_range.contains(game.target()));
        assert!(game.session().is_running());
        for b in game.bubbles() {
            assert!(tuning.value_range.contains(b.value()));
            assert!(b.pos.x >= b.radius() && b.pos.x <= 1024.0 - b.radius());
            assert!(b.pos.y >= b.radius() && b.pos.y <= 768.0 - b.radius());
            assert_eq!(b.state, BubbleState::Spawning);
            assert!(b.vel.x.abs() <= tuning.max_speed && b.vel.y.abs() <= tuning.max_speed);
        }
    }

    #[test]
    fn test_same_seed_same_opening() {
        let tuning = Tuning::default().medium.bubble;
        let mut a = BubbleGame::new(5, tuning.clone());
        let mut b = BubbleGame::new(5, tuning);
        for game in [&mut a, &mut b] {
            game.resize(640.0, 480.0);
            game.reset();
        }
        assert_eq!(a.target(), b.target());
        let values = |g: &BubbleGame| g.bubbles().iter().map(Bubble::value).collect::<Vec<_>>();
        assert_eq!(values(&a), values(&b));
    }
}
