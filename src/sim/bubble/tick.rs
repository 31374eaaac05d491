//! Per-frame bubble simulation
//!
//! Order within a frame: time-scale recovery, population floor, animation
//! progress, drift + wall bounce, soft overlap separation, then finished
//! splits and merges are replaced by their products.

use glam::Vec2;
use rand::Rng;

use super::state::{BubbleEvent, BubbleGame, BubbleState, bubble_radius};
use crate::consts::*;
use crate::sim::camera::Viewport;
use crate::sim::collision::{bounce_off_bounds, circle_circle_collision, separate};
use crate::sim::random_between;
use crate::sim::store::EntityId;
use crate::sim::target::bubble_target;

/// Random split of `value` into two positive parts.
///
/// `None` for values that cannot be split.
pub fn split_value<R: Rng>(rng: &mut R, value: u32) -> Option<(u32, u32)> {
    if value < 2 {
        return None;
    }
    let first = rng.random_range(1..value);
    Some((first, value - first))
}

impl BubbleGame {
    /// Advance one frame. No-op once the session is over or without a surface.
    pub fn step(&mut self) {
        if !self.session.is_running() {
            return;
        }
        let Some(view) = self.viewport.filter(Viewport::is_ready) else {
            return;
        };

        self.time_scale += (1.0 - self.time_scale) * TIME_SCALE_RECOVERY;

        self.enforce_population(&view);
        self.advance_animations();
        self.integrate(&view);
        self.separate_overlaps();
        self.resolve_splits();
        self.resolve_merges();
    }

    /// Drop one new bubble in from above while under the floor.
    /// The cap wins if a custom table puts the floor above it.
    fn enforce_population(&mut self, view: &Viewport) {
        let live = self.bubbles.len();
        if live >= self.tuning.max_bubbles || live >= self.tuning.min_bubbles {
            return;
        }

        let value = self.tuning.value_range.sample(&mut self.rng);
        let r = bubble_radius(value);
        let x = random_between(&mut self.rng, r, view.width - r);
        let max = self.tuning.max_speed;
        let vel = Vec2::new(
            random_between(&mut self.rng, -max, max),
            random_between(&mut self.rng, max * 0.25, max),
        );
        let id = self.spawn_bubble(value, Vec2::new(x, -r), vel);
        log::debug!("Population {} below floor, spawned bubble {} ({})", live, id, value);
    }

    fn advance_animations(&mut self) {
        for bubble in self.bubbles.iter_mut() {
            bubble.progress = (bubble.progress + BUBBLE_ANIM_STEP).min(1.0);
            if bubble.state == BubbleState::Spawning && bubble.progress >= 1.0 {
                bubble.state = BubbleState::Idle;
            }
        }
    }

    fn integrate(&mut self, view: &Viewport) {
        let scale = self.time_scale;
        for bubble in self.bubbles.iter_mut().filter(|b| b.is_interactive()) {
            bubble.pos += bubble.vel * scale;
            bubble.vel = bounce_off_bounds(bubble.pos, bubble.vel, bubble.radius(), view.width, view.height);
        }
    }

    fn separate_overlaps(&mut self) {
        let n = self.bubbles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = self.bubbles.pair_mut(i, j);
                if !a.is_interactive() || !b.is_interactive() {
                    continue;
                }
                let result = circle_circle_collision(a.pos, a.radius(), b.pos, b.radius());
                separate(&mut a.pos, &mut b.pos, &result);
            }
        }
    }

    fn resolve_splits(&mut self) {
        let finished: Vec<EntityId> = self
            .bubbles
            .iter()
            .filter(|b| b.state == BubbleState::Splitting && b.progress >= 1.0)
            .map(|b| b.id())
            .collect();

        for id in finished {
            let Some(parent) = self.bubbles.get(id) else {
                continue;
            };
            let Some((first, second)) = split_value(&mut self.rng, parent.value()) else {
                // Unsplittable values never start splitting
                if let Some(parent) = self.bubbles.get_mut(id) {
                    parent.state = BubbleState::Idle;
                }
                continue;
            };

            let Some(parent) = self.bubbles.remove(id) else {
                continue;
            };
            let offset = Vec2::splat(SPLIT_OFFSET);
            let kick = Vec2::splat(SPLIT_KICK);
            self.spawn_bubble(first, parent.pos - offset, -parent.vel - kick);
            self.spawn_bubble(second, parent.pos + offset, parent.vel + kick);

            log::debug!("Split {} -> {} + {}", parent.value(), first, second);
            self.events.push(BubbleEvent::Split {
                value: parent.value(),
                parts: (first, second),
            });
        }
    }

    fn resolve_merges(&mut self) {
        let mut pairs = Vec::new();
        let mut orphans = Vec::new();

        for bubble in self.bubbles.iter() {
            let BubbleState::Merging { partner } = bubble.state else {
                continue;
            };
            let Some(other) = self
                .bubbles
                .get(partner)
                .filter(|o| o.state == BubbleState::Merging { partner: bubble.id() })
            else {
                orphans.push(bubble.id());
                continue;
            };
            if bubble.id() < partner && bubble.progress >= 1.0 && other.progress >= 1.0 {
                pairs.push((bubble.id(), partner));
            }
        }

        for id in orphans {
            if let Some(bubble) = self.bubbles.get_mut(id) {
                bubble.state = BubbleState::Idle;
            }
        }
        for (a, b) in pairs {
            self.complete_merge(a, b);
        }
    }

    /// Replace a finished merging pair by one bubble holding the sum
    fn complete_merge(&mut self, a: EntityId, b: EntityId) {
        let (Some(first), Some(second)) = (self.bubbles.remove(a), self.bubbles.remove(b)) else {
            return;
        };
        let value = first.value().saturating_add(second.value());
        let pos = (first.pos + second.pos) * 0.5;
        let vel = self.random_velocity();
        self.spawn_bubble(value, pos, vel);
        self.events.push(BubbleEvent::Merged {
            value,
            parts: (first.value(), second.value()),
        });
        log::debug!("Merged {} + {} = {}", first.value(), second.value(), value);

        if value == self.target {
            self.session.add_score(u64::from(value));
            self.session.add_time(BUBBLE_TIME_BONUS);
            self.target = bubble_target(&mut self.rng, &self.tuning.target_range);
            log::info!("Target {} reached, next target {}", value, self.target);
            self.events.push(BubbleEvent::TargetReached {
                value,
                next_target: self.target,
            });
        }
    }
}
