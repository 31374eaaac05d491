//! Pointer handling for the bubble game
//!
//! Coordinates are canvas-relative pixels. Only one drag is active at a time.

use glam::Vec2;

use super::state::{BubbleEvent, BubbleGame, Drag};
use crate::consts::MERGE_REACH;
use crate::sim::collision::point_in_circle;
use crate::sim::store::EntityId;

impl BubbleGame {
    /// Topmost interactive bubble under a point
    pub fn topmost_at(&self, point: Vec2) -> Option<EntityId> {
        self.bubbles
            .iter()
            .rev()
            .find(|b| b.is_interactive() && point_in_circle(point, b.pos, b.radius()))
            .map(|b| b.id())
    }

    /// Grab the topmost bubble under the pointer and bring it to the front
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if !self.session.is_running() || self.drag.is_some() {
            return;
        }
        let pointer = Vec2::new(x, y);
        let Some(id) = self.topmost_at(pointer) else {
            return;
        };
        let Some(bubble) = self.bubbles.get_mut(id) else {
            return;
        };

        bubble.dragged = true;
        bubble.vel = Vec2::ZERO;
        self.drag = Some(Drag {
            id,
            offset: pointer - bubble.pos,
        });
        self.events.push(BubbleEvent::Ripple {
            pos: bubble.pos,
            radius: bubble.radius(),
        });
        self.bubbles.move_to_top(id);
        log::debug!("Picked up bubble {}", id);
    }

    /// Keep the grab point under the pointer
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Some(drag) = self.drag else {
            return;
        };
        if let Some(bubble) = self.bubbles.get_mut(drag.id) {
            bubble.pos = Vec2::new(x, y) - drag.offset;
        }
    }

    /// Drop the dragged bubble: merge into a neighbour within reach or let it
    /// drift off with a fresh random velocity.
    pub fn pointer_up(&mut self, _x: f32, _y: f32) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let Some(dragged) = self.bubbles.get(drag.id) else {
            return;
        };
        let (pos, reach) = (dragged.pos, dragged.radius() * MERGE_REACH);

        let partner = if self.session.is_running() {
            self.bubbles
                .iter()
                .filter(|b| b.id() != drag.id && b.is_interactive())
                .find(|b| b.pos.distance(pos) < b.radius() + reach)
                .map(|b| b.id())
        } else {
            None
        };

        match partner {
            Some(other) => self.begin_merge(drag.id, other),
            None => {
                let vel = self.random_velocity();
                if let Some(bubble) = self.bubbles.get_mut(drag.id) {
                    bubble.vel = vel;
                }
            }
        }
        if let Some(bubble) = self.bubbles.get_mut(drag.id) {
            bubble.dragged = false;
        }
    }

    /// Pop the topmost bubble under the pointer into two parts
    pub fn double_click(&mut self, x: f32, y: f32) {
        if !self.session.is_running() || self.drag.is_some() {
            return;
        }
        if let Some(id) = self.topmost_at(Vec2::new(x, y)) {
            self.begin_split(id);
        }
    }
}
