//! Expanding rings shown where a bubble was picked up
//!
//! Owned by the render side; the bubble engine only requests them.

use glam::Vec2;

/// Progress added per frame
pub const RIPPLE_STEP: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub pos: Vec2,
    pub max_radius: f32,
    /// 0..1; the ring grows and fades as this rises
    pub progress: f32,
}

impl Ripple {
    pub fn radius(&self) -> f32 {
        self.max_radius * self.progress
    }

    pub fn alpha(&self) -> f32 {
        1.0 - self.progress
    }
}

#[derive(Debug, Clone, Default)]
pub struct RippleField {
    ripples: Vec<Ripple>,
}

impl RippleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ring for a bubble of `radius`, growing to twice its size
    pub fn spawn(&mut self, pos: Vec2, radius: f32) {
        self.ripples.push(Ripple {
            pos,
            max_radius: radius * 2.0,
            progress: 0.0,
        });
    }

    /// One frame: grow every ring and drop finished ones
    pub fn advance(&mut self) {
        for ripple in &mut self.ripples {
            ripple.progress += RIPPLE_STEP;
        }
        self.ripples.retain(|r| r.progress < 1.0);
    }

    pub fn clear(&mut self) {
        self.ripples.clear();
    }

    pub fn as_slice(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }
}
