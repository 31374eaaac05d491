//! Viewport and pan/zoom camera
//!
//! Screen space is canvas-relative pixels; world space is where tower nodes
//! live. `screen = world * scale + offset`. All conversions go through
//! [`screen_to_world`] / [`world_to_screen`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Size of the drawing surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero-sized surface (not laid out yet) cannot be simulated on
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current (eased) pan offset, screen pixels
    offset: Vec2,
    /// Offset the camera is easing toward
    target_offset: Vec2,
    /// Zoom factor, always within [MIN_SCALE, MAX_SCALE]
    scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

/// Map a canvas pixel to world coordinates
#[inline]
pub fn screen_to_world(camera: &Camera, screen: Vec2) -> Vec2 {
    (screen - camera.offset) / camera.scale
}

/// Map a world point to canvas pixels
#[inline]
pub fn world_to_screen(camera: &Camera, world: Vec2) -> Vec2 {
    world * camera.scale + camera.offset
}

impl Camera {
    /// Camera at `offset`, unit zoom, already at rest
    pub fn new(offset: Vec2) -> Self {
        Self {
            offset,
            target_offset: offset,
            scale: 1.0,
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn target_offset(&self) -> Vec2 {
        self.target_offset
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen_to_world(self, screen)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world_to_screen(self, world)
    }

    /// Drag-pan: moves only the target, the view catches up via [`Camera::ease`]
    pub fn pan_by(&mut self, delta: Vec2) {
        self.target_offset += delta;
    }

    /// Zoom one wheel notch around a screen point.
    ///
    /// The world point under `pointer` stays under it. Both current and
    /// target offsets jump immediately (no easing on zoom).
    pub fn zoom_at(&mut self, pointer: Vec2, delta_y: f32) {
        let anchor = screen_to_world(self, pointer);
        let scale = if delta_y < 0.0 {
            self.scale * ZOOM_FACTOR
        } else {
            self.scale / ZOOM_FACTOR
        };
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);

        let offset = pointer - anchor * self.scale;
        self.offset = offset;
        self.target_offset = offset;
    }

    /// Retarget vertically so `top_world_y` sits no higher than the
    /// auto-scroll line of the viewport.
    pub fn keep_in_view(&mut self, top_world_y: f32, viewport: &Viewport) {
        let line = viewport.height * AUTO_SCROLL_LINE;
        if top_world_y * self.scale + self.offset.y < line {
            self.target_offset.y = line - top_world_y * self.scale;
        }
    }

    /// One frame of exponential smoothing toward the target offset.
    ///
    /// Snaps once within CAMERA_SNAP on both axes so the camera comes to rest.
    pub fn ease(&mut self) {
        let next = self.offset + (self.target_offset - self.offset) * CAMERA_EASE;
        let remaining = (self.target_offset - next).abs();
        if remaining.x < CAMERA_SNAP && remaining.y < CAMERA_SNAP {
            self.offset = self.target_offset;
        } else {
            self.offset = next;
        }
    }

    pub fn is_at_rest(&self) -> bool {
        self.offset == self.target_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_screen_world_roundtrip() {
        let mut camera = Camera::new(Vec2::new(30.0, -12.0));
        camera.zoom_at(Vec2::new(200.0, 150.0), -1.0);
        let world = Vec2::new(123.0, 456.0);
        let back = screen_to_world(&camera, world_to_screen(&camera, world));
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut camera = Camera::default();
        for _ in 0..50 {
            camera.zoom_at(Vec2::new(10.0, 10.0), -100.0);
        }
        assert_eq!(camera.scale(), MAX_SCALE);
        for _ in 0..50 {
            camera.zoom_at(Vec2::new(10.0, 10.0), 100.0);
        }
        assert_eq!(camera.scale(), MIN_SCALE);
    }

    #[test]
    fn test_pan_eases_then_snaps() {
        let mut camera = Camera::default();
        camera.pan_by(Vec2::new(100.0, 0.0));
        assert_eq!(camera.offset(), Vec2::ZERO);

        camera.ease();
        assert!((camera.offset().x - 10.0).abs() < 1e-4);

        for _ in 0..200 {
            camera.ease();
        }
        assert!(camera.is_at_rest());
        assert_eq!(camera.offset(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_keep_in_view_only_scrolls_when_above_line() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut camera = Camera::default();

        camera.keep_in_view(500.0, &viewport);
        assert_eq!(camera.target_offset(), Vec2::ZERO);

        camera.keep_in_view(100.0, &viewport);
        assert!((camera.target_offset().y - 140.0).abs() < 1e-4);
    }

    #[test]
    fn test_unready_viewport() {
        assert!(!Viewport::new(0.0, 600.0).is_ready());
        assert!(Viewport::new(1.0, 1.0).is_ready());
    }

    proptest! {
        #[test]
        fn prop_zoom_keeps_world_point_under_pointer(
            px in 0.0f32..1200.0,
            py in 0.0f32..900.0,
            ox in -500.0f32..500.0,
            oy in -500.0f32..500.0,
            notches in proptest::collection::vec(-3.0f32..3.0, 1..8),
        ) {
            let pointer = Vec2::new(px, py);
            let mut camera = Camera::new(Vec2::new(ox, oy));
            for delta in notches {
                let before = screen_to_world(&camera, pointer);
                camera.zoom_at(pointer, delta);
                let after = screen_to_world(&camera, pointer);
                prop_assert!((before - after).length() < 1e-2);
                prop_assert!(camera.scale() >= MIN_SCALE && camera.scale() <= MAX_SCALE);
                prop_assert!(camera.is_at_rest());
            }
        }
    }
}
