//! Collision detection and response for circles
//!
//! Everything in the playground is a circle: hit-tests against the pointer,
//! wall bounces inside the canvas, and soft (positional) overlap separation.

use glam::Vec2;

/// Result of a circle-circle overlap check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circles overlap
    pub hit: bool,
    /// Unit axis from the second circle toward the first
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Is the point strictly inside the circle?
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Check overlap between circle `a` and circle `b`
///
/// Coincident centers still report a hit, separated along +X so the
/// response never produces NaNs.
pub fn circle_circle_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = a_pos - b_pos;
    let dist = delta.length();
    let reach = a_radius + b_radius;
    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::X };
    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Symmetric soft resolution: push both centers apart by half the overlap.
///
/// No velocity exchange happens here.
pub fn separate(a_pos: &mut Vec2, b_pos: &mut Vec2, result: &CollisionResult) {
    if !result.hit {
        return;
    }
    let push = result.normal * result.penetration * 0.5;
    *a_pos += push;
    *b_pos -= push;
}

/// Reflect velocity around a surface normal
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce a circle off the edges of a `width` x `height` box.
///
/// An axis flips only when the circle's edge is past the wall *and* still
/// moving outward, so a circle spawned outside drifts back in.
pub fn bounce_off_bounds(pos: Vec2, vel: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    let mut vel = vel;
    if (pos.x - radius < 0.0 && vel.x < 0.0) || (pos.x + radius > width && vel.x > 0.0) {
        vel = reflect_velocity(vel, Vec2::X);
    }
    if (pos.y - radius < 0.0 && vel.y < 0.0) || (pos.y + radius > height && vel.y > 0.0) {
        vel = reflect_velocity(vel, Vec2::Y);
    }
    vel
}
