//! Read-only snapshot of an engine as a triangle list in canvas pixels

use glam::Vec2;
use std::f32::consts::PI;

use super::ripple::Ripple;
use super::shapes::{circle, line, number, ring, segments_for};
use super::vertex::{Vertex, colors};
use crate::sim::bubble::{Bubble, BubbleGame, BubbleState};
use crate::sim::tower::{NodeOrigin, NodeState, TowerGame, TowerNode};

/// Labels are skipped on bubbles drawn smaller than this
const MIN_LABEL_RADIUS: f32 = 10.0;
const RIM_WIDTH: f32 = 3.0;

/// On-screen radius of a bubble for its animation state
pub fn bubble_display_radius(bubble: &Bubble) -> f32 {
    let r = bubble.radius();
    let p = bubble.progress;
    match bubble.state {
        BubbleState::Spawning => r * p,
        BubbleState::Idle => r,
        BubbleState::Splitting => r * (1.0 - p),
        BubbleState::Merging { .. } => r * (1.0 - 0.5 * (p * PI).sin()),
    }
}

/// On-screen radius of a node (world radius scaled by zoom, grown in while spawning)
pub fn node_display_radius(node: &TowerNode, scale: f32) -> f32 {
    let grow = match node.state {
        NodeState::Spawning => node.progress,
        _ => 1.0,
    };
    node.radius() * scale * grow
}

pub fn bubble_scene(game: &BubbleGame, ripples: &[Ripple]) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for ripple in ripples {
        let r = ripple.radius();
        if r > RIM_WIDTH {
            vertices.extend(ring(
                ripple.pos,
                r - RIM_WIDTH,
                r,
                colors::fade(colors::RIPPLE, ripple.alpha()),
                segments_for(r),
            ));
        }
    }

    for bubble in game.bubbles() {
        let r = bubble_display_radius(bubble);
        if r <= 0.0 {
            continue;
        }
        let segments = segments_for(r);
        vertices.extend(circle(bubble.pos, r, colors::bubble_fill(bubble.value()), segments));

        let rim = if bubble.dragged {
            colors::BUBBLE_DRAGGED_RIM
        } else {
            colors::BUBBLE_RIM
        };
        vertices.extend(ring(bubble.pos, (r - RIM_WIDTH).max(0.0), r, rim, segments));

        if r > MIN_LABEL_RADIUS {
            vertices.extend(number(bubble.value(), bubble.pos, r * 0.7, colors::LABEL));
        }
    }

    vertices
}

pub fn tower_scene(game: &TowerGame) -> Vec<Vertex> {
    let camera = game.camera();
    let scale = camera.scale();
    let screen = |world: Vec2| camera.world_to_screen(world);
    let mut vertices = Vec::new();

    for edge in game.connections() {
        if let (Some(from), Some(to)) = (game.node(edge.from), game.node(edge.to)) {
            vertices.extend(line(
                screen(from.pos()),
                screen(to.pos()),
                (4.0 * scale).max(1.5),
                colors::CONNECTION,
            ));
        }
    }

    if let Some((from, to)) = game.drag_line() {
        vertices.extend(line(screen(from), screen(to), (5.0 * scale).max(2.0), colors::DRAG_LINE));
    }

    for node in game.nodes() {
        let r = node_display_radius(node, scale);
        if r <= 0.0 {
            continue;
        }
        let center = screen(node.pos());
        let segments = segments_for(r);
        let fill = match node.origin() {
            NodeOrigin::Base => colors::NODE_BASE,
            NodeOrigin::Sum { .. } => colors::NODE_SUM,
            NodeOrigin::Decomposed { .. } => colors::NODE_PART,
        };
        vertices.extend(circle(center, r, fill, segments));

        let rim_width = RIM_WIDTH * scale.max(0.5);
        if node.state == NodeState::Selected {
            vertices.extend(ring(center, r, r + rim_width * 1.5, colors::NODE_SELECTED_RIM, segments));
        } else if node.value() == game.target() {
            vertices.extend(ring(center, r, r + rim_width, colors::NODE_TARGET_RIM, segments));
        }

        if r > MIN_LABEL_RADIUS {
            vertices.extend(number(node.value(), center, r * 0.7, colors::LABEL_LIGHT));
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_display_radius_by_state() {
        let mut bubble = Bubble::new(1, 4, Vec2::ZERO, Vec2::ZERO);
        bubble.progress = 0.5;
        assert_eq!(bubble_display_radius(&bubble), 12.5);

        bubble.state = BubbleState::Splitting;
        assert_eq!(bubble_display_radius(&bubble), 12.5);

        bubble.state = BubbleState::Merging { partner: 2 };
        assert!((bubble_display_radius(&bubble) - 12.5).abs() < 1e-4);

        bubble.state = BubbleState::Idle;
        assert_eq!(bubble_display_radius(&bubble), 25.0);
    }

    #[test]
    fn test_scenes_render_something() {
        let mut bubbles = BubbleGame::new(1, Tuning::default().easy.bubble);
        bubbles.resize(640.0, 480.0);
        bubbles.reset();
        assert!(bubble_scene(&bubbles, &[]).is_empty(), "all bubbles start at zero size");
        for _ in 0..20 {
            bubbles.step();
        }
        assert!(!bubble_scene(&bubbles, &[]).is_empty());

        let mut tower = TowerGame::new(1, Tuning::default().easy.tower);
        tower.resize(640.0, 480.0);
        tower.reset();
        for _ in 0..30 {
            tower.step();
        }
        assert!(!tower_scene(&tower).is_empty());
    }
}
