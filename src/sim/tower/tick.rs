//! Per-frame tower update: spawn animation, auto-scroll and camera easing

use super::state::{NodeState, TowerGame};
use crate::consts::TOWER_ANIM_STEP;
use crate::sim::camera::Viewport;

impl TowerGame {
    /// Advance one frame. No-op once the session is over or without a surface.
    pub fn step(&mut self) {
        if !self.session.is_running() {
            return;
        }
        let Some(view) = self.viewport.filter(Viewport::is_ready) else {
            return;
        };

        for node in self.nodes.iter_mut() {
            node.progress = (node.progress + TOWER_ANIM_STEP).min(1.0);
            if node.state == NodeState::Spawning && node.progress >= 1.0 {
                node.state = NodeState::Idle;
            }
        }

        let top = self.nodes.iter().map(|n| n.pos().y).reduce(f32::min);
        if let Some(top) = top {
            self.camera.keep_in_view(top, &view);
        }
        self.camera.ease();
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::test_support::game_with_bases;
    use super::super::state::{NodeOrigin, NodeState};
    use crate::consts::*;
    use glam::Vec2;

    #[test]
    fn test_spawn_animation_finishes() {
        let mut game = game_with_bases(3, 4, 20);
        for _ in 0..19 {
            game.step();
        }
        assert!(game.nodes().iter().all(|n| n.state == NodeState::Spawning));
        game.step();
        game.step();
        assert!(game.nodes().iter().all(|n| n.state == NodeState::Idle));
        assert!(game.nodes().iter().all(|n| n.progress == 1.0));
    }

    #[test]
    fn test_auto_scroll_keeps_top_node_in_view() {
        let mut game = game_with_bases(3, 4, 20);
        game.spawn_node(7, Vec2::new(400.0, -300.0), NodeOrigin::Sum { parents: [1, 2] });

        for _ in 0..400 {
            game.step();
        }
        let camera = game.camera();
        assert!(camera.is_at_rest());
        let line = 600.0 * AUTO_SCROLL_LINE;
        assert!((camera.world_to_screen(Vec2::new(400.0, -300.0)).y - line).abs() < 1e-3);
    }

    #[test]
    fn test_camera_settles_after_pan() {
        let mut game = game_with_bases(3, 4, 20);
        game.camera.pan_by(Vec2::new(-50.0, 0.0));
        game.step();
        assert!(!game.camera().is_at_rest());
        for _ in 0..200 {
            game.step();
        }
        assert_eq!(game.camera().offset(), Vec2::new(-50.0, 0.0));
    }

    #[test]
    fn test_step_frozen_after_game_over() {
        let mut game = game_with_bases(3, 4, 20);
        while !game.tick_second() {}
        game.step();
        assert!(game.nodes().iter().all(|n| n.progress == 0.0));
    }
}
