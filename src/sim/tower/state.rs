//! Tower game state
//!
//! Nodes live in world space; the camera maps them to the canvas. How a node
//! came to exist is a single [`NodeOrigin`], and connections are derived
//! from those origins on demand.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::camera::{Camera, Viewport};
use crate::sim::session::{Hud, Session};
use crate::sim::store::{Entity, EntityId, EntityStore};
use crate::sim::target::tower_initial_target;
use crate::tuning::TowerTuning;

/// How a node came to exist. Exactly one per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeOrigin {
    /// One of the two seed nodes
    Base,
    /// Sum of two existing nodes, in drag order
    Sum { parents: [EntityId; 2] },
    /// One half of a decomposed node
    Decomposed { from: EntityId },
}

impl NodeOrigin {
    /// Root-level nodes are the bases: neither summed nor decomposed
    pub fn is_root(&self) -> bool {
        matches!(self, NodeOrigin::Base)
    }

    /// True when this is a sum of exactly `a` and `b`, in either order
    pub fn is_sum_of(&self, a: EntityId, b: EntityId) -> bool {
        match *self {
            NodeOrigin::Sum { parents: [p, q] } => (p == a && q == b) || (p == b && q == a),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    Spawning,
    Idle,
    /// Source of the current drag
    Selected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerNode {
    id: EntityId,
    value: u32,
    /// World-space center; fixed once placed
    pos: Vec2,
    origin: NodeOrigin,
    pub state: NodeState,
    pub progress: f32,
}

impl Entity for TowerNode {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl TowerNode {
    pub fn new(id: EntityId, value: u32, pos: Vec2, origin: NodeOrigin) -> Self {
        Self {
            id,
            value,
            pos,
            origin,
            state: NodeState::Spawning,
            progress: 0.0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn origin(&self) -> NodeOrigin {
        self.origin
    }

    pub fn radius(&self) -> f32 {
        NODE_RADIUS
    }

    pub fn contains(&self, world: Vec2) -> bool {
        world.distance(self.pos) < NODE_RADIUS
    }
}

/// Edge for drawing, derived from node origins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub from: EntityId,
    pub to: EntityId,
}

/// What the pointer is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) enum Interaction {
    #[default]
    None,
    /// Dragging a connector out of `source`; `line_end` is world space
    DraggingNode { source: EntityId, line_end: Option<Vec2> },
    /// Panning; `last` is the previous pointer position in screen space
    Panning { last: Vec2 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TowerEvent {
    Summed { id: EntityId, value: u32, parts: (u32, u32) },
    Decomposed { from: EntityId, parts: (u32, u32) },
    TargetReached { value: u32, next_target: u32 },
}

/// The number tower game
pub struct TowerGame {
    pub(crate) tuning: TowerTuning,
    pub(crate) rng: Pcg32,
    pub(crate) nodes: EntityStore<TowerNode>,
    pub(crate) camera: Camera,
    pub(crate) session: Session,
    pub(crate) target: u32,
    pub(crate) viewport: Option<Viewport>,
    pub(crate) interaction: Interaction,
    pub(crate) events: Vec<TowerEvent>,
}

impl TowerGame {
    pub fn new(seed: u64, tuning: TowerTuning) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            nodes: EntityStore::new(),
            camera: Camera::default(),
            session: Session::new(TOWER_GAME_DURATION),
            target: 0,
            viewport: None,
            interaction: Interaction::None,
            events: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Some(Viewport::new(width, height));
    }

    /// Two fresh base nodes, a new target and a camera centred on the pair.
    ///
    /// Returns false (and changes nothing) while there is no surface.
    pub fn reset(&mut self) -> bool {
        let Some(view) = self.viewport.filter(Viewport::is_ready) else {
            log::warn!("Tower reset skipped: no drawing surface yet");
            return false;
        };

        self.session.restart();
        self.interaction = Interaction::None;
        self.events.clear();
        self.nodes.reset();

        let first = self.tuning.base_range.sample(&mut self.rng);
        let second = self.tuning.base_range.sample(&mut self.rng);
        let y = view.height - BASE_Y_OFFSET;
        let left = Vec2::new(view.width * 0.3, y);
        let right = Vec2::new(view.width * 0.7, y);
        self.spawn_node(first, left, NodeOrigin::Base);
        self.spawn_node(second, right, NodeOrigin::Base);

        self.target = tower_initial_target(&mut self.rng, first, second, &self.tuning);
        let mid_x = (left.x + right.x) * 0.5;
        self.camera = Camera::new(Vec2::new(view.width * 0.5 - mid_x, 0.0));

        log::info!(
            "Tower game started: bases {} and {}, target {}",
            first,
            second,
            self.target
        );
        true
    }

    pub fn tick_second(&mut self) -> bool {
        self.session.tick_second()
    }

    pub fn nodes(&self) -> &[TowerNode] {
        self.nodes.as_slice()
    }

    pub fn node(&self, id: EntityId) -> Option<&TowerNode> {
        self.nodes.get(id)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
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

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn drain_events(&mut self) -> Vec<TowerEvent> {
        std::mem::take(&mut self.events)
    }

    /// All edges, rebuilt from node origins in creation order
    pub fn connections(&self) -> Vec<Connection> {
        let mut edges = Vec::new();
        for node in self.nodes.iter() {
            match node.origin {
                NodeOrigin::Base => {}
                NodeOrigin::Sum { parents } => {
                    edges.extend(parents.iter().map(|&from| Connection { from, to: node.id }));
                }
                NodeOrigin::Decomposed { from } => edges.push(Connection { from, to: node.id }),
            }
        }
        edges
    }

    /// World-space connector being dragged out of a node, if any
    pub fn drag_line(&self) -> Option<(Vec2, Vec2)> {
        match self.interaction {
            Interaction::DraggingNode {
                source,
                line_end: Some(end),
            } => self.nodes.get(source).map(|n| (n.pos, end)),
            _ => None,
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.interaction, Interaction::Panning { .. })
    }

    /// True once some node lists `id` as its decomposition source
    pub fn is_decomposed(&self, id: EntityId) -> bool {
        self.nodes
            .iter()
            .any(|n| n.origin == NodeOrigin::Decomposed { from: id })
    }

    /// Node under a world-space point
    pub fn node_at(&self, world: Vec2) -> Option<EntityId> {
        self.nodes.iter().find(|n| n.contains(world)).map(|n| n.id)
    }

    pub(crate) fn spawn_node(&mut self, value: u32, pos: Vec2, origin: NodeOrigin) -> EntityId {
        self.nodes.spawn(|id| TowerNode::new(id, value, pos, origin))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::tuning::Tuning;

    /// Running 800x600 game with base values forced to `a` and `b`
    pub fn game_with_bases(a: u32, b: u32, target: u32) -> TowerGame {
        let mut game = TowerGame::new(11, Tuning::default().easy.tower);
        game.resize(800.0, 600.0);
        assert!(game.reset());
        game.nodes.get_mut(1).unwrap().value = a;
        game.nodes.get_mut(2).unwrap().value = b;
        game.target = target;
        game
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_reset_places_bases() {
        let tuning = Tuning::default().medium.tower;
        let mut game = TowerGame::new(3, tuning.clone());
        game.resize(1000.0, 700.0);
        assert!(game.reset());

        let nodes = game.nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!((nodes[0].id(), nodes[1].id()), (1, 2));
        assert_eq!(nodes[0].pos(), Vec2::new(300.0, 650.0));
        assert_eq!(nodes[1].pos(), Vec2::new(700.0, 650.0));
        assert!(nodes.iter().all(|n| n.origin().is_root()));
        assert!(nodes.iter().all(|n| tuning.base_range.contains(n.value())));

        let bases = nodes[0].value() + nodes[1].value();
        assert!(game.target() >= bases + tuning.target_bonus.min);
        assert!(game.target() < bases + tuning.target_bonus.max);
        // pair already centred
        assert_eq!(game.camera().offset(), Vec2::ZERO);
        assert_eq!(game.session().time_left(), TOWER_GAME_DURATION);
    }

    #[test]
    fn test_reset_without_surface() {
        let mut game = TowerGame::new(3, Tuning::default().easy.tower);
        assert!(!game.reset());
        assert!(game.nodes().is_empty());
    }

    #[test]
    fn test_connections_follow_origins() {
        let mut game = test_support::game_with_bases(4, 6, 99);
        let sum = game.spawn_node(10, Vec2::ZERO, NodeOrigin::Sum { parents: [2, 1] });
        let part = game.spawn_node(5, Vec2::ZERO, NodeOrigin::Decomposed { from: sum });

        assert_eq!(
            game.connections(),
            vec![
                Connection { from: 2, to: sum },
                Connection { from: 1, to: sum },
                Connection { from: sum, to: part },
            ]
        );
        assert!(game.is_decomposed(sum));
        assert!(!game.is_decomposed(1));
    }

    #[test]
    fn test_origin_sum_is_unordered() {
        let origin = NodeOrigin::Sum { parents: [3, 7] };
        assert!(origin.is_sum_of(7, 3));
        assert!(origin.is_sum_of(3, 7));
        assert!(!origin.is_sum_of(3, 4));
        assert!(!NodeOrigin::Base.is_sum_of(3, 7));
    }
}
