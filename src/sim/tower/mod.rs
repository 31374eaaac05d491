//! Tower game: sum numbers upward into a tower, decompose them back down

pub mod input;
pub mod state;
pub mod tick;

pub use state::{Connection, NodeOrigin, NodeState, TowerEvent, TowerGame, TowerNode};
