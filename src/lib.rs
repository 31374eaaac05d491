//! Math Playground - arithmetic mini-games for kids
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bubble + tower engines, camera, session)
//! - `renderer`: WebGPU rendering pipeline (read-only view of the sim)
//! - `arcade`: Glue between one active engine, the frame clock and rewards
//! - `tuning`: Data-driven difficulty tables
//! - `settings` / `rewards`: Persisted preferences and puzzle-piece collection

pub mod arcade;
pub mod renderer;
pub mod rewards;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use arcade::{ActiveGame, Arcade, GameKind};
pub use rewards::PieceCollection;
pub use settings::Settings;
pub use tuning::{Difficulty, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Bubble radius = sqrt(value) * BUBBLE_SIZE_FACTOR + BUBBLE_BASE_RADIUS
    pub const BUBBLE_SIZE_FACTOR: f32 = 5.0;
    pub const BUBBLE_BASE_RADIUS: f32 = 15.0;
    /// Bubble session length (seconds)
    pub const BUBBLE_GAME_DURATION: u32 = 60;
    /// Seconds added when a merge hits the target
    pub const BUBBLE_TIME_BONUS: u32 = 5;
    /// Animation progress added per frame
    pub const BUBBLE_ANIM_STEP: f32 = 0.07;
    /// Time scale right after a merge/split starts
    pub const SLOW_MOTION_SCALE: f32 = 0.1;
    /// Per-frame recovery rate of the time scale toward 1.0
    pub const TIME_SCALE_RECOVERY: f32 = 0.05;
    /// Merge reach = target radius + dragged radius * MERGE_REACH
    pub const MERGE_REACH: f32 = 0.7;
    /// Split children spawn this far from the parent on each axis
    pub const SPLIT_OFFSET: f32 = 10.0;
    /// Extra launch speed given to split children on each axis
    pub const SPLIT_KICK: f32 = 1.0;

    /// Tower session length (seconds)
    pub const TOWER_GAME_DURATION: u32 = 120;
    pub const NODE_RADIUS: f32 = 40.0;
    /// Vertical gap between a sum node and its highest parent
    pub const VERTICAL_SPACING: f32 = 120.0;
    /// Base nodes sit this far above the bottom edge
    pub const BASE_Y_OFFSET: f32 = 50.0;
    pub const TOWER_ANIM_STEP: f32 = 0.05;
    pub const SUM_AWARD: u64 = 10;
    pub const TARGET_AWARD: u64 = 50;
    pub const TOWER_TIME_BONUS: u32 = 15;
    pub const DECOMPOSE_AWARD: u64 = 5;
    /// Decomposed parts sit this far below their source...
    pub const DECOMPOSE_DROP: f32 = VERTICAL_SPACING / 1.5;
    /// ...and this far to either side
    pub const DECOMPOSE_SPREAD: f32 = NODE_RADIUS * 1.5;

    /// Camera limits and smoothing
    pub const MIN_SCALE: f32 = 0.4;
    pub const MAX_SCALE: f32 = 2.0;
    pub const ZOOM_FACTOR: f32 = 1.1;
    pub const CAMERA_EASE: f32 = 0.1;
    pub const CAMERA_SNAP: f32 = 0.1;
    /// Topmost node is kept below this fraction of the viewport height
    pub const AUTO_SCROLL_LINE: f32 = 0.4;

    /// Score needed per unlocked puzzle piece
    pub const PIECE_AWARD_INTERVAL: u64 = 50;
}
