//! One active game plus the clock, ripples and rewards around it
//!
//! The browser shell forwards frames, timer ticks and pointer events here;
//! everything below is platform independent.

use crate::consts::*;
use crate::renderer::ripple::RippleField;
use crate::renderer::scene::{bubble_scene, tower_scene};
use crate::renderer::vertex::Vertex;
use crate::rewards::PieceCollection;
use crate::settings::Settings;
use crate::sim::bubble::{BubbleEvent, BubbleGame};
use crate::sim::session::{Hud, Session};
use crate::sim::tower::{TowerEvent, TowerGame};
use crate::tuning::{Difficulty, Tuning};

/// Which game is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameKind {
    #[default]
    Bubble,
    Tower,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Bubble => "bubble",
            GameKind::Tower => "tower",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bubble" | "bubbles" => Some(GameKind::Bubble),
            "tower" => Some(GameKind::Tower),
            _ => None,
        }
    }

    /// `#tower` selects the tower game, anything else the bubble game
    pub fn from_hash(hash: &str) -> Self {
        Self::from_str(hash.trim_start_matches('#')).unwrap_or_default()
    }
}

pub enum ActiveGame {
    Bubble(BubbleGame),
    Tower(TowerGame),
}

impl ActiveGame {
    pub fn new(kind: GameKind, seed: u64, difficulty: Difficulty, tuning: &Tuning) -> Self {
        let level = tuning.level(difficulty);
        match kind {
            GameKind::Bubble => ActiveGame::Bubble(BubbleGame::new(seed, level.bubble.clone())),
            GameKind::Tower => ActiveGame::Tower(TowerGame::new(seed, level.tower.clone())),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            ActiveGame::Bubble(_) => GameKind::Bubble,
            ActiveGame::Tower(_) => GameKind::Tower,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        match self {
            ActiveGame::Bubble(g) => g.resize(width, height),
            ActiveGame::Tower(g) => g.resize(width, height),
        }
    }

    pub fn reset(&mut self) -> bool {
        match self {
            ActiveGame::Bubble(g) => g.reset(),
            ActiveGame::Tower(g) => g.reset(),
        }
    }

    pub fn step(&mut self) {
        match self {
            ActiveGame::Bubble(g) => g.step(),
            ActiveGame::Tower(g) => g.step(),
        }
    }

    pub fn tick_second(&mut self) -> bool {
        match self {
            ActiveGame::Bubble(g) => g.tick_second(),
            ActiveGame::Tower(g) => g.tick_second(),
        }
    }

    pub fn session(&self) -> &Session {
        match self {
            ActiveGame::Bubble(g) => g.session(),
            ActiveGame::Tower(g) => g.session(),
        }
    }

    pub fn hud(&self) -> Hud {
        match self {
            ActiveGame::Bubble(g) => g.hud(),
            ActiveGame::Tower(g) => g.hud(),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        match self {
            ActiveGame::Bubble(g) => g.pointer_down(x, y),
            ActiveGame::Tower(g) => g.pointer_down(x, y),
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        match self {
            ActiveGame::Bubble(g) => g.pointer_move(x, y),
            ActiveGame::Tower(g) => g.pointer_move(x, y),
        }
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        match self {
            ActiveGame::Bubble(g) => g.pointer_up(x, y),
            ActiveGame::Tower(g) => g.pointer_up(x, y),
        }
    }

    pub fn double_click(&mut self, x: f32, y: f32) {
        match self {
            ActiveGame::Bubble(g) => g.double_click(x, y),
            ActiveGame::Tower(g) => g.double_click(x, y),
        }
    }

    /// Only the tower game zooms
    pub fn wheel(&mut self, delta_y: f32, x: f32, y: f32) -> bool {
        match self {
            ActiveGame::Bubble(_) => false,
            ActiveGame::Tower(g) => {
                g.wheel(delta_y, x, y);
                true
            }
        }
    }
}

pub struct Arcade {
    game: ActiveGame,
    difficulty: Difficulty,
    tuning: Tuning,
    ripples: RippleField,
    ripples_enabled: bool,
    accumulator: f32,
    collection: PieceCollection,
    /// Score at the last reward check
    last_score: u64,
    /// Pieces unlocked since the shell last asked
    unlocked: Vec<String>,
    /// Latest HUD message not yet shown
    notice: Option<String>,
}

impl Arcade {
    pub fn new(
        kind: GameKind,
        settings: &Settings,
        tuning: Tuning,
        collection: PieceCollection,
        seed: u64,
    ) -> Self {
        Self {
            game: ActiveGame::new(kind, seed, settings.difficulty, &tuning),
            difficulty: settings.difficulty,
            tuning,
            ripples: RippleField::new(),
            ripples_enabled: settings.ripples,
            accumulator: 0.0,
            collection,
            last_score: 0,
            unlocked: Vec::new(),
            notice: None,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.game.kind()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn game(&self) -> &ActiveGame {
        &self.game
    }

    pub fn collection(&self) -> &PieceCollection {
        &self.collection
    }

    pub fn hud(&self) -> Hud {
        self.game.hud()
    }

    pub fn is_over(&self) -> bool {
        self.game.session().is_over()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.game.resize(width, height);
    }

    /// Restart the current game
    pub fn reset(&mut self) -> bool {
        self.accumulator = 0.0;
        self.last_score = 0;
        self.ripples.clear();
        self.notice = None;
        self.game.reset()
    }

    /// Turn pick-up ripples on or off; rings on screen go away at once
    pub fn set_ripples(&mut self, enabled: bool) {
        self.ripples_enabled = enabled;
        if !enabled {
            self.ripples.clear();
        }
    }

    /// The page came back (back/forward cache). Drops the wall-clock backlog
    /// and says whether the clock and frame loop should run again.
    pub fn resume(&mut self) -> bool {
        self.accumulator = 0.0;
        self.game.session().is_running()
    }

    /// Swap game and/or level, keeping the surface size, and start it
    pub fn switch(&mut self, kind: GameKind, difficulty: Difficulty, seed: u64) -> bool {
        let viewport = match &self.game {
            ActiveGame::Bubble(g) => g.viewport(),
            ActiveGame::Tower(g) => g.viewport(),
        };
        self.difficulty = difficulty;
        self.game = ActiveGame::new(kind, seed, difficulty, &self.tuning);
        if let Some(view) = viewport {
            self.game.resize(view.width, view.height);
        }
        log::info!("Switched to {} ({})", kind.as_str(), difficulty.as_str());
        self.reset()
    }

    /// Advance by wall-clock `dt` seconds in fixed frames.
    ///
    /// Returns the number of simulation frames run.
    pub fn update(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            self.game.step();
            self.ripples.advance();
            self.accumulator -= FRAME_DT;
            substeps += 1;
        }
        // Drop backlog that cannot be caught up
        self.accumulator = self.accumulator.min(FRAME_DT * MAX_SUBSTEPS as f32);

        self.after_action();
        substeps
    }

    /// One-second timer; true on the tick that ends the session
    pub fn tick_second(&mut self) -> bool {
        self.game.tick_second()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.game.pointer_down(x, y);
        self.after_action();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.game.pointer_move(x, y);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.game.pointer_up(x, y);
        self.after_action();
    }

    pub fn double_click(&mut self, x: f32, y: f32) {
        self.game.double_click(x, y);
        self.after_action();
    }

    pub fn wheel(&mut self, delta_y: f32, x: f32, y: f32) -> bool {
        self.game.wheel(delta_y, x, y)
    }

    /// Pieces unlocked since the last call; the caller persists the collection
    pub fn drain_unlocked(&mut self) -> Vec<String> {
        std::mem::take(&mut self.unlocked)
    }

    /// Message for the HUD since the last call, newest wins
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Triangle list for the current frame, in canvas pixels
    pub fn vertices(&self) -> Vec<Vertex> {
        match &self.game {
            ActiveGame::Bubble(g) => bubble_scene(g, self.ripples.as_slice()),
            ActiveGame::Tower(g) => tower_scene(g),
        }
    }

    /// Route engine events and check score milestones
    fn after_action(&mut self) {
        match &mut self.game {
            ActiveGame::Bubble(g) => {
                for event in g.drain_events() {
                    if let BubbleEvent::Ripple { pos, radius } = event {
                        if self.ripples_enabled {
                            self.ripples.spawn(pos, radius);
                        }
                    } else if let Some(text) = bubble_notice(&event) {
                        self.notice = Some(text);
                    }
                }
            }
            ActiveGame::Tower(g) => {
                if let Some(event) = g.drain_events().last() {
                    self.notice = Some(tower_notice(event));
                }
            }
        }

        let score = self.game.session().score();
        if score != self.last_score {
            if let Some(piece) = self.collection.record_score_change(self.last_score, score) {
                self.unlocked.push(piece);
            }
            self.last_score = score;
        }
    }
}

/// HUD line for an engine event; ripples are drawn, not announced
fn bubble_notice(event: &BubbleEvent) -> Option<String> {
    match *event {
        BubbleEvent::Ripple { .. } => None,
        BubbleEvent::Split { value, parts: (a, b) } => Some(format!("{value} = {a} + {b}")),
        BubbleEvent::Merged { value, parts: (a, b) } => Some(format!("{a} + {b} = {value}")),
        BubbleEvent::TargetReached { value, next_target } => {
            Some(format!("You made {value}! Next target: {next_target}"))
        }
    }
}

fn tower_notice(event: &TowerEvent) -> String {
    match *event {
        TowerEvent::Summed { value, parts: (a, b), .. } => format!("{a} + {b} = {value}"),
        TowerEvent::Decomposed { parts: (a, b), .. } => format!("{} = {a} + {b}", a + b),
        TowerEvent::TargetReached { value, next_target } => {
            format!("You built {value}! Next target: {next_target}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arcade(kind: GameKind) -> Arcade {
        let mut arcade = Arcade::new(
            kind,
            &Settings::default(),
            Tuning::default(),
            PieceCollection::new(),
            7,
        );
        arcade.resize(800.0, 600.0);
        assert!(arcade.reset());
        arcade
    }

    #[test]
    fn test_game_kind_from_hash() {
        assert_eq!(GameKind::from_hash("#tower"), GameKind::Tower);
        assert_eq!(GameKind::from_hash("#Tower"), GameKind::Tower);
        assert_eq!(GameKind::from_hash(""), GameKind::Bubble);
        assert_eq!(GameKind::from_hash("#quiz"), GameKind::Bubble);
    }

    #[test]
    fn test_fixed_step_accumulation() {
        let mut arcade = arcade(GameKind::Bubble);
        assert_eq!(arcade.update(FRAME_DT * 0.5), 0);
        assert_eq!(arcade.update(FRAME_DT * 0.6), 1);
        // long stall is capped
        assert_eq!(arcade.update(5.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_pickup_spawns_ripple() {
        let mut arcade = arcade(GameKind::Bubble);
        for _ in 0..30 {
            arcade.update(FRAME_DT);
        }
        let pos = match arcade.game() {
            ActiveGame::Bubble(g) => g.bubbles()[0].pos,
            ActiveGame::Tower(_) => unreachable!(),
        };
        arcade.pointer_down(pos.x, pos.y);
        assert_eq!(arcade.ripples.as_slice().len(), 1);
        arcade.pointer_up(pos.x, pos.y);
    }

    #[test]
    fn test_reward_unlocked_on_milestone() {
        let mut arcade = arcade(GameKind::Tower);
        let ActiveGame::Tower(game) = &mut arcade.game else {
            unreachable!()
        };
        // force a target hit: 10 + 50 points
        let target = game.node(1).unwrap().value() + game.node(2).unwrap().value();
        game.target = target;
        game.try_sum(1, 2).unwrap();

        arcade.after_action();
        assert!(arcade.take_notice().unwrap().starts_with(&format!("You built {target}!")));
        assert_eq!(arcade.take_notice(), None);
        assert_eq!(arcade.drain_unlocked(), vec!["puzzle1_0_0".to_string()]);
        assert_eq!(arcade.collection().count(), 1);
        assert!(arcade.drain_unlocked().is_empty());
    }

    #[test]
    fn test_merge_and_split_reported_to_hud() {
        let mut arcade = arcade(GameKind::Bubble);
        let ActiveGame::Bubble(game) = &mut arcade.game else {
            unreachable!()
        };
        game.events.push(BubbleEvent::Merged { value: 9, parts: (4, 5) });
        arcade.after_action();
        assert_eq!(arcade.take_notice().as_deref(), Some("4 + 5 = 9"));

        let ActiveGame::Bubble(game) = &mut arcade.game else {
            unreachable!()
        };
        game.events.push(BubbleEvent::Split { value: 7, parts: (3, 4) });
        game.events.push(BubbleEvent::Ripple { pos: glam::Vec2::ZERO, radius: 20.0 });
        arcade.after_action();
        assert_eq!(arcade.take_notice().as_deref(), Some("7 = 3 + 4"));
    }

    #[test]
    fn test_disabling_ripples_clears_rings() {
        let mut arcade = arcade(GameKind::Bubble);
        for _ in 0..30 {
            arcade.update(FRAME_DT);
        }
        let pos = match arcade.game() {
            ActiveGame::Bubble(g) => g.bubbles()[0].pos,
            ActiveGame::Tower(_) => unreachable!(),
        };
        arcade.pointer_down(pos.x, pos.y);
        assert!(!arcade.ripples.is_empty());

        arcade.set_ripples(false);
        assert!(arcade.ripples.is_empty());
        arcade.pointer_up(pos.x, pos.y);
        arcade.pointer_down(pos.x, pos.y);
        assert!(arcade.ripples.is_empty());
    }

    #[test]
    fn test_resume_only_while_running() {
        let mut arcade = arcade(GameKind::Tower);
        arcade.accumulator = FRAME_DT * 2.0;
        assert!(arcade.resume());
        assert_eq!(arcade.accumulator, 0.0);

        while !arcade.tick_second() {}
        assert!(!arcade.resume());
    }

    #[test]
    fn test_wheel_only_for_tower() {
        let mut bubbles = arcade(GameKind::Bubble);
        assert!(!bubbles.wheel(-1.0, 10.0, 10.0));
        let mut tower = arcade(GameKind::Tower);
        assert!(tower.wheel(-1.0, 10.0, 10.0));
    }

    #[test]
    fn test_switch_keeps_surface() {
        let mut arcade = arcade(GameKind::Bubble);
        assert!(arcade.switch(GameKind::Tower, Difficulty::Hard, 3));
        assert_eq!(arcade.kind(), GameKind::Tower);
        assert_eq!(arcade.difficulty(), Difficulty::Hard);
        assert!(arcade.hud().target > 0);
    }

    #[test]
    fn test_timer_ends_session_once() {
        let mut arcade = arcade(GameKind::Bubble);
        let ends = (0..(BUBBLE_GAME_DURATION + 5))
            .filter(|_| arcade.tick_second())
            .count();
        assert_eq!(ends, 1);
        assert!(arcade.is_over());
    }
}
