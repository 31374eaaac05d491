//! Session clock and score
//!
//! `Ready -> Running -> GameOver`. A reset goes back to `Running`.
//! Score never decreases; the countdown is clamped at zero and the
//! transition to `GameOver` happens exactly once per session.

use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Created but not reset onto a surface yet
    Ready,
    /// Clock running, input accepted
    Running,
    /// Time ran out; terminal until the next reset
    GameOver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    duration: u32,
    score: u64,
    time_left: u32,
    phase: SessionPhase,
}

/// What the HUD needs each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub time_left: u32,
    pub target: u32,
    pub phase: SessionPhase,
}

impl Session {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            score: 0,
            time_left: duration,
            phase: SessionPhase::Ready,
        }
    }

    /// Zero the score, refill the clock and start running
    pub fn restart(&mut self) {
        self.score = 0;
        self.time_left = self.duration;
        self.phase = SessionPhase::Running;
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn add_score(&mut self, points: u64) {
        if self.is_running() {
            self.score = self.score.saturating_add(points);
        }
    }

    pub fn add_time(&mut self, seconds: u32) {
        if self.is_running() {
            self.time_left = self.time_left.saturating_add(seconds);
        }
    }

    /// One-second timer callback.
    ///
    /// Returns true only on the call that ends the session.
    pub fn tick_second(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        if self.time_left <= 1 {
            self.time_left = 0;
            self.phase = SessionPhase::GameOver;
            log::info!("Time is up, final score {}", self.score);
            return true;
        }
        self.time_left -= 1;
        false
    }

    pub fn hud(&self, target: u32) -> Hud {
        Hud {
            score: self.score,
            time_left: self.time_left,
            target,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_until_restart() {
        let mut session = Session::new(3);
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert!(!session.tick_second());
        assert_eq!(session.time_left(), 3);

        session.restart();
        assert!(session.is_running());
    }

    #[test]
    fn test_game_over_exactly_once() {
        let mut session = Session::new(3);
        session.restart();

        let transitions: Vec<bool> = (0..6).map(|_| session.tick_second()).collect();
        assert_eq!(transitions, vec![false, false, true, false, false, false]);
        assert_eq!(session.time_left(), 0);
        assert!(session.is_over());
    }

    #[test]
    fn test_score_and_time_frozen_after_game_over() {
        let mut session = Session::new(1);
        session.restart();
        session.add_score(10);
        assert!(session.tick_second());

        session.add_score(99);
        session.add_time(5);
        assert_eq!(session.score(), 10);
        assert_eq!(session.time_left(), 0);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = Session::new(2);
        session.restart();
        session.add_score(7);
        session.tick_second();
        session.tick_second();
        assert!(session.is_over());

        session.restart();
        assert!(session.is_running());
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_left(), 2);
    }
}
