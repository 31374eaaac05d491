//! Data-driven difficulty tables
//!
//! Defaults match the shipped game balance. A page can override them with a
//! JSON document; [`Tuning::from_json`] validates before anything uses it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Half-open integer range `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: u32,
    pub max: u32,
}

impl ValueRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Uniform sample; an empty range yields `min`
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        if self.max > self.min {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..self.max).contains(&value)
    }
}

/// Bubble game balance for one difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleTuning {
    /// Population floor: below this a new bubble drops in
    pub min_bubbles: usize,
    /// Seed population and auto-spawn cap
    pub max_bubbles: usize,
    /// Bound on each axis of a fresh drift velocity (px/frame)
    pub max_speed: f32,
    pub target_range: ValueRange,
    #[serde(default = "default_bubble_values")]
    pub value_range: ValueRange,
}

fn default_bubble_values() -> ValueRange {
    ValueRange::new(5, 30)
}

/// Tower game balance for one difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerTuning {
    pub base_range: ValueRange,
    pub target_bonus: ValueRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTuning {
    pub bubble: BubbleTuning,
    pub tower: TowerTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub easy: LevelTuning,
    pub medium: LevelTuning,
    pub hard: LevelTuning,
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid {difficulty:?} tuning: {reason}")]
    Invalid {
        difficulty: Difficulty,
        reason: String,
    },
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            easy: LevelTuning {
                bubble: BubbleTuning {
                    min_bubbles: 5,
                    max_bubbles: 7,
                    max_speed: 0.5,
                    target_range: ValueRange::new(15, 30),
                    value_range: default_bubble_values(),
                },
                tower: TowerTuning {
                    base_range: ValueRange::new(5, 15),
                    target_bonus: ValueRange::new(5, 15),
                },
            },
            medium: LevelTuning {
                bubble: BubbleTuning {
                    min_bubbles: 7,
                    max_bubbles: 10,
                    max_speed: 0.8,
                    target_range: ValueRange::new(30, 60),
                    value_range: default_bubble_values(),
                },
                tower: TowerTuning {
                    base_range: ValueRange::new(10, 25),
                    target_bonus: ValueRange::new(10, 30),
                },
            },
            hard: LevelTuning {
                bubble: BubbleTuning {
                    min_bubbles: 9,
                    max_bubbles: 13,
                    max_speed: 1.1,
                    target_range: ValueRange::new(50, 100),
                    value_range: default_bubble_values(),
                },
                tower: TowerTuning {
                    base_range: ValueRange::new(20, 50),
                    target_bonus: ValueRange::new(25, 50),
                },
            },
        }
    }
}

impl Tuning {
    pub fn level(&self, difficulty: Difficulty) -> &LevelTuning {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        for difficulty in Difficulty::ALL {
            let invalid = |reason: &str| TuningError::Invalid {
                difficulty,
                reason: reason.to_string(),
            };
            let level = self.level(difficulty);
            let bubble = &level.bubble;

            if bubble.max_bubbles == 0 {
                return Err(invalid("max_bubbles must be at least 1"));
            }
            if bubble.min_bubbles > bubble.max_bubbles {
                return Err(invalid("min_bubbles exceeds max_bubbles"));
            }
            if !(bubble.max_speed > 0.0 && bubble.max_speed.is_finite()) {
                return Err(invalid("max_speed must be positive"));
            }
            check_range(&bubble.target_range).map_err(|r| invalid(&format!("target_range {r}")))?;
            check_range(&bubble.value_range).map_err(|r| invalid(&format!("value_range {r}")))?;
            check_range(&level.tower.base_range)
                .map_err(|r| invalid(&format!("base_range {r}")))?;
            check_range(&level.tower.target_bonus)
                .map_err(|r| invalid(&format!("target_bonus {r}")))?;
        }
        Ok(())
    }
}

fn check_range(range: &ValueRange) -> Result<(), &'static str> {
    if range.min == 0 {
        Err("must start at 1 or more")
    } else if range.max <= range.min {
        Err("is empty")
    } else {
        Ok(())
    }
}
