//! Puzzle-piece rewards
//!
//! Persisted to LocalStorage. Every time a session's score crosses a multiple
//! of [`PIECE_AWARD_INTERVAL`] the next piece of the 4x3 puzzle unlocks.

use serde::{Deserialize, Serialize};

use crate::consts::PIECE_AWARD_INTERVAL;

pub const PUZZLE_ROWS: usize = 4;
pub const PUZZLE_COLS: usize = 3;
/// Total number of pieces in the puzzle
pub const TOTAL_PIECES: usize = PUZZLE_ROWS * PUZZLE_COLS;

/// Id of the `index`-th piece, row-major: `puzzle1_<row>_<col>`
pub fn piece_id(index: usize) -> String {
    format!("puzzle1_{}_{}", index / PUZZLE_COLS, index % PUZZLE_COLS)
}

/// Unlocked pieces, in unlock order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PieceCollection {
    pub unlocked: Vec<String>,
}

impl PieceCollection {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "math_playground_pieces";

    pub fn new() -> Self {
        Self {
            unlocked: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_complete(&self) -> bool {
        self.unlocked.len() >= TOTAL_PIECES
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|p| p == id)
    }

    /// Unlock the next piece if the score moved across a multiple of the
    /// award interval. At most one piece per call.
    ///
    /// Returns the id of the newly unlocked piece.
    pub fn record_score_change(&mut self, old: u64, new: u64) -> Option<String> {
        if new / PIECE_AWARD_INTERVAL <= old / PIECE_AWARD_INTERVAL || self.is_complete() {
            return None;
        }
        let id = (0..TOTAL_PIECES)
            .map(piece_id)
            .find(|id| !self.is_unlocked(id))?;
        self.unlocked.push(id.clone());
        log::info!("Unlocked puzzle piece {} ({}/{})", id, self.count(), TOTAL_PIECES);
        Some(id)
    }

    /// Load the collection from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(pieces) = serde_json::from_str::<PieceCollection>(&json) {
                    log::info!("Loaded {} puzzle pieces", pieces.count());
                    return pieces;
                }
            }
        }

        log::info!("No puzzle pieces found, starting fresh");
        Self::new()
    }

    /// Save the collection to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Puzzle pieces saved ({} unlocked)", self.count());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_ids() {
        assert_eq!(piece_id(0), "puzzle1_0_0");
        assert_eq!(piece_id(4), "puzzle1_1_1");
        assert_eq!(piece_id(11), "puzzle1_3_2");
    }

    #[test]
    fn test_unlock_on_crossing() {
        let mut pieces = PieceCollection::new();
        assert_eq!(pieces.record_score_change(0, 40), None);
        assert_eq!(pieces.record_score_change(40, 60).as_deref(), Some("puzzle1_0_0"));
        assert_eq!(pieces.record_score_change(60, 95), None);
        // big jump still unlocks a single piece
        assert_eq!(pieces.record_score_change(95, 260).as_deref(), Some("puzzle1_0_1"));
        assert_eq!(pieces.count(), 2);
    }

    #[test]
    fn test_stops_when_complete() {
        let mut pieces = PieceCollection::new();
        for i in 0..TOTAL_PIECES as u64 {
            assert!(pieces.record_score_change(i * 50, (i + 1) * 50).is_some());
        }
        assert!(pieces.is_complete());
        assert_eq!(pieces.record_score_change(1000, 2000), None);
    }

    #[test]
    fn test_serde_shape() {
        let mut pieces = PieceCollection::new();
        pieces.record_score_change(0, 50);
        let json = serde_json::to_string(&pieces).unwrap();
        assert_eq!(json, r#"{"unlocked":["puzzle1_0_0"]}"#);
    }
}
