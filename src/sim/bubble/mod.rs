//! Bubble game: drag numbered bubbles together to add, double-click to split

pub mod input;
pub mod state;
pub mod tick;

pub use state::{Bubble, BubbleEvent, BubbleGame, BubbleState, bubble_radius};
pub use tick::split_value;
