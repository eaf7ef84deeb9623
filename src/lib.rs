//! match-pair - pairwise matching mini-game engine
//!
//! A reusable engine for the "match the two columns" exercises of a
//! career-transition coaching app. One engine type drives every content set:
//! a linear screen flow, a rolling-window board that keeps a few pairs
//! visible at a time, and solved-pair progress persisted under a game id.

pub mod board;
pub mod core;
pub mod error;
pub mod game;
pub mod history;
pub mod loader;
pub mod persistence;
pub mod simulate;

pub use error::{MatchError, Result};
