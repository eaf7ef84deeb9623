//! Core content types

pub mod card;
pub mod content;
pub mod pair;

pub use card::{Card, CardId, Side};
pub use content::GameContent;
pub use pair::{Pair, PairId};
