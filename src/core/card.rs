//! Runtime card projections of pairs

use crate::core::{Pair, PairId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which column a card belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Card identifier, derived as `<tag>_<pairId>`
///
/// Unique within the current board as long as the two side tags differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(tag: &str, pair_id: PairId) -> Self {
        CardId(format!("{tag}_{pair_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        CardId(s.to_string())
    }
}

impl PartialEq<str> for CardId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CardId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One side of a pair while it is on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub text: String,
    pub pair_id: PairId,
    pub side: Side,
}

impl Card {
    /// Build the left-column card of a pair
    pub fn left_of(pair: &Pair) -> Self {
        Card {
            id: CardId::new(&pair.left_tag, pair.id),
            text: pair.left_text.clone(),
            pair_id: pair.id,
            side: Side::Left,
        }
    }

    /// Build the right-column card of a pair
    pub fn right_of(pair: &Pair) -> Self {
        Card {
            id: CardId::new(&pair.right_tag, pair.id),
            text: pair.right_text.clone(),
            pair_id: pair.id,
            side: Side::Right,
        }
    }
}
