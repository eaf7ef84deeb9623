//! Pair content units

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a pair, unique within one game's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(u32);

impl PairId {
    pub fn new(id: u32) -> Self {
        PairId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PairId {
    fn from(id: u32) -> Self {
        PairId(id)
    }
}

/// One matchable unit of content
///
/// The left and right halves carry a tag ("thought"/"reality",
/// "term"/"definition") naming the column they are shown in. All pairs of a
/// single game share the same two tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub id: PairId,
    pub left_text: String,
    pub left_tag: String,
    pub right_text: String,
    pub right_tag: String,
}

impl Pair {
    pub fn new(
        id: impl Into<PairId>,
        left_text: impl Into<String>,
        left_tag: impl Into<String>,
        right_text: impl Into<String>,
        right_tag: impl Into<String>,
    ) -> Self {
        Pair {
            id: id.into(),
            left_text: left_text.into(),
            left_tag: left_tag.into(),
            right_text: right_text.into(),
            right_tag: right_tag.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_id_display() {
        assert_eq!(PairId::new(7).to_string(), "7");
        assert_eq!(PairId::from(3).as_u32(), 3);
    }

    #[test]
    fn test_pair_id_serializes_as_integer() {
        let json = serde_json::to_string(&vec![PairId::new(1), PairId::new(4)]).unwrap();
        assert_eq!(json, "[1,4]");
    }
}
