//! Game content: the ordered pair table plus screen copy

use crate::core::{Pair, PairId};
use crate::{MatchError, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Everything a content provider hands to one engine instance
///
/// Pair order is significant: the first pairs are dealt first and later
/// pairs are drawn in table order as matches are made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameContent {
    /// Key under which progress is persisted
    pub game_id: String,
    pub title: String,
    /// Column heading for left cards (e.g., "Thought")
    pub left_label: String,
    /// Column heading for right cards (e.g., "Reality")
    pub right_label: String,
    pub intro: Option<String>,
    pub reflection: Option<String>,
    pairs: Vec<Pair>,
}

impl GameContent {
    /// Build content from an ordered pair table
    ///
    /// Pair ids must be unique. All pairs must share one left tag and one
    /// right tag, and the two tags must differ so card ids stay unique. An
    /// empty table is valid and yields a game that completes immediately.
    pub fn new(game_id: impl Into<String>, pairs: Vec<Pair>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for pair in &pairs {
            if !seen.insert(pair.id) {
                return Err(MatchError::DuplicatePairId(pair.id.as_u32()));
            }
        }

        let (left_label, right_label) = match pairs.first() {
            Some(first) => {
                if first.left_tag == first.right_tag {
                    return Err(MatchError::InvalidContentFormat(format!(
                        "left and right tags must differ (both '{}')",
                        first.left_tag
                    )));
                }
                if let Some(odd) = pairs
                    .iter()
                    .find(|p| p.left_tag != first.left_tag || p.right_tag != first.right_tag)
                {
                    return Err(MatchError::InvalidContentFormat(format!(
                        "pair {} uses tags '{}'/'{}', expected '{}'/'{}'",
                        odd.id, odd.left_tag, odd.right_tag, first.left_tag, first.right_tag
                    )));
                }
                (first.left_tag.clone(), first.right_tag.clone())
            }
            None => (String::new(), String::new()),
        };

        let game_id = game_id.into();
        Ok(GameContent {
            title: game_id.clone(),
            game_id,
            left_label,
            right_label,
            intro: None,
            reflection: None,
            pairs,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_labels(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_label = left.into();
        self.right_label = right.into();
        self
    }

    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = Some(reflection.into());
        self
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, id: PairId) -> bool {
        self.pairs.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: PairId) -> Option<&Pair> {
        self.pairs.iter().find(|p| p.id == id)
    }
}
