//! Scripted controller that replays a fixed list of card ids
//!
//! Used by tests and by `matchpair play --script` to drive a game through an
//! exact sequence of taps.

use crate::core::CardId;
use crate::game::controller::PlayerController;
use crate::game::EngineView;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedController {
    script: Vec<CardId>,
    current_index: usize,
}

impl ScriptedController {
    pub fn new(script: Vec<CardId>) -> Self {
        ScriptedController {
            script,
            current_index: 0,
        }
    }

    /// Parse a space or comma separated list of card ids
    pub fn from_str_list(s: &str) -> Self {
        let script = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(CardId::from)
            .collect();
        Self::new(script)
    }

    pub fn remaining(&self) -> usize {
        self.script.len() - self.current_index
    }
}

impl PlayerController for ScriptedController {
    fn name(&self) -> &str {
        "scripted"
    }

    /// Returns the next scripted id whether or not it is currently valid;
    /// the engine decides whether to ignore it.
    fn choose_card(&mut self, _view: &EngineView) -> Option<CardId> {
        let card = self.script.get(self.current_index).cloned()?;
        self.current_index += 1;
        Some(card)
    }
}
