//! Read-only view of an engine for presentation layers and controllers
//!
//! A renderer (or an automated player) only inspects this view; all state
//! changes go through the engine's commands.

use crate::core::{Card, CardId, PairId};
use crate::game::{MatchPairEngine, ScreenState};

/// Borrowed snapshot of what the screen should show
pub struct EngineView<'a> {
    engine: &'a MatchPairEngine,
}

impl<'a> EngineView<'a> {
    pub fn new(engine: &'a MatchPairEngine) -> Self {
        EngineView { engine }
    }

    pub fn screen(&self) -> ScreenState {
        self.engine.screen()
    }

    pub fn title(&self) -> &str {
        &self.engine.content().title
    }

    pub fn left_label(&self) -> &str {
        &self.engine.content().left_label
    }

    pub fn right_label(&self) -> &str {
        &self.engine.content().right_label
    }

    pub fn intro(&self) -> Option<&str> {
        self.engine.content().intro.as_deref()
    }

    pub fn reflection(&self) -> Option<&str> {
        self.engine.content().reflection.as_deref()
    }

    /// Left column cards, top to bottom
    pub fn left_cards(&self) -> &[Card] {
        self.engine.board().left()
    }

    /// Right column cards, top to bottom
    pub fn right_cards(&self) -> &[Card] {
        self.engine.board().right()
    }

    /// All visible cards, left column first
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.engine.board().cards()
    }

    pub fn selection(&self) -> &[CardId] {
        self.engine.selection()
    }

    pub fn is_selected(&self, card_id: &CardId) -> bool {
        self.engine.selection().contains(card_id)
    }

    /// Should selected cards be drawn in the error style?
    pub fn show_mismatch(&self) -> bool {
        self.engine.show_mismatch()
    }

    /// Is input currently ignored?
    pub fn is_locked(&self) -> bool {
        self.engine.is_locked()
    }

    /// Cards that may be selected right now
    pub fn selectable_cards(&self) -> Vec<&CardId> {
        if self.screen() != ScreenState::Playing || self.is_locked() {
            return Vec::new();
        }
        self.cards()
            .filter(|c| !self.is_selected(&c.id))
            .map(|c| &c.id)
            .collect()
    }

    /// Pair id behind a visible card
    pub fn pair_of(&self, card_id: &CardId) -> Option<PairId> {
        self.engine.board().get(card_id).map(|c| c.pair_id)
    }

    pub fn solved_count(&self) -> usize {
        self.engine.solved_count()
    }

    pub fn total_pairs(&self) -> usize {
        self.engine.total_pairs()
    }

    /// Fraction of pairs solved, 1.0 for an empty game
    pub fn progress(&self) -> f64 {
        let total = self.total_pairs();
        if total == 0 {
            1.0
        } else {
            self.solved_count() as f64 / total as f64
        }
    }
}
