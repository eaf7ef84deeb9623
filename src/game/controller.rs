//! Automated player interface
//!
//! Controllers stand in for a human tapping cards: the driver asks the
//! controller for a card whenever the board accepts input, then feeds the
//! choice to the engine.

use crate::core::CardId;
use crate::game::EngineView;

/// Something that picks cards to select
pub trait PlayerController {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Choose the next card to select
    ///
    /// Returning None means the controller has nothing more to play.
    fn choose_card(&mut self, view: &EngineView) -> Option<CardId>;
}
