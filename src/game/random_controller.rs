//! Random controller for simulation and baseline play
//!
//! Picks uniformly among the cards that can be selected right now.

use crate::core::CardId;
use crate::game::controller::PlayerController;
use crate::game::EngineView;
use rand::{Rng, RngCore, SeedableRng};

/// A controller that makes random choices
pub struct RandomController {
    rng: Box<dyn RngCore + Send>,
}

impl RandomController {
    /// Create a new random controller seeded from the OS
    pub fn new() -> Self {
        RandomController {
            rng: Box::new(rand::rngs::StdRng::from_entropy()),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(seed: u64) -> Self {
        RandomController {
            rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerController for RandomController {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_card(&mut self, view: &EngineView) -> Option<CardId> {
        let options = view.selectable_cards();
        if options.is_empty() {
            None
        } else {
            let index = self.rng.gen_range(0..options.len());
            Some(options[index].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameContent, Pair};
    use crate::game::{EngineConfig, MatchPairEngine, ScreenState};
    use crate::persistence::MemoryStore;

    #[test]
    fn test_random_controller_finishes_game() {
        let pairs = (1..=5)
            .map(|i| Pair::new(i, format!("a{i}"), "a", format!("b{i}"), "b"))
            .collect();
        let content = GameContent::new("g", pairs).unwrap();
        let mut engine =
            MatchPairEngine::new(content, Box::new(MemoryStore::new()), EngineConfig::default());
        engine.logger.enable_capture();
        engine.advance();
        engine.advance();

        let mut controller = RandomController::with_seed(42);
        let mut steps = 0;
        while engine.screen() == ScreenState::Playing && steps < 10_000 {
            if let Some(card) = controller.choose_card(&engine.view()) {
                engine.select_card(&card);
            }
            engine.flush_timers();
            steps += 1;
        }

        assert_eq!(engine.screen(), ScreenState::Reflection);
        assert_eq!(engine.solved_count(), 5);
    }

    #[test]
    fn test_no_choice_when_locked() {
        let pairs = vec![Pair::new(1, "a", "x", "b", "y"), Pair::new(2, "c", "x", "d", "y")];
        let content = GameContent::new("g", pairs).unwrap();
        let mut engine =
            MatchPairEngine::new(content, Box::new(MemoryStore::new()), EngineConfig::default());
        engine.advance();
        engine.advance();
        engine.select_card(&CardId::from("x_1"));
        engine.select_card(&CardId::from("y_2"));

        let mut controller = RandomController::with_seed(1);
        assert!(controller.choose_card(&engine.view()).is_none());
    }
}
