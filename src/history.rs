//! Event log of engine actions
//!
//! Every state change the engine makes is appended here. The log is used by
//! tests and the simulator to reason about a session after the fact, and it
//! serializes so a session can be inspected offline.

use crate::core::{CardId, PairId};
use crate::game::ScreenState;
use serde::{Deserialize, Serialize};

/// Atomic engine events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Flow moved between screens
    ScreenChanged { from: ScreenState, to: ScreenState },

    /// A card was added to the selection
    CardSelected { card_id: CardId },

    /// Two selected cards belonged to the same pair
    PairMatched { pair_id: PairId },

    /// Two selected cards belonged to different pairs
    Mismatched { first: CardId, second: CardId },

    /// Mismatch feedback ended and the selection was released
    MismatchCleared,

    /// A matched pair left the board, optionally replaced by a new draw
    BoardRefilled {
        removed: PairId,
        drawn: Option<PairId>,
    },

    /// Progress was discarded by going back from the game screen
    ProgressReset,

    /// All pairs solved
    GameCompleted,

    /// Pending timers were dropped
    TimersCancelled { count: usize },
}

/// Append-only log of engine events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    /// Events in order (most recent at end)
    events: Vec<EngineEvent>,

    /// Is logging enabled? (disabled for batch simulation)
    enabled: bool,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            events: Vec::new(),
            enabled: true,
        }
    }

    /// Create a disabled log
    pub fn disabled() -> Self {
        EventLog {
            events: Vec::new(),
            enabled: false,
        }
    }

    pub fn log(&mut self, event: EngineEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    /// Most recent event
    pub fn peek(&self) -> Option<&EngineEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Count events matching a predicate
    pub fn count(&self, pred: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
