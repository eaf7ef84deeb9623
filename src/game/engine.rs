//! The match-pair engine
//!
//! One engine instance owns one game session: the screen flow, the rolling
//! board, the selection, solved progress and every pending feedback timer.
//! The presentation layer reads state through [`EngineView`] and sends the
//! three commands `select_card`, `advance` and `go_back`; time is fed in
//! with `advance_time`.

use crate::board::Board;
use crate::core::{CardId, GameContent, Pair, PairId};
use crate::game::scheduler::{DeferredAction, Scheduler};
use crate::game::view::EngineView;
use crate::game::{GameLogger, ScreenState, VerbosityLevel};
use crate::history::{EngineEvent, EventLog};
use crate::persistence::ProgressStore;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;

/// Default number of pairs visible at once
pub const DEFAULT_WINDOW_SIZE: usize = 3;
/// Delay between a match and the board refill
pub const MATCH_DELAY: Duration = Duration::from_millis(600);
/// How long mismatch feedback is shown
pub const MISMATCH_DELAY: Duration = Duration::from_millis(800);
/// Delay between the last refill and the reflection screen
pub const COMPLETION_DELAY: Duration = Duration::from_millis(500);

/// Tunables for one engine instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum pairs on the board (0 is treated as 1)
    pub window_size: usize,
    pub match_delay: Duration,
    pub mismatch_delay: Duration,
    pub completion_delay: Duration,
    /// RNG seed for shuffles and insertions (0 when unset)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            match_delay: MATCH_DELAY,
            mismatch_delay: MISMATCH_DELAY,
            completion_delay: COMPLETION_DELAY,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_window(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Zero feedback delays, for simulation
    pub fn instant(mut self) -> Self {
        self.match_delay = Duration::ZERO;
        self.mismatch_delay = Duration::ZERO;
        self.completion_delay = Duration::ZERO;
        self
    }

    pub fn effective_window(&self) -> usize {
        self.window_size.max(1)
    }
}

/// Why a selection was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Not on the game screen, or the engine was torn down
    NotPlaying,
    /// A match or mismatch is still being shown
    Locked,
    AlreadySelected,
    NotOnBoard,
    AlreadySolved,
}

/// Result of `select_card`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOutcome {
    /// First card of a selection accepted
    Selected,
    /// Second card completed a pair; refill follows after the match delay
    Matched(PairId),
    /// Second card belonged to another pair; feedback clears after the mismatch delay
    Mismatched,
    Ignored(IgnoreReason),
}

/// Result of `advance` and `go_back`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowOutcome {
    Moved { from: ScreenState, to: ScreenState },
    /// Back from the welcome screen: the caller should leave the game
    Exit,
    /// Continue from the final screen: the caller's completion hook
    Finished,
    /// Nothing to do from here
    Stayed,
}

/// Finite-state controller for one pairwise matching game
pub struct MatchPairEngine {
    content: GameContent,
    config: EngineConfig,
    store: Box<dyn ProgressStore>,
    screen: ScreenState,
    board: Board,
    selection: SmallVec<[CardId; 2]>,
    solved: FxHashSet<PairId>,
    next_pair_index: usize,
    show_mismatch: bool,
    /// A match is waiting for its refill
    resolving: bool,
    scheduler: Scheduler,
    rng: ChaCha12Rng,
    torn_down: bool,
    /// Record of every state change
    pub events: EventLog,
    pub logger: GameLogger,
}

impl MatchPairEngine {
    /// Create an engine on the welcome screen, restoring saved progress
    pub fn new(content: GameContent, store: Box<dyn ProgressStore>, config: EngineConfig) -> Self {
        Self::with_logger(content, store, config, GameLogger::new())
    }

    /// Like `new`, with a preconfigured logger (so restore problems are captured too)
    pub fn with_logger(
        content: GameContent,
        store: Box<dyn ProgressStore>,
        config: EngineConfig,
        logger: GameLogger,
    ) -> Self {
        let seed = config.seed.unwrap_or(0);
        let mut engine = MatchPairEngine {
            content,
            config,
            store,
            screen: ScreenState::Welcome,
            board: Board::new(),
            selection: SmallVec::new(),
            solved: FxHashSet::default(),
            next_pair_index: 0,
            show_mismatch: false,
            resolving: false,
            scheduler: Scheduler::new(),
            rng: ChaCha12Rng::seed_from_u64(seed),
            torn_down: false,
            events: EventLog::new(),
            logger,
        };
        engine.restore_progress();
        engine
    }

    /// Reseed the shuffle/insert RNG
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Load solved ids from the store, keeping only ids this content knows
    ///
    /// A failed load is logged and treated as no progress.
    fn restore_progress(&mut self) {
        let key = self.content.game_id.clone();
        let ids = match self.store.load(&key) {
            Ok(ids) => ids,
            Err(e) => {
                self.logger.categorized(
                    VerbosityLevel::Minimal,
                    "persistence",
                    &format!("{e}; starting without saved progress"),
                );
                Vec::new()
            }
        };
        self.solved = ids
            .into_iter()
            .map(PairId::new)
            .filter(|id| self.content.contains(*id))
            .collect();
        if !self.solved.is_empty() {
            self.logger.verbose(&format!(
                "restored {}/{} solved pairs for '{}'",
                self.solved.len(),
                self.content.len(),
                key
            ));
        }
    }

    /// Write the solved set; failures are logged and play continues
    fn persist(&mut self) {
        let ids: Vec<u32> = self.solved_ids().iter().map(PairId::as_u32).collect();
        if let Err(e) = self.store.save(&self.content.game_id, &ids) {
            self.logger
                .categorized(VerbosityLevel::Minimal, "persistence", &e.to_string());
        }
    }

    // ---- read access ----

    pub fn content(&self) -> &GameContent {
        &self.content
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> &[CardId] {
        &self.selection
    }

    /// Solved pair ids, ascending
    pub fn solved_ids(&self) -> Vec<PairId> {
        let mut ids: Vec<PairId> = self.solved.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_solved(&self, pair_id: PairId) -> bool {
        self.solved.contains(&pair_id)
    }

    pub fn solved_count(&self) -> usize {
        self.solved.len()
    }

    pub fn total_pairs(&self) -> usize {
        self.content.len()
    }

    /// Index of the next not-yet-drawn pair in content order
    ///
    /// This is one past the last pair actually drawn, so it never exceeds
    /// the pair count: a 2-pair game with a window of 3 leaves it at 2, not
    /// 3. Solved pairs skipped while drawing also move it forward.
    pub fn next_pair_index(&self) -> usize {
        self.next_pair_index
    }

    pub fn show_mismatch(&self) -> bool {
        self.show_mismatch
    }

    /// Is input blocked by match or mismatch feedback?
    pub fn is_locked(&self) -> bool {
        self.show_mismatch || self.resolving
    }

    pub fn is_complete(&self) -> bool {
        self.solved.len() == self.content.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn view(&self) -> EngineView<'_> {
        EngineView::new(self)
    }

    /// Virtual time since the engine was created
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Time until the next pending timer fires
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.time_until_next()
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// Incremented every time pending timers are cancelled
    pub fn timer_generation(&self) -> u64 {
        self.scheduler.generation()
    }

    // ---- commands ----

    /// Deal the board and enter the game screen
    ///
    /// The first `window_size` unsolved pairs in content order form the
    /// working set; their left and right cards are shuffled independently.
    /// If nothing is left to solve the completion transition is scheduled
    /// straight away.
    pub fn start(&mut self) {
        if self.torn_down {
            return;
        }
        self.cancel_timers();
        self.selection.clear();
        self.show_mismatch = false;
        self.resolving = false;
        self.board.clear();
        self.next_pair_index = 0;

        let window = self.config.effective_window();
        let mut working: Vec<Pair> = Vec::with_capacity(window);
        while working.len() < window {
            match self.draw_next() {
                Some(pair) => working.push(pair),
                None => break,
            }
        }
        self.board = Board::deal(&working, &mut self.rng);

        if self.screen != ScreenState::Playing {
            self.transition(ScreenState::Playing);
        }
        self.logger.verbose(&format!(
            "dealt {} pairs ({} solved, next index {})",
            self.board.pair_count(),
            self.solved.len(),
            self.next_pair_index
        ));

        if self.is_complete() {
            self.scheduler
                .schedule(self.config.completion_delay, DeferredAction::CompleteGame);
        }
    }

    /// Next unsolved pair in content order not already on the board
    fn draw_next(&mut self) -> Option<Pair> {
        let pairs = self.content.pairs();
        while self.next_pair_index < pairs.len() {
            let pair = &pairs[self.next_pair_index];
            self.next_pair_index += 1;
            if !self.solved.contains(&pair.id) && !self.board.contains_pair(pair.id) {
                return Some(pair.clone());
            }
        }
        None
    }

    /// Select a card on the board
    ///
    /// The second selection resolves at once into a match or a mismatch.
    /// Invalid or badly timed selections are ignored, never errors.
    pub fn select_card(&mut self, card_id: &CardId) -> SelectOutcome {
        if self.torn_down || self.screen != ScreenState::Playing {
            return SelectOutcome::Ignored(IgnoreReason::NotPlaying);
        }
        if self.is_locked() {
            return SelectOutcome::Ignored(IgnoreReason::Locked);
        }
        if self.selection.contains(card_id) {
            return SelectOutcome::Ignored(IgnoreReason::AlreadySelected);
        }
        let pair_id = match self.board.get(card_id) {
            Some(card) => card.pair_id,
            None => return SelectOutcome::Ignored(IgnoreReason::NotOnBoard),
        };
        if self.solved.contains(&pair_id) {
            return SelectOutcome::Ignored(IgnoreReason::AlreadySolved);
        }

        self.selection.push(card_id.clone());
        self.events.log(EngineEvent::CardSelected {
            card_id: card_id.clone(),
        });
        self.logger.verbose(&format!("selected {card_id}"));

        if self.selection.len() == 2 {
            self.resolve()
        } else {
            SelectOutcome::Selected
        }
    }

    fn resolve(&mut self) -> SelectOutcome {
        let first = self.selection[0].clone();
        let second = self.selection[1].clone();
        let first_pair = self.board.get(&first).map(|c| c.pair_id);
        let second_pair = self.board.get(&second).map(|c| c.pair_id);

        match (first_pair, second_pair) {
            (Some(a), Some(b)) if a == b => {
                self.solved.insert(a);
                self.persist();
                self.resolving = true;
                self.events.log(EngineEvent::PairMatched { pair_id: a });
                self.logger.normal(&format!(
                    "matched pair {a} ({}/{})",
                    self.solved.len(),
                    self.content.len()
                ));
                self.scheduler.schedule(
                    self.config.match_delay,
                    DeferredAction::RefillBoard { pair_id: a },
                );
                SelectOutcome::Matched(a)
            }
            _ => {
                self.show_mismatch = true;
                self.events.log(EngineEvent::Mismatched { first, second });
                self.logger.normal("mismatch");
                self.scheduler
                    .schedule(self.config.mismatch_delay, DeferredAction::ClearMismatch);
                SelectOutcome::Mismatched
            }
        }
    }

    fn fire(&mut self, action: DeferredAction) {
        self.logger.verbose(&format!(
            "timer {:?} at {}ms",
            action,
            self.scheduler.now().as_millis()
        ));
        match action {
            DeferredAction::RefillBoard { pair_id } => {
                self.board.remove_pair(pair_id);
                let drawn = self.draw_next();
                if let Some(pair) = &drawn {
                    self.board.insert_pair(pair, &mut self.rng);
                }
                self.selection.clear();
                self.resolving = false;
                self.events.log(EngineEvent::BoardRefilled {
                    removed: pair_id,
                    drawn: drawn.as_ref().map(|p| p.id),
                });
                if self.is_complete() {
                    self.scheduler
                        .schedule(self.config.completion_delay, DeferredAction::CompleteGame);
                }
            }
            DeferredAction::ClearMismatch => {
                self.show_mismatch = false;
                self.selection.clear();
                self.events.log(EngineEvent::MismatchCleared);
            }
            DeferredAction::CompleteGame => {
                if self.screen == ScreenState::Playing && self.is_complete() {
                    self.events.log(EngineEvent::GameCompleted);
                    self.logger.minimal(&format!(
                        "completed '{}' ({} pairs)",
                        self.content.title,
                        self.content.len()
                    ));
                    self.transition(ScreenState::Reflection);
                }
            }
        }
    }

    /// Move the virtual clock forward, firing every timer that comes due
    ///
    /// Timers scheduled by a firing timer also fire if they fall inside the
    /// same window. Returns the number of actions fired.
    pub fn advance_time(&mut self, elapsed: Duration) -> usize {
        if self.torn_down {
            return 0;
        }
        let target = self.scheduler.now() + elapsed;
        let mut fired = 0;
        while let Some(action) = self.scheduler.pop_due(target) {
            self.fire(action);
            fired += 1;
        }
        self.scheduler.advance_to(target);
        fired
    }

    /// Fire every pending timer, including ones scheduled along the way
    pub fn flush_timers(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }
        let mut fired = 0;
        while let Some(due) = self.scheduler.next_due() {
            if let Some(action) = self.scheduler.pop_due(due) {
                self.fire(action);
                fired += 1;
            }
        }
        fired
    }

    fn cancel_timers(&mut self) {
        let count = self.scheduler.cancel_all();
        if count > 0 {
            self.events.log(EngineEvent::TimersCancelled { count });
            self.logger.verbose(&format!("cancelled {count} pending timers"));
        }
    }

    fn transition(&mut self, to: ScreenState) {
        let from = self.screen;
        if from == ScreenState::Playing && to != ScreenState::Playing {
            self.cancel_timers();
        }
        self.screen = to;
        self.events.log(EngineEvent::ScreenChanged { from, to });
        self.logger.normal(&format!("screen: {from} -> {to}"));
    }

    /// Continue forward
    ///
    /// Welcome -> Intro -> Playing (deals the board). Playing moves on only
    /// once every pair is solved. Reflection -> Final, and continuing from
    /// Final reports `Finished`.
    pub fn advance(&mut self) -> FlowOutcome {
        if self.torn_down {
            return FlowOutcome::Stayed;
        }
        let from = self.screen;
        match from {
            ScreenState::Intro => self.start(),
            ScreenState::Playing => {
                if !self.is_complete() {
                    return FlowOutcome::Stayed;
                }
                self.transition(ScreenState::Reflection);
            }
            ScreenState::Final => return FlowOutcome::Finished,
            ScreenState::Welcome | ScreenState::Reflection => match from.next() {
                Some(to) => self.transition(to),
                None => return FlowOutcome::Stayed,
            },
        }
        FlowOutcome::Moved {
            from,
            to: self.screen,
        }
    }

    /// Go back one screen
    ///
    /// Leaving the game screen discards all progress (persisted) and
    /// returns to the intro. Going back from reflection shows the finished
    /// game again without resetting it. Back from the welcome screen
    /// reports `Exit`.
    pub fn go_back(&mut self) -> FlowOutcome {
        if self.torn_down {
            return FlowOutcome::Stayed;
        }
        let from = self.screen;
        let to = match from.previous() {
            Some(to) => to,
            None => return FlowOutcome::Exit,
        };
        if from == ScreenState::Playing {
            self.reset_progress();
        }
        self.transition(to);
        FlowOutcome::Moved { from, to }
    }

    fn reset_progress(&mut self) {
        self.cancel_timers();
        self.solved.clear();
        self.persist();
        self.selection.clear();
        self.show_mismatch = false;
        self.resolving = false;
        self.board.clear();
        self.next_pair_index = 0;
        self.events.log(EngineEvent::ProgressReset);
    }

    /// Stop the session: pending timers are dropped and later commands are no-ops
    pub fn teardown(&mut self) {
        if !self.torn_down {
            self.cancel_timers();
            self.torn_down = true;
            self.logger.verbose("engine torn down");
        }
    }
}

impl std::fmt::Debug for MatchPairEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchPairEngine")
            .field("game_id", &self.content.game_id)
            .field("screen", &self.screen)
            .field("board", &self.board)
            .field("selection", &self.selection)
            .field("solved", &self.solved_ids())
            .field("next_pair_index", &self.next_pair_index)
            .field("show_mismatch", &self.show_mismatch)
            .field("pending_timers", &self.scheduler.len())
            .finish()
    }
}
