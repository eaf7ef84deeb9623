//! Batch simulation: play many games with random controllers in parallel
//!
//! Useful for sanity-checking content (every game must be finishable) and
//! for rough difficulty numbers such as mismatches per game at a given
//! window size.

use crate::core::GameContent;
use crate::game::{
    EngineConfig, FlowOutcome, GameLogger, MatchPairEngine, PlayerController, RandomController,
    ScreenState, VerbosityLevel,
};
use crate::history::EngineEvent;
use crate::persistence::MemoryStore;
use crate::{MatchError, Result};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fmt;
use std::time::{Duration, Instant};

/// Upper bound on controller turns before a game is declared stuck
const MAX_TURNS: usize = 100_000;

/// Counters for one finished game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameRun {
    pub selections: usize,
    pub matches: usize,
    pub mismatches: usize,
}

/// Play an engine from wherever it is to the `Finished` outcome
///
/// Timers are flushed after every selection, so the game runs without
/// waiting on feedback delays.
pub fn play_to_completion(
    engine: &mut MatchPairEngine,
    controller: &mut dyn PlayerController,
) -> Result<GameRun> {
    while !engine.screen().is_playing() {
        match engine.advance() {
            FlowOutcome::Finished => return Ok(count_run(engine)),
            FlowOutcome::Stayed | FlowOutcome::Exit => {
                return Err(MatchError::InvalidAction(format!(
                    "cannot advance from {}",
                    engine.screen()
                )))
            }
            FlowOutcome::Moved { .. } => {}
        }
    }

    let mut turns = 0;
    while engine.screen() == ScreenState::Playing {
        if turns >= MAX_TURNS {
            return Err(MatchError::InvalidAction(format!(
                "{} controller did not finish '{}' within {MAX_TURNS} turns",
                controller.name(),
                engine.content().game_id
            )));
        }
        let choice = controller.choose_card(&engine.view());
        match choice {
            Some(card_id) => {
                engine.select_card(&card_id);
            }
            None if !engine.has_pending_timers() => {
                return Err(MatchError::InvalidAction(format!(
                    "{} controller ran out of moves",
                    controller.name()
                )));
            }
            None => {}
        }
        engine.flush_timers();
        turns += 1;
    }

    loop {
        match engine.advance() {
            FlowOutcome::Finished => return Ok(count_run(engine)),
            FlowOutcome::Moved { .. } => {}
            FlowOutcome::Stayed | FlowOutcome::Exit => {
                return Err(MatchError::InvalidAction(format!(
                    "stuck on {} after play",
                    engine.screen()
                )))
            }
        }
    }
}

fn count_run(engine: &MatchPairEngine) -> GameRun {
    let events = &engine.events;
    GameRun {
        selections: events.count(|e| matches!(e, EngineEvent::CardSelected { .. })),
        matches: events.count(|e| matches!(e, EngineEvent::PairMatched { .. })),
        mismatches: events.count(|e| matches!(e, EngineEvent::Mismatched { .. })),
    }
}

/// Aggregated results of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub games: usize,
    pub pairs_per_game: usize,
    pub window_size: usize,
    pub total_selections: usize,
    pub total_matches: usize,
    pub total_mismatches: usize,
    pub min_mismatches: usize,
    pub max_mismatches: usize,
    pub duration: Duration,
}

impl BatchStats {
    fn from_runs(
        runs: &[GameRun],
        pairs_per_game: usize,
        window_size: usize,
        duration: Duration,
    ) -> Self {
        BatchStats {
            games: runs.len(),
            pairs_per_game,
            window_size,
            total_selections: runs.iter().map(|r| r.selections).sum(),
            total_matches: runs.iter().map(|r| r.matches).sum(),
            total_mismatches: runs.iter().map(|r| r.mismatches).sum(),
            min_mismatches: runs.iter().map(|r| r.mismatches).min().unwrap_or(0),
            max_mismatches: runs.iter().map(|r| r.mismatches).max().unwrap_or(0),
            duration,
        }
    }

    pub fn avg_selections(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_selections as f64 / self.games as f64
        }
    }

    pub fn avg_mismatches(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_mismatches as f64 / self.games as f64
        }
    }

    pub fn games_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.games as f64 / secs
        }
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Games:            {}", self.games)?;
        writeln!(f, "Pairs per game:   {}", self.pairs_per_game)?;
        writeln!(f, "Window size:      {}", self.window_size)?;
        writeln!(f, "Avg selections:   {:.2}", self.avg_selections())?;
        writeln!(
            f,
            "Avg mismatches:   {:.2} (min {}, max {})",
            self.avg_mismatches(),
            self.min_mismatches,
            self.max_mismatches
        )?;
        write!(
            f,
            "Elapsed:          {:.2}ms ({:.0} games/sec)",
            self.duration.as_secs_f64() * 1000.0,
            self.games_per_sec()
        )
    }
}

/// Play `games` random games of `content` in parallel
///
/// Each game gets its own board seed and controller seed, both derived from
/// `seed` and the game index, so a batch is reproducible.
pub fn run_batch(
    content: &GameContent,
    games: usize,
    seed: u64,
    window_size: usize,
) -> Result<BatchStats> {
    let start = Instant::now();

    let runs: Vec<GameRun> = (0..games)
        .into_par_iter()
        .map(|game_idx| {
            let mut seed_rng =
                rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(game_idx as u64));
            let board_seed: u64 = seed_rng.gen();
            let controller_seed: u64 = seed_rng.gen();

            let config = EngineConfig::default()
                .with_window(window_size)
                .with_seed(board_seed)
                .instant();
            let mut engine = MatchPairEngine::with_logger(
                content.clone(),
                Box::new(MemoryStore::new()),
                config,
                GameLogger::with_verbosity(VerbosityLevel::Silent),
            );
            let mut controller = RandomController::with_seed(controller_seed);
            play_to_completion(&mut engine, &mut controller)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BatchStats::from_runs(
        &runs,
        content.len(),
        window_size.max(1),
        start.elapsed(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pair;

    fn content(n: u32) -> GameContent {
        let pairs = (1..=n)
            .map(|i| Pair::new(i, format!("l{i}"), "l", format!("r{i}"), "r"))
            .collect();
        GameContent::new("sim", pairs).unwrap()
    }

    #[test]
    fn test_batch_counts_every_match() {
        let stats = run_batch(&content(6), 20, 7, 3).unwrap();
        assert_eq!(stats.games, 20);
        assert_eq!(stats.total_matches, 120);
        assert!(stats.total_selections >= 2 * 120);
        assert!(stats.min_mismatches <= stats.max_mismatches);
    }

    #[test]
    fn test_batch_is_reproducible() {
        let a = run_batch(&content(5), 10, 99, 3).unwrap();
        let b = run_batch(&content(5), 10, 99, 3).unwrap();
        assert_eq!(a.total_selections, b.total_selections);
        assert_eq!(a.total_mismatches, b.total_mismatches);
    }

    #[test]
    fn test_window_of_one_never_mismatches_on_last_pair() {
        let stats = run_batch(&content(1), 5, 3, 1).unwrap();
        assert_eq!(stats.total_mismatches, 0);
        assert_eq!(stats.avg_selections(), 2.0);
    }

    #[test]
    fn test_empty_content_finishes() {
        let stats = run_batch(&content(0), 3, 1, 3).unwrap();
        assert_eq!(stats.total_selections, 0);
    }
}
