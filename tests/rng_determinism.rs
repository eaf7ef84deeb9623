//! Board layouts are a pure function of the seed
//!
//! The engine draws from one ChaCha12 stream: the initial deal shuffles the
//! left column then the right, and each refill inserts left then right.

use match_pair::{
    board::Board,
    core::{CardId, GameContent, Pair, PairId},
    game::{EngineConfig, GameLogger, MatchPairEngine, VerbosityLevel, MATCH_DELAY},
    persistence::MemoryStore,
};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use similar_asserts::assert_eq;

fn pairs(n: u32) -> Vec<Pair> {
    (1..=n)
        .map(|i| Pair::new(i, format!("thought {i}"), "thought", format!("reality {i}"), "reality"))
        .collect()
}

fn engine(n: u32, seed: u64) -> MatchPairEngine {
    let mut engine = MatchPairEngine::with_logger(
        GameContent::new("thought_reality", pairs(n)).unwrap(),
        Box::new(MemoryStore::new()),
        EngineConfig::default().with_seed(seed),
        GameLogger::with_verbosity(VerbosityLevel::Silent),
    );
    engine.advance();
    engine.advance();
    engine
}

fn solve(engine: &mut MatchPairEngine, id: u32) {
    engine.select_card(&CardId::new("thought", PairId::new(id)));
    engine.select_card(&CardId::new("reality", PairId::new(id)));
    engine.advance_time(MATCH_DELAY);
}

#[test]
fn test_same_seed_same_board() {
    for seed in [0, 1, 42, u64::MAX] {
        let mut a = engine(6, seed);
        let mut b = engine(6, seed);
        assert_eq!(a.board(), b.board());
        solve(&mut a, 2);
        solve(&mut b, 2);
        assert_eq!(a.board(), b.board());
    }
}

#[test]
fn test_deal_and_refill_follow_the_stream() {
    let all = pairs(5);
    let mut rng = ChaCha12Rng::seed_from_u64(2024);
    let mut expected = Board::deal(&all[..3], &mut rng);

    let mut engine = engine(5, 2024);
    assert_eq!(engine.board(), &expected);

    solve(&mut engine, 1);
    expected.remove_pair(PairId::new(1));
    expected.insert_pair(&all[3], &mut rng);
    assert_eq!(engine.board(), &expected);

    solve(&mut engine, 4);
    expected.remove_pair(PairId::new(4));
    expected.insert_pair(&all[4], &mut rng);
    assert_eq!(engine.board(), &expected);
}

#[test]
fn test_unseeded_engines_share_default_layout() {
    let make = || {
        let mut engine = MatchPairEngine::with_logger(
            GameContent::new("thought_reality", pairs(4)).unwrap(),
            Box::new(MemoryStore::new()),
            EngineConfig::default(),
            GameLogger::with_verbosity(VerbosityLevel::Silent),
        );
        engine.advance();
        engine.advance();
        engine.board().clone()
    };
    assert_eq!(make(), make());
}
