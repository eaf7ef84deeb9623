//! Performance benchmarks for the match-pair engine
//!
//! Measures complete games played by a seeded random controller with all
//! feedback delays set to zero:
//!
//! 1. **single** - one game per iteration, fresh engine each time
//! 2. **batch** - a parallel batch of games through `simulate::run_batch`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use match_pair::{
    core::{GameContent, Pair},
    game::{EngineConfig, GameLogger, MatchPairEngine, RandomController, VerbosityLevel},
    loader::ContentLoader,
    persistence::MemoryStore,
    simulate::{play_to_completion, run_batch},
};
use std::path::PathBuf;
use std::time::Duration;

/// Shipped content if present, otherwise a generated game
fn load_content() -> GameContent {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content/thought_reality.pairs");
    ContentLoader::load_from_file(&path).unwrap_or_else(|_| synthetic(7))
}

fn synthetic(n: u32) -> GameContent {
    let pairs = (1..=n)
        .map(|i| Pair::new(i, format!("l{i}"), "left", format!("r{i}"), "right"))
        .collect();
    GameContent::new("synthetic", pairs).unwrap()
}

fn bench_single_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_game");
    group.measurement_time(Duration::from_secs(10));

    for (name, content) in [("shipped", load_content()), ("forty_pairs", synthetic(40))] {
        for window in [1usize, 3, 6] {
            group.bench_with_input(
                BenchmarkId::new(name, window),
                &window,
                |b, &window| {
                    let mut seed = 0u64;
                    b.iter(|| {
                        seed += 1;
                        let mut engine = MatchPairEngine::with_logger(
                            content.clone(),
                            Box::new(MemoryStore::new()),
                            EngineConfig::default()
                                .with_window(window)
                                .with_seed(seed)
                                .instant(),
                            GameLogger::with_verbosity(VerbosityLevel::Silent),
                        );
                        let mut controller = RandomController::with_seed(seed);
                        black_box(play_to_completion(&mut engine, &mut controller).unwrap())
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let content = load_content();
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    group.bench_function(BenchmarkId::new("run_batch", 1000), |b| {
        b.iter(|| black_box(run_batch(&content, 1000, 42, 3).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_single_game, bench_batch);
criterion_main!(benches);
