//! Every shipped content file must parse and be playable to the end
//!
//! One test is generated per `.pairs` file under `content/`.

use dir_test::{dir_test, Fixture};
use match_pair::{
    game::{EngineConfig, GameLogger, MatchPairEngine, RandomController, VerbosityLevel},
    loader::{ContentLibrary, ContentLoader},
    persistence::MemoryStore,
    simulate::{play_to_completion, run_batch},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/content",
    glob: "**/*.pairs",
)]
fn test_content_plays_to_completion(fixture: Fixture<&str>) {
    let game = ContentLoader::parse(fixture.content())
        .unwrap_or_else(|e| panic!("{} failed to parse: {e}", fixture.path()));
    assert!(!game.is_empty(), "{} has no pairs", fixture.path());
    assert!(!game.title.is_empty());

    for seed in 0..5 {
        let mut engine = MatchPairEngine::with_logger(
            game.clone(),
            Box::new(MemoryStore::new()),
            EngineConfig::default().with_seed(seed).instant(),
            GameLogger::with_verbosity(VerbosityLevel::Silent),
        );
        let mut controller = RandomController::with_seed(seed);
        let run = play_to_completion(&mut engine, &mut controller).unwrap();
        assert_eq!(run.matches, game.len());
    }

    let stats = run_batch(&game, 25, 1, 3).unwrap();
    assert_eq!(stats.total_matches, 25 * game.len());
}

#[test]
fn test_library_loads_shipped_content() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content");
    let library = ContentLibrary::load_dir(&dir).unwrap();

    assert!(library.len() >= 3);
    let ids: Vec<&str> = library.ids().collect();
    assert!(ids.contains(&"thought_reality"));
    // title-derived id
    assert!(ids.contains(&"studio_skills_at_work"));
    assert_eq!(
        library.path_of("next_steps").and_then(Path::file_name),
        Some(OsStr::new("next_steps.pairs"))
    );
}

#[test]
fn test_library_rejects_duplicate_ids() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.pairs"), "[metadata]\nId=same\n[Pairs]\n1|a|b\n").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(
        dir.path().join("nested").join("b.pairs"),
        "[metadata]\nId=same\n[Pairs]\n1|c|d\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    assert!(ContentLibrary::load_dir(dir.path()).is_err());
}
