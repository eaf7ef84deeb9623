//! matchpair - play, simulate and inspect pair-matching games from the terminal

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use match_pair::{
    core::{CardId, GameContent},
    game::{
        spawn_line_reader, EngineConfig, EngineView, GameLogger, MatchPairEngine, OutputFormat,
        PlayerController, ScreenState, ScriptedController, Session, SessionCommand,
        VerbosityLevel,
    },
    loader::{ContentLibrary, ContentLoader},
    persistence::{JsonFileStore, MemoryStore, ProgressStore},
    simulate,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// `-v` value: how chatty the engine is while you play
///
/// `minimal` shows completions and save problems, `normal` adds screen
/// changes and matches, `verbose` adds every tap, refill and timer.
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let level = match s.to_lowercase().as_str() {
            "silent" | "0" => VerbosityLevel::Silent,
            "minimal" | "1" => VerbosityLevel::Minimal,
            "normal" | "2" => VerbosityLevel::Normal,
            "verbose" | "3" => VerbosityLevel::Verbose,
            other => {
                return Err(format!(
                    "unknown verbosity '{other}', use silent|minimal|normal|verbose or 0-3"
                ))
            }
        };
        Ok(VerbosityArg(level))
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "matchpair")]
#[command(about = "Pair-matching mini-game engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game interactively on the terminal
    Play {
        /// Content file (.pairs)
        #[arg(value_name = "CONTENT")]
        content: PathBuf,

        /// Random seed for board shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Number of pairs visible at once
        #[arg(long, default_value_t = 3)]
        window: usize,

        /// JSON file to persist solved pairs in (default: no persistence)
        #[arg(long, value_name = "FILE")]
        progress_file: Option<PathBuf>,

        /// Play a fixed list of card ids instead of reading stdin
        /// (space or comma separated, e.g. "thought_1 reality_1")
        #[arg(long, value_name = "CARD_IDS")]
        script: Option<String>,

        /// Engine messages: silent, minimal, normal or verbose (0-3)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Log line format
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,
    },

    /// Play many random games and print statistics
    Simulate {
        /// Content file (.pairs)
        #[arg(value_name = "CONTENT")]
        content: PathBuf,

        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        /// Random seed for deterministic batches
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of pairs visible at once
        #[arg(long, default_value_t = 3)]
        window: usize,
    },

    /// List the games found in a content directory
    List {
        #[arg(value_name = "DIR", default_value = "content")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            content,
            seed,
            window,
            progress_file,
            script,
            verbosity,
            format,
        } => {
            let game = ContentLoader::load_from_file(&content)
                .with_context(|| format!("loading {}", content.display()))?;
            let store: Box<dyn ProgressStore> = match progress_file {
                Some(path) => Box::new(JsonFileStore::new(path)),
                None => Box::new(MemoryStore::new()),
            };
            let mut config = EngineConfig::default().with_window(window);
            config.seed = seed;
            let mut logger = GameLogger::with_verbosity(verbosity.into());
            logger.set_output_format(format.into());

            let engine = MatchPairEngine::with_logger(game, store, config, logger);
            match script {
                Some(script) => run_script(engine, &script)?,
                None => run_interactive(engine).await?,
            }
        }
        Commands::Simulate {
            content,
            games,
            seed,
            window,
        } => {
            let game = ContentLoader::load_from_file(&content)
                .with_context(|| format!("loading {}", content.display()))?;
            println!("=== Simulating '{}' ===\n", game.title);
            let stats = simulate::run_batch(&game, games, seed, window)?;
            println!("{stats}");
        }
        Commands::List { dir } => {
            let library = ContentLibrary::load_dir(&dir)
                .with_context(|| format!("loading library {}", dir.display()))?;
            if library.is_empty() {
                println!("No games found in {}", dir.display());
            }
            for game in library.games() {
                print_listing(game);
            }
        }
    }

    Ok(())
}

fn print_listing(game: &GameContent) {
    println!(
        "{:<24} {:>3} pairs  {} / {}  {}",
        game.game_id,
        game.len(),
        game.left_label,
        game.right_label,
        game.title
    );
}

/// Feed a fixed list of card ids, skipping feedback delays
fn run_script(mut engine: MatchPairEngine, script: &str) -> anyhow::Result<()> {
    let mut controller = ScriptedController::from_str_list(script);
    while !engine.screen().is_playing() {
        engine.advance();
    }
    while engine.screen().is_playing() {
        let Some(card_id) = controller.choose_card(&engine.view()) else {
            break;
        };
        let outcome = engine.select_card(&card_id);
        println!("{card_id}: {outcome:?}");
        engine.flush_timers();
    }
    println!(
        "Solved {}/{} pairs, screen: {}",
        engine.solved_count(),
        engine.total_pairs(),
        engine.screen()
    );
    Ok(())
}

async fn run_interactive(engine: MatchPairEngine) -> anyhow::Result<()> {
    // Card ids in the order they were last numbered on screen
    let numbering: Arc<Mutex<Vec<CardId>>> = Arc::new(Mutex::new(Vec::new()));
    let render_numbering = Arc::clone(&numbering);

    let (session, handle) = Session::new(engine);
    let session = session.on_change(move |view| {
        let ids = render(view);
        if let Ok(mut slot) = render_numbering.lock() {
            *slot = ids;
        }
    });
    let mut runner = tokio::spawn(session.run());

    let mut lines = spawn_line_reader(std::io::stdin());
    let mut stdin_open = true;
    let (report, _engine) = loop {
        tokio::select! {
            finished = &mut runner => break finished.context("session task failed")?,
            line = lines.recv(), if stdin_open => match line {
                Some(line) => match parse_command(line.trim(), &numbering) {
                    Ok(command) => {
                        handle.send(command).await;
                    }
                    Err(msg) => println!("{msg}"),
                },
                None => {
                    stdin_open = false;
                    handle.close().await;
                }
            },
        }
    };

    println!(
        "\nSession ended ({:?}): {}/{} pairs solved, {} mismatches",
        report.end,
        report.solved.len(),
        report.total_pairs,
        report.mismatches
    );
    Ok(())
}

fn parse_command(input: &str, numbering: &Mutex<Vec<CardId>>) -> anyhow::Result<SessionCommand> {
    let command = match input.to_lowercase().as_str() {
        "" | "n" | "next" => SessionCommand::Advance,
        "b" | "back" => SessionCommand::Back,
        "q" | "quit" => SessionCommand::Close,
        other => {
            if let Ok(n) = other.parse::<usize>() {
                let ids = match numbering.lock() {
                    Ok(ids) => ids,
                    Err(_) => bail!("board unavailable"),
                };
                match n.checked_sub(1).and_then(|i| ids.get(i)) {
                    Some(id) => SessionCommand::Select(id.clone()),
                    None => bail!("no card numbered {n}"),
                }
            } else {
                SessionCommand::Select(CardId::from(input))
            }
        }
    };
    Ok(command)
}

/// Draw the current screen; returns card ids in numbered order
fn render(view: &EngineView) -> Vec<CardId> {
    println!();
    match view.screen() {
        ScreenState::Welcome => {
            println!("== {} ==", view.title());
            println!("[n] start   [b] leave");
            Vec::new()
        }
        ScreenState::Intro => {
            println!("== {} ==", view.title());
            if let Some(intro) = view.intro() {
                println!("{intro}");
            }
            println!(
                "Match each {} with its {}.",
                view.left_label().to_lowercase(),
                view.right_label().to_lowercase()
            );
            println!("[n] play   [b] back");
            Vec::new()
        }
        ScreenState::Playing => {
            let mut ids = Vec::new();
            let marker = |id: &CardId| {
                if !view.is_selected(id) {
                    " "
                } else if view.show_mismatch() {
                    "x"
                } else {
                    "*"
                }
            };
            println!("-- {} --", view.left_label());
            for card in view.left_cards() {
                ids.push(card.id.clone());
                println!("{}{:>3}. {}", marker(&card.id), ids.len(), card.text);
            }
            println!("-- {} --", view.right_label());
            for card in view.right_cards() {
                ids.push(card.id.clone());
                println!("{}{:>3}. {}", marker(&card.id), ids.len(), card.text);
            }
            println!(
                "Solved {}/{}   [number] select   [b] restart",
                view.solved_count(),
                view.total_pairs()
            );
            ids
        }
        ScreenState::Reflection => {
            println!("All {} pairs matched.", view.total_pairs());
            if let Some(reflection) = view.reflection() {
                println!("{reflection}");
            }
            println!("[n] continue   [b] back to the board");
            Vec::new()
        }
        ScreenState::Final => {
            println!("== {} complete ==", view.title());
            println!("[n] finish");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_arg_accepts_names_and_numbers() {
        let parse = |s: &str| s.parse::<VerbosityArg>().map(VerbosityLevel::from);
        assert_eq!(parse("silent"), Ok(VerbosityLevel::Silent));
        assert_eq!(parse("1"), Ok(VerbosityLevel::Minimal));
        assert_eq!(parse("Verbose"), Ok(VerbosityLevel::Verbose));
        assert!(parse("loud").unwrap_err().contains("loud"));
    }

    #[test]
    fn test_numbered_pick_maps_to_card() {
        let numbering = Mutex::new(vec![CardId::from("thought_2"), CardId::from("reality_1")]);
        assert_eq!(
            parse_command("2", &numbering).unwrap(),
            SessionCommand::Select(CardId::from("reality_1"))
        );
        assert_eq!(parse_command("", &numbering).unwrap(), SessionCommand::Advance);
        assert_eq!(parse_command("q", &numbering).unwrap(), SessionCommand::Close);
        assert!(parse_command("3", &numbering).is_err());
    }
}
