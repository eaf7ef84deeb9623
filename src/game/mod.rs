//! Game engine, screen flow and drivers

pub mod controller;
pub mod engine;
pub mod logger;
pub mod random_controller;
pub mod scheduler;
pub mod screen;
pub mod scripted_controller;
pub mod session;
pub mod view;

pub use controller::PlayerController;
pub use engine::{
    EngineConfig, FlowOutcome, IgnoreReason, MatchPairEngine, SelectOutcome, COMPLETION_DELAY,
    DEFAULT_WINDOW_SIZE, MATCH_DELAY, MISMATCH_DELAY,
};
pub use logger::{GameLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use random_controller::RandomController;
pub use scheduler::{DeferredAction, Scheduler};
pub use screen::ScreenState;
pub use scripted_controller::ScriptedController;
pub use session::{
    spawn_line_reader, Session, SessionCommand, SessionEnd, SessionHandle, SessionReport,
};
pub use view::EngineView;
