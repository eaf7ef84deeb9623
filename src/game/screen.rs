//! Screen flow of a match game

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in the linear flow of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenState {
    #[default]
    Welcome,
    Intro,
    Playing,
    Reflection,
    Final,
}

impl ScreenState {
    /// Screen reached by "continue"
    ///
    /// The engine only takes the Playing -> Reflection step once every pair
    /// is solved.
    pub fn next(&self) -> Option<ScreenState> {
        match self {
            ScreenState::Welcome => Some(ScreenState::Intro),
            ScreenState::Intro => Some(ScreenState::Playing),
            ScreenState::Playing => Some(ScreenState::Reflection),
            ScreenState::Reflection => Some(ScreenState::Final),
            ScreenState::Final => None,
        }
    }

    /// Screen reached by "back"; None means leave the game entirely
    pub fn previous(&self) -> Option<ScreenState> {
        match self {
            ScreenState::Welcome => None,
            ScreenState::Intro => Some(ScreenState::Welcome),
            ScreenState::Playing => Some(ScreenState::Intro),
            ScreenState::Reflection => Some(ScreenState::Playing),
            ScreenState::Final => Some(ScreenState::Reflection),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, ScreenState::Playing)
    }
}

impl fmt::Display for ScreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScreenState::Welcome => "welcome",
            ScreenState::Intro => "intro",
            ScreenState::Playing => "playing",
            ScreenState::Reflection => "reflection",
            ScreenState::Final => "final",
        };
        f.write_str(name)
    }
}
