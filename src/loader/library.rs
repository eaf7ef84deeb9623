//! Content library: every .pairs game found under a directory

use crate::core::GameContent;
use crate::loader::ContentLoader;
use crate::{MatchError, Result};
use jwalk::WalkDir;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Games indexed by game id
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    games: BTreeMap<String, (PathBuf, GameContent)>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        ContentLibrary::default()
    }

    /// Load every `*.pairs` file below `dir`
    ///
    /// Any unparseable file fails the whole load, as does a game id used by
    /// two files.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(MatchError::InvalidAction(format!(
                "content directory not found: {}",
                dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .sort(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "pairs"))
            .collect();
        paths.sort();

        let mut library = ContentLibrary::new();
        for path in paths {
            let game = ContentLoader::load_from_file(&path)?;
            library.insert(path, game)?;
        }
        Ok(library)
    }

    /// Add a game; fails if its id is already taken
    pub fn insert(&mut self, path: PathBuf, game: GameContent) -> Result<()> {
        if let Some((existing, _)) = self.games.get(&game.game_id) {
            return Err(MatchError::InvalidContentFormat(format!(
                "game id '{}' defined by both {} and {}",
                game.game_id,
                existing.display(),
                path.display()
            )));
        }
        self.games.insert(game.game_id.clone(), (path, game));
        Ok(())
    }

    pub fn get(&self, game_id: &str) -> Option<&GameContent> {
        self.games.get(game_id).map(|(_, game)| game)
    }

    pub fn path_of(&self, game_id: &str) -> Option<&Path> {
        self.games.get(game_id).map(|(path, _)| path.as_path())
    }

    /// Games in id order
    pub fn games(&self) -> impl Iterator<Item = &GameContent> {
        self.games.values().map(|(_, game)| game)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.games.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
