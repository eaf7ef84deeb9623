//! Solved-pair progress storage
//!
//! The engine only talks to the [`ProgressStore`] trait. Values are stored
//! as a JSON array of pair ids under a game id key.

use crate::{MatchError, Result};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Key-value store for solved pair ids
pub trait ProgressStore: Send {
    /// Load the solved ids stored under `key`
    ///
    /// A key that was never saved is `Ok(vec![])`, not an error.
    fn load(&self, key: &str) -> Result<Vec<u32>>;

    /// Replace the solved ids stored under `key`
    fn save(&mut self, key: &str, solved: &[u32]) -> Result<()>;
}

fn sorted(solved: &[u32]) -> Vec<u32> {
    let mut ids = solved.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// In-memory store holding serialized values, like a device key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Raw serialized value for a key
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Put a raw value, bypassing serialization
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Vec<u32>> {
        match self.values.get(key) {
            Some(raw) => serde_json::from_str(raw).map_err(|e| MatchError::PersistenceRead {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, key: &str, solved: &[u32]) -> Result<()> {
        let raw = serde_json::to_string(&sorted(solved))?;
        self.values.insert(key.to_string(), raw);
        Ok(())
    }
}

/// Store backed by a single JSON file mapping game ids to solved ids
///
/// Every save rewrites the whole file through a temp file in the same
/// directory that is renamed into place, so a crash mid-save leaves the
/// previous contents intact. A missing file means no progress has been
/// saved yet. A file that no longer parses fails `load`; the next `save`
/// moves it aside to `<name>.corrupt` and starts a fresh map.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparseable progress file is moved before it is replaced
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    fn read_all(&self) -> Result<BTreeMap<String, Vec<u32>>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, all: &BTreeMap<String, Vec<u32>>) -> Result<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut tmp, all)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Vec<u32>> {
        let all = self.read_all().map_err(|e| MatchError::PersistenceRead {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(all.get(key).cloned().unwrap_or_default())
    }

    fn save(&mut self, key: &str, solved: &[u32]) -> Result<()> {
        let write_err = |e: MatchError| MatchError::PersistenceWrite {
            key: key.to_string(),
            reason: e.to_string(),
        };
        let mut all = match self.read_all() {
            Ok(all) => all,
            Err(MatchError::SerializationError(_)) => {
                fs::rename(&self.path, self.corrupt_path()).map_err(|e| write_err(e.into()))?;
                BTreeMap::new()
            }
            Err(e) => return Err(write_err(e)),
        };
        all.insert(key.to_string(), sorted(solved));
        self.write_all(&all).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("thought_reality").unwrap(), Vec::<u32>::new());

        store.save("thought_reality", &[3, 1, 2, 1]).unwrap();
        assert_eq!(store.raw("thought_reality"), Some("[1,2,3]"));
        assert_eq!(store.load("thought_reality").unwrap(), vec![1, 2, 3]);
        assert!(store.load("other_game").unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_corrupt_value() {
        let mut store = MemoryStore::new();
        store.insert_raw("broken", "{not json");
        let err = store.load("broken").unwrap_err();
        assert!(matches!(err, MatchError::PersistenceRead { .. }));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("progress.json"));
        assert!(store.load("thought_reality").unwrap().is_empty());
    }

    #[test]
    fn test_file_store_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("progress.json"));
        store.save("thought_reality", &[2, 1]).unwrap();
        store.save("next_steps", &[4]).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("progress.json")]);
        assert_eq!(store.load("thought_reality").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_file_store_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "{\"thought_reality\": [1, 2").unwrap();
        let mut store = JsonFileStore::new(&path);

        let err = store.load("thought_reality").unwrap_err();
        assert!(matches!(err, MatchError::PersistenceRead { .. }));

        store.save("thought_reality", &[3]).unwrap();
        assert_eq!(store.load("thought_reality").unwrap(), vec![3]);
        assert_eq!(
            fs::read_to_string(store.corrupt_path()).unwrap(),
            "{\"thought_reality\": [1, 2"
        );

        // later saves keep working and keep earlier keys
        store.save("next_steps", &[1]).unwrap();
        assert_eq!(store.load("thought_reality").unwrap(), vec![3]);
    }
}
