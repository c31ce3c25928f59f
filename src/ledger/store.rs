//! Storage backends for the match history.
//!
//! The whole history is one small JSON document, rewritten on every
//! save. [`FileStore`] writes it atomically (temp file then rename) so
//! a crash mid-save never leaves a half-written history behind.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::record::GameScore;

/// File name the history document is kept under.
pub const HISTORY_FILE: &str = "dice_duel_history.json";

/// Errors raised by a history store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence seam for the match history.
///
/// The ledger treats its in-memory copy as authoritative and calls the
/// store to mirror it. Implementations must persist the full record
/// list on every [`save`](HistoryStore::save).
pub trait HistoryStore {
    /// Load all persisted records. A store with nothing saved yet
    /// returns an empty list, not an error.
    fn load(&self) -> Result<Vec<GameScore>, StoreError>;

    /// Replace the persisted records with `scores`.
    fn save(&mut self, scores: &[GameScore]) -> Result<(), StoreError>;

    /// Remove everything persisted.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// History store backed by a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store the history under `dir`, creating the directory as
    /// needed. The file name is fixed ([`HISTORY_FILE`]).
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(HISTORY_FILE),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileStore {
    fn load(&self) -> Result<Vec<GameScore>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&mut self, scores: &[GameScore]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(scores)?;
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory history store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    scores: Vec<GameScore>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<GameScore>, StoreError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &[GameScore]) -> Result<(), StoreError> {
        self.scores = scores.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.scores.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Seat;
    use tempfile::tempdir;

    fn sample() -> Vec<GameScore> {
        vec![
            GameScore::new(100, 104, 98, Seat::User),
            GameScore::new(150, 132, 151, Seat::Computer),
        ]
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let scores = sample();

        store.save(&scores).unwrap();
        assert_eq!(store.load().unwrap(), scores);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("state").join("history");
        let mut store = FileStore::new(&nested);

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.save(&sample()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(HISTORY_FILE)]);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        store.save(&sample()).unwrap();
        let shorter = vec![GameScore::new(300, 301, 288, Seat::User)];
        store.save(&shorter).unwrap();

        assert_eq!(store.load().unwrap(), shorter);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path(), b"not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_clear_removes_the_file() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.save(&sample()).unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_clear_with_nothing_saved_is_fine() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let scores = sample();
        store.save(&scores).unwrap();
        assert_eq!(store.load().unwrap(), scores);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
