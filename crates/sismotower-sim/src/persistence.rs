//! Score persistence.
//!
//! The store is an external collaborator: failures never stop the game. A
//! store that cannot be read counts as empty, and a failed write is logged and
//! dropped.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use sismotower_core::state::ScoreRecord;

/// Default file name for the JSON score store.
pub const DEFAULT_SCORES_FILE: &str = "sismotower_scores.json";

#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("failed to access score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to (de)serialize scores: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("score store is unavailable")]
    Unavailable,
}

/// Anything that can hold the score list.
pub trait ScoreStore {
    fn load(&self) -> Result<Vec<ScoreRecord>, ScoreStoreError>;
    fn save(&mut self, records: &[ScoreRecord]) -> Result<(), ScoreStoreError>;
}

/// Scores kept in a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ScoreStoreError {
        ScoreStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for JsonFileStore {
    /// A missing file is an empty list, not an error.
    fn load(&self) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&mut self, records: &[ScoreRecord]) -> Result<(), ScoreStoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// Session-only store. Can be told to fail for exercising error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<ScoreRecord>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records,
            unavailable: false,
        }
    }

    /// A store whose every read and write fails.
    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            unavailable: true,
        }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
        if self.unavailable {
            return Err(ScoreStoreError::Unavailable);
        }
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[ScoreRecord]) -> Result<(), ScoreStoreError> {
        if self.unavailable {
            return Err(ScoreStoreError::Unavailable);
        }
        self.records = records.to_vec();
        Ok(())
    }
}

/// Read the stored scores, treating any failure as an empty list.
pub fn load_or_empty(store: &dyn ScoreStore) -> Vec<ScoreRecord> {
    match store.load() {
        Ok(records) => records,
        Err(e) => {
            log::warn!("could not read scores, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Write the scores, logging and dropping any failure. Returns whether the
/// write went through.
pub fn save_or_log(store: &mut dyn ScoreStore, records: &[ScoreRecord]) -> bool {
    match store.save(records) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("could not save scores: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sismotower_core::enums::DisasterKind;

    fn sample() -> Vec<ScoreRecord> {
        vec![ScoreRecord {
            player_name: "GRACE".to_string(),
            integrity: 64.2,
            cost: 2_500_000.0,
            disasters: vec![
                DisasterKind::Earthquake,
                DisasterKind::Tsunami,
                DisasterKind::Hurricane,
            ],
            timestamp: 1_700_000_000_123,
        }]
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join(DEFAULT_SCORES_FILE));
        assert!(store.load().unwrap().is_empty());
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"playerName\""));
    }

    #[test]
    fn test_file_store_keeps_exact_floats() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join(DEFAULT_SCORES_FILE));
        let mut records = sample();
        records[0].integrity = 91.57951219512196;
        records[0].cost = 0.1 + 0.2;
        store.save(&records).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].integrity.to_bits(), records[0].integrity.to_bits());
        assert_eq!(loaded[0].cost.to_bits(), records[0].cost.to_bits());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SCORES_FILE);
        fs::write(&path, "not json at all").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(ScoreStoreError::Serde(_))));
        assert!(load_or_empty(&store).is_empty());
    }

    #[test]
    fn test_unavailable_store_is_swallowed() {
        let mut store = MemoryStore::unavailable();
        assert!(load_or_empty(&store).is_empty());
        assert!(!save_or_log(&mut store, &sample()));
    }

    #[test]
    fn test_memory_store_keeps_records() {
        let mut store = MemoryStore::default();
        assert!(save_or_log(&mut store, &sample()));
        assert_eq!(store.records(), sample().as_slice());
    }
}
