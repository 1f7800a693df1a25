//! JSON file stats store.
//!
//! The whole file is small (stats plus at most
//! [`SESSION_HISTORY_LIMIT`](crate::types::SESSION_HISTORY_LIMIT) records), so
//! it is read once on open and rewritten on every save. Writes go to a
//! sibling temp file first and are renamed into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{SessionRecord, Stats, StatsStore};
use crate::types::SESSION_HISTORY_LIMIT;

const FILE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("stats file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stats file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported stats file version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoreFile {
    version: u32,
    stats: Stats,
    /// Newest first.
    sessions: Vec<SessionRecord>,
}

/// Stats persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    file: StoreFile,
}

impl JsonFileStore {
    /// Open `path`, starting empty if it is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_open(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stats unreadable, starting fresh");
                Self {
                    path,
                    file: StoreFile::default(),
                }
            }
        }
    }

    /// Open `path`. A missing file is an empty store; anything else that
    /// goes wrong is an error.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = Self::try_load(&path)?;
        debug!(path = %path.display(), games = file.stats.games_played, "stats loaded");
        Ok(Self { path, file })
    }

    fn try_load(path: &Path) -> Result<StoreFile, StoreError> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(e) => return Err(e.into()),
        };
        let file: StoreFile = serde_json::from_slice(&bytes)?;
        if file.version > FILE_VERSION {
            return Err(StoreError::UnsupportedVersion(file.version));
        }
        Ok(file)
    }

    /// Write the current contents to disk.
    pub fn try_save(&self) -> Result<(), StoreError> {
        let mut file = self.file.clone();
        file.version = FILE_VERSION;
        let json = serde_json::to_vec_pretty(&file)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_or_warn(&self) {
        if let Err(e) = self.try_save() {
            warn!(path = %self.path.display(), error = %e, "failed to save stats");
        }
    }
}

impl StatsStore for JsonFileStore {
    fn load_stats(&self) -> Stats {
        self.file.stats
    }

    fn save_stats(&mut self, stats: &Stats) {
        self.file.stats = *stats;
        self.save_or_warn();
    }

    fn record_session(&mut self, record: &SessionRecord) {
        self.file.sessions.insert(0, record.clone());
        self.file.sessions.truncate(SESSION_HISTORY_LIMIT);
        self.save_or_warn();
    }

    fn recent_sessions(&self, limit: usize) -> Vec<SessionRecord> {
        self.file.sessions.iter().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameMode;

    fn record(score: u32) -> SessionRecord {
        SessionRecord {
            mode: GameMode::Blitz,
            score,
            level: 2,
            max_combo: 4,
            accuracy: 0.5,
            correct_sorts: 2,
            incorrect_sorts: 2,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::try_open(dir.path().join("stats.json")).unwrap();
        assert_eq!(store.load_stats(), Stats::default());
        assert!(store.recent_sessions(10).is_empty());
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stats.json");

        let mut store = JsonFileStore::open(&path);
        let stats = Stats {
            games_played: 3,
            best_score: 120,
            total_score: 300,
            ..Stats::default()
        };
        store.save_stats(&stats);
        store.record_session(&record(10));
        store.record_session(&record(20));

        let reopened = JsonFileStore::try_open(&path).unwrap();
        assert_eq!(reopened.load_stats(), stats);
        let recent = reopened.recent_sessions(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].score, 20);
        assert_eq!(recent[1].mode, GameMode::Blitz);
    }

    #[test]
    fn test_history_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("stats.json"));
        for score in 0..(SESSION_HISTORY_LIMIT as u32 + 3) {
            store.record_session(&record(score));
        }
        assert_eq!(store.recent_sessions(usize::MAX).len(), SESSION_HISTORY_LIMIT);
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(
            JsonFileStore::try_open(&path),
            Err(StoreError::Json(_))
        ));
        // The lenient constructor starts fresh instead.
        assert_eq!(JsonFileStore::open(&path).load_stats(), Stats::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, br#"{"stats":{"bestScore":42}}"#).unwrap();

        let store = JsonFileStore::try_open(&path).unwrap();
        assert_eq!(store.load_stats().best_score, 42);
        assert_eq!(store.load_stats().games_played, 0);
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, br#"{"version":99}"#).unwrap();
        assert!(matches!(
            JsonFileStore::try_open(&path),
            Err(StoreError::UnsupportedVersion(99))
        ));
    }
}
