//! Leaderboard persistence
//!
//! The on-disk (or LocalStorage) format is a JSON array of
//! `{id, name, score, level, timestamp}` records. Loading never fails: missing
//! or malformed data is logged and treated as an empty leaderboard. Native
//! saves go through a temp file and a rename so a crash mid-write leaves the
//! previous leaderboard intact.

use thiserror::Error;

use crate::highscores::HighScores;

/// LocalStorage key / default file stem
pub const STORAGE_KEY: &str = "space-killer-highscores";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Storage(String),
}

/// Somewhere a leaderboard can be loaded from and written back to
pub trait LeaderboardStore {
    fn load(&self) -> HighScores;
    fn save(&self, scores: &HighScores) -> Result<(), PersistenceError>;
}

fn decode(raw: &str) -> HighScores {
    if raw.trim().is_empty() {
        return HighScores::new();
    }
    HighScores::from_json(raw, crate::platform::now_ms(), &mut rand::rng())
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{LeaderboardStore, PersistenceError, decode};
    use crate::highscores::HighScores;

    /// Leaderboard kept in a JSON file
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

        pub(super) fn tmp_path(&self) -> PathBuf {
            let mut name = self
                .path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_default();
            name.push(".tmp");
            self.path.with_file_name(name)
        }
    }

    impl LeaderboardStore for JsonFileStore {
        fn load(&self) -> HighScores {
            match fs::read_to_string(&self.path) {
                Ok(raw) => {
                    let scores = decode(&raw);
                    log::info!(
                        "Loaded {} high scores from {}",
                        scores.entries.len(),
                        self.path.display()
                    );
                    scores
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::info!("No high scores at {}, starting fresh", self.path.display());
                    HighScores::new()
                }
                Err(e) => {
                    log::warn!("Failed to read {}: {}", self.path.display(), e);
                    HighScores::new()
                }
            }
        }

        fn save(&self, scores: &HighScores) -> Result<(), PersistenceError> {
            let json = serde_json::to_string_pretty(scores)?;
            if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            let tmp = self.tmp_path();
            fs::write(&tmp, json)?;
            fs::rename(&tmp, &self.path)?;
            log::info!(
                "High scores saved ({} entries) to {}",
                scores.entries.len(),
                self.path.display()
            );
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{LeaderboardStore, PersistenceError, STORAGE_KEY, decode};
    use crate::highscores::HighScores;

    /// Leaderboard kept in the browser's LocalStorage
    #[derive(Debug, Clone, Default)]
    pub struct LocalStorageStore;

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    impl LeaderboardStore for LocalStorageStore {
        fn load(&self) -> HighScores {
            let Some(storage) = storage() else {
                log::warn!("LocalStorage unavailable, high scores will not persist");
                return HighScores::new();
            };
            match storage.get_item(STORAGE_KEY) {
                Ok(Some(raw)) => {
                    let scores = decode(&raw);
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Ok(None) => {
                    log::info!("No high scores found, starting fresh");
                    HighScores::new()
                }
                Err(_) => {
                    log::warn!("LocalStorage read failed, starting fresh");
                    HighScores::new()
                }
            }
        }

        fn save(&self, scores: &HighScores) -> Result<(), PersistenceError> {
            let storage = storage()
                .ok_or_else(|| PersistenceError::Storage("LocalStorage unavailable".into()))?;
            let json = serde_json::to_string(scores)?;
            storage
                .set_item(STORAGE_KEY, &json)
                .map_err(|e| PersistenceError::Storage(format!("{:?}", e)))?;
            log::info!("High scores saved ({} entries)", scores.entries.len());
            Ok(())
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::highscores::HighScoreEntry;
    use std::path::PathBuf;

    fn temp_file(tag: &str) -> PathBuf {
        let unique = format!(
            "space-killer-{}-{}-{}.json",
            tag,
            std::process::id(),
            crate::platform::now_ms()
        );
        std::env::temp_dir().join(unique)
    }

    fn sample() -> HighScores {
        HighScores {
            entries: vec![HighScoreEntry {
                id: "run-1".into(),
                name: "Ace".into(),
                score: 1250,
                level: 3,
                timestamp: 42,
            }],
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let store = JsonFileStore::new(temp_file("missing"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_file("save");
        let store = JsonFileStore::new(&path);
        store.save(&sample()).unwrap();

        assert_eq!(store.load(), sample());
        assert!(!store.tmp_path().exists());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let path = temp_file("corrupt");
        std::fs::write(&path, "{{{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(store.load().is_empty());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_save_reports_io_error() {
        let dir = temp_file("blocker");
        // A regular file where a directory is expected
        std::fs::write(&dir, "x").unwrap();
        let store = JsonFileStore::new(dir.join("scores.json"));
        let err = store.save(&sample()).unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
        std::fs::remove_file(dir).ok();
    }
}
