//! High score persistence
//!
//! Backends:
//! - [`MemoryStore`]: in-process only (tests, headless runs)
//! - [`FileStore`]: JSON file, written via tmp file + rename (native)
//! - [`LocalStorageStore`]: browser LocalStorage (wasm32)
//!
//! A missing record is not an error: it loads as the default high score.

use std::fmt;

use crate::highscores::HighScore;

/// Why a high score could not be loaded or saved
#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The storage backend is not reachable (no window, storage disabled)
    Unavailable(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "high score I/O failed: {e}"),
            PersistenceError::Json(e) => write!(f, "high score data is malformed: {e}"),
            PersistenceError::Unavailable(why) => write!(f, "high score storage unavailable: {why}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Json(e) => Some(e),
            PersistenceError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

/// Somewhere a high score can live between sessions
pub trait HighScoreStore {
    fn load(&self) -> Result<HighScore, PersistenceError>;
    fn save(&mut self, score: &HighScore) -> Result<(), PersistenceError>;
}

/// Keeps the record in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<HighScore>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record
    pub fn with_record(record: HighScore) -> Self {
        Self {
            record: Some(record),
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScore, PersistenceError> {
        Ok(self.record.unwrap_or_default())
    }

    fn save(&mut self, score: &HighScore) -> Result<(), PersistenceError> {
        self.record = Some(*score);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{HighScoreStore, PersistenceError};
    use crate::highscores::HighScore;

    /// JSON file on disk
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl HighScoreStore for FileStore {
        fn load(&self) -> Result<HighScore, PersistenceError> {
            let json = match fs::read_to_string(&self.path) {
                Ok(json) => json,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::info!("No high score at {}, starting fresh", self.path.display());
                    return Ok(HighScore::default());
                }
                Err(e) => return Err(e.into()),
            };
            let record: HighScore = serde_json::from_str(&json)?;
            log::info!("Loaded high score {} from {}", record.score, self.path.display());
            Ok(record)
        }

        fn save(&mut self, score: &HighScore) -> Result<(), PersistenceError> {
            let json = serde_json::to_string_pretty(score)?;
            // Write beside the target, then swap in
            let tmp = self.path.with_extension("tmp");
            fs::write(&tmp, json)?;
            fs::rename(&tmp, &self.path)?;
            log::info!("High score {} saved to {}", score.score, self.path.display());
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::{HighScoreStore, PersistenceError};
    use crate::highscores::HighScore;

    /// Browser LocalStorage under a fixed key
    #[derive(Debug, Clone)]
    pub struct LocalStorageStore {
        key: String,
    }

    impl LocalStorageStore {
        pub const DEFAULT_KEY: &'static str = "brickfall_highscore";

        pub fn new(key: impl Into<String>) -> Self {
            Self { key: key.into() }
        }

        fn storage() -> Result<web_sys::Storage, PersistenceError> {
            web_sys::window()
                .ok_or_else(|| PersistenceError::Unavailable("no window".into()))?
                .local_storage()
                .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))?
                .ok_or_else(|| PersistenceError::Unavailable("LocalStorage disabled".into()))
        }
    }

    impl Default for LocalStorageStore {
        fn default() -> Self {
            Self::new(Self::DEFAULT_KEY)
        }
    }

    impl HighScoreStore for LocalStorageStore {
        fn load(&self) -> Result<HighScore, PersistenceError> {
            let item = Self::storage()?
                .get_item(&self.key)
                .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))?;
            match item {
                Some(json) => {
                    let record: HighScore = serde_json::from_str(&json)?;
                    log::info!("Loaded high score {}", record.score);
                    Ok(record)
                }
                None => {
                    log::info!("No high score found, starting fresh");
                    Ok(HighScore::default())
                }
            }
        }

        fn save(&mut self, score: &HighScore) -> Result<(), PersistenceError> {
            let json = serde_json::to_string(score)?;
            Self::storage()?
                .set_item(&self.key, &json)
                .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))?;
            log::info!("High score {} saved", score.score);
            Ok(())
        }
    }
}
