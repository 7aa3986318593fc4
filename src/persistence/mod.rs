//! High-score and preference storage
//!
//! Backends implement the small `Storage` key/value trait; JSON encoding and
//! the high-score record live on top of it, so every backend gets
//! `HighScoreStore` for free.
//! - `MemoryStore`: in-process, for tests and throwaway sessions
//! - `JsonFileStore`: one JSON file per key in a directory (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Key the high score is stored under
pub const HIGH_SCORE_KEY: &str = "pixel_invaders_highscore";
/// Key the settings are stored under
pub const SETTINGS_KEY: &str = "pixel_invaders_settings";

/// Storage backend failure
#[derive(Debug)]
pub enum PersistError {
    /// Filesystem error
    Io(std::io::Error),
    /// Stored data is not valid JSON for the expected type
    Parse(serde_json::Error),
    /// Backend not available on this platform/context
    Unavailable(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "storage I/O error: {e}"),
            PersistError::Parse(e) => write!(f, "stored data is malformed: {e}"),
            PersistError::Unavailable(why) => write!(f, "storage unavailable: {why}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Parse(e) => Some(e),
            PersistError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Parse(e)
    }
}

/// Raw string key/value storage
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// Read and decode a JSON value; `Ok(None)` when the key is absent
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, PersistError> {
    match storage.read(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let json = serde_json::to_string(value)?;
    storage.write(key, &json)
}

/// Persisted high-score record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,
}

/// Best-effort high-score persistence. Failures are logged, never raised.
pub trait HighScoreStore {
    /// Stored high score, 0 when missing or unreadable
    fn load_high_score(&mut self) -> u32;
    fn save_high_score(&mut self, score: u32);
}

impl<S: Storage> HighScoreStore for S {
    fn load_high_score(&mut self) -> u32 {
        match load_json::<HighScoreRecord>(&*self, HIGH_SCORE_KEY) {
            Ok(Some(record)) => {
                log::info!("Loaded high score {}", record.high_score);
                record.high_score
            }
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Could not load high score: {e}");
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u32) {
        let record = HighScoreRecord { high_score: score };
        if let Err(e) = save_json(self, HIGH_SCORE_KEY, &record) {
            log::warn!("Could not save high score: {e}");
        }
    }
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    /// Successful writes, handy for asserting persistence happened
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a high score
    pub fn with_high_score(score: u32) -> Self {
        let mut store = Self::new();
        store.save_high_score(score);
        store.writes = 0;
        store
    }

    /// Raw access for seeding and inspection
    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
