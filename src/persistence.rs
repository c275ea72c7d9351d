//! High score persistence
//!
//! The game only ever needs one number to survive between runs. Stores are
//! allowed to fail; the session keeps playing with an in-memory value when
//! they do.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tracing::warn;

use crate::error::{GameError, GameResult};

/// Key-value store holding the best score across sessions
pub trait HighScoreStore: Send {
    /// Read the stored high score, `None` if nothing was saved yet
    fn load_high_score(&mut self) -> GameResult<Option<u32>>;

    /// Replace the stored high score
    fn save_high_score(&mut self, value: u32) -> GameResult<()>;
}

/// On-disk record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,

    /// Version identifier of the writer
    pub version: String,
}

impl HighScoreRecord {
    pub fn new(high_score: u32) -> Self {
        Self {
            high_score,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Stores the high score as a small JSON file.
///
/// Inside a tokio runtime saves are handed to the blocking pool so the game
/// loop never waits on the disk; write failures are then only logged.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Highest value on disk; a late write never replaces a newer score
    written: Arc<Mutex<Option<u32>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&self) -> anyhow::Result<Option<HighScoreRecord>> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read high score from {:?}", self.path));
            }
        };

        let record = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse high score file {:?}", self.path))?;
        Ok(Some(record))
    }

    fn write_record(&self, record: &HighScoreRecord) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json =
            serde_json::to_string_pretty(record).context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;
        Ok(())
    }

    fn write_if_higher(&self, value: u32) -> anyhow::Result<()> {
        let mut written = self
            .written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if written.is_some_and(|current| current >= value) {
            return Ok(());
        }

        self.write_record(&HighScoreRecord::new(value))?;
        *written = Some(value);
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn load_high_score(&mut self) -> GameResult<Option<u32>> {
        self.read_record()
            .map(|record| record.map(|r| r.high_score))
            .map_err(|err| GameError::persistence("load", err))
    }

    fn save_high_score(&mut self, value: u32) -> GameResult<()> {
        match Handle::try_current() {
            Ok(handle) => {
                let store = self.clone();
                handle.spawn_blocking(move || {
                    if let Err(err) = store.write_if_higher(value) {
                        warn!("High score {} kept in memory only: {:#}", value, err);
                    }
                });
                Ok(())
            }
            Err(_) => self
                .write_if_higher(value)
                .map_err(|err| GameError::persistence("save", err)),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    value: Option<u32>,
    saves: Vec<u32>,
    failing: bool,
}

/// In-process store. Clones share the same value, so a caller can keep a
/// handle after giving one to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        let store = Self::new();
        store.lock().value = Some(value);
        store
    }

    /// A store whose every load and save fails
    pub fn failing() -> Self {
        let store = Self::new();
        store.lock().failing = true;
        store
    }

    pub fn value(&self) -> Option<u32> {
        self.lock().value
    }

    /// Every value saved so far, oldest first
    pub fn saves(&self) -> Vec<u32> {
        self.lock().saves.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // The data stays consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&mut self) -> GameResult<Option<u32>> {
        let inner = self.lock();
        if inner.failing {
            return Err(GameError::persistence("load", anyhow::anyhow!("store offline")));
        }
        Ok(inner.value)
    }

    fn save_high_score(&mut self, value: u32) -> GameResult<()> {
        let mut inner = self.lock();
        if inner.failing {
            return Err(GameError::persistence("save", anyhow::anyhow!("store offline")));
        }
        inner.value = Some(value);
        inner.saves.push(value);
        Ok(())
    }
}
