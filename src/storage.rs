//! High score persistence.
//!
//! The engine only sees the [`ScoreStore`] port. Failures never reach the
//! game: a store that cannot be read reports 0, a failed write is logged and
//! the in-memory value stays authoritative.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "snake_grid";
const SAVE_FILE: &str = "snake_save.json";

pub trait ScoreStore {
    fn load_high_score(&self) -> u32;
    fn save_high_score(&mut self, score: u32);
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn load_high_score(&self) -> u32 {
        (**self).load_high_score()
    }

    fn save_high_score(&mut self, score: u32) {
        (**self).save_high_score(score)
    }
}

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
struct SaveData {
    #[serde(default)]
    best_score: u32,
}

/// Default location of the save file: the platform data directory, or the
/// working directory when none is known.
pub fn default_save_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_NAME).join(SAVE_FILE),
        None => PathBuf::from(SAVE_FILE),
    }
}

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

    fn read(&self) -> Result<SaveData> {
        if !self.path.exists() {
            return Ok(SaveData::default());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read save file: {:?}", self.path))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse save file: {:?}", self.path))
    }

    fn write(&self, data: &SaveData) -> Result<()> {
        let text = serde_json::to_string_pretty(data).context("Failed to serialize save data")?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write save file: {:?}", self.path))
    }
}

impl ScoreStore for JsonFileStore {
    fn load_high_score(&self) -> u32 {
        match self.read() {
            Ok(data) => data.best_score,
            Err(e) => {
                log::warn!("Ignoring unreadable save file: {:#}", e);
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u32) {
        match self.write(&SaveData { best_score: score }) {
            Ok(()) => log::debug!("Saved high score {} to {:?}", score, self.path),
            Err(e) => log::warn!("Could not save high score: {:#}", e),
        }
    }
}

/// Keeps the high score for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) best: u32,
    pub(crate) saves: usize,
}

impl MemoryStore {
    pub fn with_best(best: u32) -> Self {
        Self { best, saves: 0 }
    }
}

impl ScoreStore for MemoryStore {
    fn load_high_score(&self) -> u32 {
        self.best
    }

    fn save_high_score(&mut self, score: u32) {
        self.best = score;
        self.saves += 1;
    }
}
