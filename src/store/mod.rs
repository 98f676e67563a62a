//! High score persistence
//!
//! A tiny key/value store of non-negative integers. The game keeps a single
//! entry under [`HIGH_SCORE_KEY`].

use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key the best score is stored under
pub const HIGH_SCORE_KEY: &str = "snake-high-score";

pub trait ScoreStore {
    /// Stored value, or 0 when the key is absent
    fn get(&self, key: &str) -> u32;

    fn set(&mut self, key: &str, value: u32) -> Result<()>;
}

/// In-memory store, lost when the process exits
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    entries: BTreeMap<String, u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self, key: &str) -> u32 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u32) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a JSON object on disk, e.g. `{"snake-high-score": 340}`
#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
    entries: BTreeMap<String, u32>,
}

impl FileScoreStore {
    /// Load the file at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring score file {:?}: {:#}", path, e);
                BTreeMap::new()
            }
        };
        debug!("Loaded {} score entries from {:?}", entries.len(), path);

        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, u32>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {:?}", path))
    }

    fn write_entries(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize scores")?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).with_context(|| format!("Failed to write {:?}", tmp))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move {:?} into place", tmp))?;
        Ok(())
    }
}

impl ScoreStore for FileScoreStore {
    fn get(&self, key: &str) -> u32 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u32) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.write_entries()
    }
}
