//! Durable session store.
//!
//! A single JSON slot on disk holds the serialized [`AggregateStats`].
//! A mutex-guarded in-process cache sits in front of it so all writes in
//! one process go through a single writer; across processes the slot is
//! last-write-wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::DebatifyError;
use crate::session::{AggregateStats, SessionRecord};

/// File name of the aggregate slot inside the data directory.
pub const STORE_FILE: &str = "sessions.json";

pub struct SessionStore {
    path: PathBuf,
    cache: Mutex<Option<AggregateStats>>,
}

impl SessionStore {
    /// Open a store backed by the given file path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Open the store at its default location, `~/.debatify/sessions.json`.
    pub fn open_default() -> Result<Self, DebatifyError> {
        let home = dirs::home_dir()
            .ok_or_else(|| DebatifyError::Store("Could not find home directory".to_string()))?;
        Ok(Self::open(home.join(".debatify").join(STORE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current aggregate.
    ///
    /// A missing or undecodable slot is the empty state, never an error.
    pub fn load(&self) -> AggregateStats {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache
            .get_or_insert_with(|| read_slot(&self.path))
            .clone()
    }

    /// Fold one session into the aggregate and persist the whole blob.
    pub fn record(&self, entry: SessionRecord) -> Result<AggregateStats, DebatifyError> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let stats = cache.get_or_insert_with(|| read_slot(&self.path));
        stats.apply(entry);
        write_slot(&self.path, stats)?;
        Ok(stats.clone())
    }
}

fn read_slot(path: &Path) -> AggregateStats {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

/// Write the full blob, via a temp file and rename so readers never see
/// a half-written slot.
fn write_slot(path: &Path, stats: &AggregateStats) -> Result<(), DebatifyError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| DebatifyError::Store(format!("Failed to create data dir: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(stats)
        .map_err(|e| DebatifyError::Store(format!("Failed to encode stats: {}", e)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)
        .map_err(|e| DebatifyError::Store(format!("Failed to write store: {}", e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| DebatifyError::Store(format!("Failed to replace store: {}", e)))?;

    Ok(())
}
