//! Key/value persistence
//!
//! The engine reads its persisted keys once at startup and writes
//! fire-and-forget on change. Storage failures are swallowed: a missing or
//! corrupt value falls back to its default and play continues.

use std::collections::HashMap;
use std::path::PathBuf;

/// Keys the engine owns
pub mod keys {
    /// Base-10 non-negative integer string
    pub const HIGH_SCORE: &str = "high_score";
    /// Base-10 integer in [0, number of story lines]
    pub const UNLOCK_COUNT: &str = "unlock_count";
    /// Exactly `"on"` or `"off"`; absent means follow the default
    pub const REDUCED_MOTION: &str = "reduced_motion";
}

/// Minimal storage surface the engine depends on
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Parse a persisted unsigned integer, defaulting to 0 on absence or garbage
pub fn read_u64<S: Store>(store: &S, key: &str) -> u64 {
    store
        .get(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// In-memory store for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_owned(), value.to_owned());
    }
}

/// Flat JSON string map on disk.
///
/// An unreadable or corrupt file loads as empty; a failed write is logged
/// at debug level and dropped. The engine never surfaces storage errors.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    map: HashMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = std::fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self { path, map }
    }

    fn flush(&self) {
        if let Ok(json) = serde_json::to_string(&self.map) {
            if let Err(err) = std::fs::write(&self.path, json) {
                log::debug!("store write to {} failed: {err}", self.path.display());
            }
        }
    }
}

impl Store for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_owned(), value.to_owned());
        self.flush();
    }
}
