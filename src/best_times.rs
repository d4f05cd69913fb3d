//! Per-level best completion times
//!
//! Min-kept: a new time only replaces a slower (or missing) one. The storage
//! backend lives with the embedding app; this table just serializes to JSON,
//! and `storage_key` reproduces the per-level preference key older builds
//! used for individual entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fastest completion per level id, in game-time milliseconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestTimes {
    entries: BTreeMap<i32, u64>,
}

impl BestTimes {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completion; true when it beat (or set) the level's best
    pub fn record(&mut self, level_id: i32, elapsed_ms: u64) -> bool {
        match self.entries.get(&level_id) {
            Some(&best) if best <= elapsed_ms => false,
            _ => {
                log::debug!("New best for level {level_id}: {elapsed_ms} ms");
                self.entries.insert(level_id, elapsed_ms);
                true
            }
        }
    }

    /// Best time for a level, if one was ever recorded
    pub fn best(&self, level_id: i32) -> Option<u64> {
        self.entries.get(&level_id).copied()
    }

    /// Entries in ascending level-id order
    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.entries.iter().map(|(&id, &ms)| (id, ms))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Preference key the original app stored this level's time under
    pub fn storage_key(level_id: i32) -> String {
        format!("best_time_level_{level_id}")
    }

    /// Serialize the whole table
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a table written by `to_json`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
