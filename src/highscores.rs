//! Best-score persistence
//!
//! A single number under one storage key. Storage failures never reach the
//! game: a failed load reads as zero and a failed save is logged and dropped.

use crate::platform::storage::{KeyValueStore, load_json, save_json};
use crate::sim::ScoreStore;

/// Best score backed by a key-value store
pub struct HighScore<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> HighScore<K> {
    /// Storage key (plain JSON number)
    pub const STORAGE_KEY: &'static str = "snakeHighScore";

    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> K {
        self.store
    }
}

impl<K: KeyValueStore> ScoreStore for HighScore<K> {
    fn load(&self) -> u64 {
        match load_json::<u64>(&self.store, Self::STORAGE_KEY) {
            Ok(Some(score)) => {
                log::info!("Loaded high score {score}");
                score
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(err) => {
                log::warn!("High score unreadable ({err}), starting fresh");
                0
            }
        }
    }

    fn save(&mut self, score: u64) {
        match save_json(&mut self.store, Self::STORAGE_KEY, &score) {
            Ok(()) => log::info!("High score saved ({score})"),
            Err(err) => log::warn!("Failed to save high score: {err}"),
        }
    }
}
