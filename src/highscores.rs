//! Personal best score
//!
//! A single scalar, persisted through a [`KeyValueStore`] (LocalStorage on
//! the web).

use crate::platform::storage::KeyValueStore;

/// Where the personal best lives
pub trait HighScoreStore {
    /// Stored best, or 0 if missing or unreadable
    fn load_high_score(&self) -> u64;
    fn save_high_score(&mut self, score: u64);
}

/// High score kept as a decimal string under one storage key
#[derive(Debug, Default, Clone)]
pub struct LocalHighScoreStore<S: KeyValueStore> {
    pub storage: S,
}

impl<S: KeyValueStore> LocalHighScoreStore<S> {
    /// Storage key
    const STORAGE_KEY: &'static str = "fence_and_fang_high_score";

    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

impl<S: KeyValueStore> HighScoreStore for LocalHighScoreStore<S> {
    fn load_high_score(&self) -> u64 {
        match self.storage.get(Self::STORAGE_KEY) {
            Some(raw) => match serde_json::from_str::<u64>(raw.trim()) {
                Ok(score) => score,
                Err(e) => {
                    log::info!("Ignoring unreadable high score {raw:?}: {e}");
                    0
                }
            },
            None => {
                log::info!("No high score found, starting fresh");
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        if self.storage.set(Self::STORAGE_KEY, &score.to_string()) {
            log::info!("High score saved ({score})");
        }
    }
}

/// Persist `score` if it beats `best`; returns the new best
pub fn record_final_score(store: &mut dyn HighScoreStore, best: u64, score: u64) -> u64 {
    if score > best {
        store.save_high_score(score);
        score
    } else {
        best
    }
}
