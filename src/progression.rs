//! Persistent player progression: tokens, best scores and the chosen palette
//!
//! Loaded once at startup and written back after every change. Storage
//! failures never reach the player; at worst progress is not saved.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_PALETTE, PROGRESSION_KEY};
use crate::games::GameKey;
use crate::platform::KeyValueStore;
use crate::session::Settlement;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("cannot spend {requested} tokens with a balance of {balance}")]
    InsufficientTokens { balance: u32, requested: u32 },
}

/// The durable progression document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionRecord {
    pub tokens: u32,
    /// Selected cosmetic theme key
    pub palette: String,
    /// Best score per game, keyed by [`GameKey::as_str`]
    pub best: BTreeMap<String, u32>,
}

impl Default for ProgressionRecord {
    fn default() -> Self {
        Self {
            tokens: 0,
            palette: DEFAULT_PALETTE.to_string(),
            best: GameKey::ALL
                .iter()
                .map(|k| (k.as_str().to_string(), 0))
                .collect(),
        }
    }
}

impl ProgressionRecord {
    /// Fill in anything an older or partial document left out
    fn normalized(mut self) -> Self {
        for key in GameKey::ALL {
            self.best.entry(key.as_str().to_string()).or_insert(0);
        }
        if self.palette.is_empty() {
            self.palette = DEFAULT_PALETTE.to_string();
        }
        self
    }

    pub fn best(&self, key: GameKey) -> u32 {
        self.best.get(key.as_str()).copied().unwrap_or(0)
    }
}

/// Progression backed by a key-value store
#[derive(Debug)]
pub struct ProgressionStore<S: KeyValueStore> {
    store: S,
    record: ProgressionRecord,
}

impl<S: KeyValueStore> ProgressionStore<S> {
    /// Read the record from `store`, defaulting if it is absent or unreadable
    pub fn load(store: S) -> Self {
        let record = match store.get(PROGRESSION_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<ProgressionRecord>(&json) {
                Ok(record) => {
                    log::info!("Loaded progression ({} tokens)", record.tokens);
                    record.normalized()
                }
                Err(e) => {
                    log::warn!("Progression unreadable ({}), starting fresh", e);
                    ProgressionRecord::default()
                }
            },
            Ok(None) => {
                log::info!("No saved progression, starting fresh");
                ProgressionRecord::default()
            }
            Err(e) => {
                log::warn!("Progression storage failed ({}), starting fresh", e);
                ProgressionRecord::default()
            }
        };
        Self { store, record }
    }

    pub fn record(&self) -> &ProgressionRecord {
        &self.record
    }

    pub fn tokens(&self) -> u32 {
        self.record.tokens
    }

    pub fn best(&self, key: GameKey) -> u32 {
        self.record.best(key)
    }

    pub fn palette(&self) -> &str {
        &self.record.palette
    }

    /// Add tokens. Returns the new balance.
    pub fn award(&mut self, tokens: u32) -> u32 {
        self.record.tokens = self.record.tokens.saturating_add(tokens);
        self.persist();
        self.record.tokens
    }

    /// Take tokens if the balance covers them. Returns the new balance.
    pub fn spend(&mut self, tokens: u32) -> Result<u32, ProgressionError> {
        let balance = self.record.tokens;
        let remaining = balance
            .checked_sub(tokens)
            .ok_or(ProgressionError::InsufficientTokens {
                balance,
                requested: tokens,
            })?;
        self.record.tokens = remaining;
        self.persist();
        Ok(remaining)
    }

    /// Keep `score` if it beats the stored best. Returns whether it did.
    pub fn record_best(&mut self, key: GameKey, score: u32) -> bool {
        let best = self.record.best.entry(key.as_str().to_string()).or_insert(0);
        if score <= *best {
            return false;
        }
        *best = score;
        log::info!("New best for {}: {}", key, score);
        self.persist();
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.record) {
            Ok(json) => {
                if let Err(e) = self.store.set(PROGRESSION_KEY, &json) {
                    log::warn!("Progression not saved: {}", e);
                }
            }
            Err(e) => log::warn!("Progression not serialized: {}", e),
        }
    }
}

impl<S: KeyValueStore> Settlement for ProgressionStore<S> {
    fn on_exit(&mut self, key: GameKey, score: u32) {
        self.record_best(key, score);
    }

    fn award(&mut self, tokens: u32) {
        ProgressionStore::award(self, tokens);
    }
}
