//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, in-memory elsewhere)
//! - Haptics (navigator.vibrate on web)

pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod haptics;

pub use storage::{KeyValueStore, MemoryStore, StoreError};

#[cfg(target_arch = "wasm32")]
pub use haptics::VibrationBackend;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
