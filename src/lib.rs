//! Pulse Arcade - seven one-button timing games
//!
//! Core modules:
//! - `sim`: Frame clock, input edges, event queue and scoring math
//! - `games`: The seven game state machines
//! - `session`: One live game plus settlement
//! - `arcade`: Single-session host the platform drives
//! - `feedback`: Cue to tone/vibration dispatch
//! - `platform`: Browser/native storage and haptics
//! - `progression`: Tokens and best scores
//! - `tuning`: Data-driven game balance

pub mod arcade;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod feedback;
pub mod games;
pub mod platform;
pub mod progression;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use arcade::Arcade;
pub use feedback::{Cue, FeedbackDispatcher};
pub use games::GameKey;
pub use progression::{ProgressionRecord, ProgressionStore};
pub use session::{GameSession, Settled, Settlement};
pub use settings::Settings;
pub use tuning::Tuning;

/// Engine configuration constants
pub mod consts {
    /// Longest frame delta handed to a game (s); longer stalls are clamped
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Most scheduled events a session fires in one frame
    pub const MAX_EVENTS_PER_TICK: usize = 64;

    /// Storage key for the progression record
    pub const PROGRESSION_KEY: &str = "pulse_arcade_progress";
    /// Storage key for player settings
    pub const SETTINGS_KEY: &str = "pulse_arcade_settings";
    /// Theme selected on a fresh profile
    pub const DEFAULT_PALETTE: &str = "aurora";

    /// Frame spacing of the headless demo (ms)
    pub const DEMO_FRAME_MS: f64 = 1000.0 / 60.0;
}
