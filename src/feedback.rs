//! Audio/haptic feedback dispatch
//!
//! Games report outcomes as [`Cue`]s. The dispatcher turns each cue into a
//! tone request and a vibration pattern and hands them to whatever backends
//! the host provided. Backends may be missing or failing; that only ever
//! costs feedback, never a frame.

use thiserror::Error;

use crate::settings::Settings;

/// Outcome tiers a game can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Neutral metronome tick (beats, pulses, calibration taps)
    Tick,
    /// Demonstration cue (EchoOrb listen phase)
    Demo,
    /// Successful action
    Success,
    /// Near-perfect action
    StrongSuccess,
    /// Miss, overheat or penalty
    Failure,
}

/// A tone request for the synthesis backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_s: f32,
    /// Linear gain (0.0 - 1.0) after volume settings are applied
    pub gain: f32,
}

/// Vibration request for the haptic backend (milliseconds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HapticPattern {
    Pulse(u32),
    Sequence(Vec<u32>),
}

/// Backend failures. Logged and dropped by the dispatcher.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("{0} backend unavailable")]
    Unavailable(&'static str),
    #[error("backend rejected request: {0}")]
    Rejected(String),
}

/// Tone synthesis service
pub trait ToneBackend {
    fn play_tone(&mut self, tone: &Tone) -> Result<(), FeedbackError>;
}

/// Vibration service
pub trait HapticBackend {
    fn vibrate(&mut self, pattern: &HapticPattern) -> Result<(), FeedbackError>;
}

/// Backend that drops every request (silent/headless hosts)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl ToneBackend for NullBackend {
    fn play_tone(&mut self, _tone: &Tone) -> Result<(), FeedbackError> {
        Ok(())
    }
}

impl HapticBackend for NullBackend {
    fn vibrate(&mut self, _pattern: &HapticPattern) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Sink the games report cues into
pub trait Feedback {
    fn cue(&mut self, cue: Cue);
}

/// Recording sink, handy for assertions and replays
impl Feedback for Vec<Cue> {
    fn cue(&mut self, cue: Cue) {
        self.push(cue);
    }
}

impl Cue {
    /// Tone for this cue before volume scaling.
    ///
    /// Success is higher and shorter, failure lower and longer.
    pub fn tone(self) -> Tone {
        let (frequency_hz, duration_s, gain) = match self {
            Cue::Tick => (440.0, 0.04, 0.25),
            Cue::Demo => (660.0, 0.08, 0.5),
            Cue::Success => (880.0, 0.08, 0.6),
            Cue::StrongSuccess => (1046.5, 0.1, 0.7),
            Cue::Failure => (180.0, 0.25, 0.6),
        };
        Tone {
            frequency_hz,
            duration_s,
            gain,
        }
    }

    /// Vibration for this cue
    pub fn haptic(self) -> HapticPattern {
        match self {
            Cue::Tick | Cue::Demo => HapticPattern::Pulse(12),
            Cue::Success => HapticPattern::Pulse(25),
            Cue::StrongSuccess => HapticPattern::Sequence(vec![30, 40, 30, 40, 30]),
            Cue::Failure => HapticPattern::Pulse(120),
        }
    }
}

/// Routes cues to the tone and haptic backends
pub struct FeedbackDispatcher {
    tones: Box<dyn ToneBackend>,
    haptics: Box<dyn HapticBackend>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    haptics_enabled: bool,
}

impl Default for FeedbackDispatcher {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for FeedbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackDispatcher")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .field("haptics_enabled", &self.haptics_enabled)
            .finish_non_exhaustive()
    }
}

impl FeedbackDispatcher {
    pub fn new(tones: Box<dyn ToneBackend>, haptics: Box<dyn HapticBackend>) -> Self {
        Self {
            tones,
            haptics,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            haptics_enabled: true,
        }
    }

    /// Dispatcher with no backends attached
    pub fn silent() -> Self {
        Self::new(Box::new(NullBackend), Box::new(NullBackend))
    }

    /// Pick up volume, mute and haptics preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
        self.haptics_enabled = settings.haptics;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue. Never fails; backend errors are logged and dropped.
    pub fn dispatch(&mut self, cue: Cue) {
        let vol = self.effective_volume();
        if vol > 0.0 {
            let mut tone = cue.tone();
            tone.gain *= vol;
            if let Err(e) = self.tones.play_tone(&tone) {
                log::warn!("Tone for {:?} dropped: {}", cue, e);
            }
        }

        if self.haptics_enabled {
            if let Err(e) = self.haptics.vibrate(&cue.haptic()) {
                log::warn!("Haptic for {:?} dropped: {}", cue, e);
            }
        }
    }
}

impl Feedback for FeedbackDispatcher {
    fn cue(&mut self, cue: Cue) {
        self.dispatch(cue);
    }
}
