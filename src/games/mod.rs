//! The seven mini-games
//!
//! Each game is a plain state struct advanced by `update` once per frame and
//! by `on_event` when one of its scheduled events comes due. Nothing here
//! touches a clock, a timer or a backend directly: time, randomness, the event
//! queue and the feedback sink all arrive through [`TickContext`].

pub mod ascend_light;
pub mod echo_orb;
pub mod heartbeat;
pub mod heat_bloom;
pub mod pressure_craft;
pub mod pulse_link;
pub mod tension_line;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::feedback::Feedback;
use crate::sim::{FrameInput, Scheduler};
use crate::tuning::Tuning;

pub use ascend_light::{AscendLight, Updraft};
pub use echo_orb::{EchoOrb, EchoPhase};
pub use heartbeat::{Heartbeat, HeartbeatPhase};
pub use heat_bloom::{Band, HeatBloom};
pub use pressure_craft::PressureCraft;
pub use pulse_link::PulseLink;
pub use tension_line::TensionLine;

/// Stable identifier for each game (also the progression storage key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKey {
    PulseLink,
    HeatBloom,
    TensionLine,
    EchoOrb,
    PressureCraft,
    AscendLight,
    Heartbeat,
}

impl GameKey {
    pub const ALL: [GameKey; 7] = [
        GameKey::PulseLink,
        GameKey::HeatBloom,
        GameKey::TensionLine,
        GameKey::EchoOrb,
        GameKey::PressureCraft,
        GameKey::AscendLight,
        GameKey::Heartbeat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKey::PulseLink => "pulse_link",
            GameKey::HeatBloom => "heat_bloom",
            GameKey::TensionLine => "tension_line",
            GameKey::EchoOrb => "echo_orb",
            GameKey::PressureCraft => "pressure_craft",
            GameKey::AscendLight => "ascend_light",
            GameKey::Heartbeat => "heartbeat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Display name
    pub fn title(&self) -> &'static str {
        match self {
            GameKey::PulseLink => "Pulse Link",
            GameKey::HeatBloom => "Heat Bloom",
            GameKey::TensionLine => "Tension Line",
            GameKey::EchoOrb => "Echo Orb",
            GameKey::PressureCraft => "Pressure Craft",
            GameKey::AscendLight => "Ascend Light",
            GameKey::Heartbeat => "Heartbeat",
        }
    }
}

impl std::fmt::Display for GameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Deferred events a game can queue on its session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// PulseLink metronome beat
    Beat,
    /// EchoOrb demonstration cue
    DemoCue,
    /// EchoOrb tap window opens
    TapWindowOpen,
    /// EchoOrb result display finished
    ResultDone,
    /// Heartbeat sync pulse
    Pulse,
}

/// Everything a game may touch during one step
pub struct TickContext<'a> {
    /// Current frame timestamp (ms)
    pub now_ms: f64,
    pub rng: &'a mut Pcg32,
    pub scheduler: &'a mut Scheduler<SessionEvent>,
    pub feedback: &'a mut dyn Feedback,
}

/// Per-frame and per-event behavior shared by every game
pub trait Simulation {
    /// Advance continuous state by `dt` seconds and consume this frame's input
    fn update(&mut self, dt: f32, input: &FrameInput, ctx: &mut TickContext<'_>);

    /// A scheduled event came due (`at_ms` is when it was due, not when it ran)
    fn on_event(&mut self, _event: SessionEvent, _at_ms: f64, _ctx: &mut TickContext<'_>) {}

    /// Running score, never negative
    fn score(&self) -> u32;

    /// Short label of the current phase, for logs and the HUD
    fn phase_name(&self) -> &'static str {
        "running"
    }
}

/// One of the seven games
#[derive(Debug, Clone)]
pub enum Variant {
    PulseLink(PulseLink),
    HeatBloom(HeatBloom),
    TensionLine(TensionLine),
    EchoOrb(EchoOrb),
    PressureCraft(PressureCraft),
    AscendLight(AscendLight),
    Heartbeat(Heartbeat),
}

macro_rules! each_variant {
    ($self:expr, $game:ident => $body:expr) => {
        match $self {
            Variant::PulseLink($game) => $body,
            Variant::HeatBloom($game) => $body,
            Variant::TensionLine($game) => $body,
            Variant::EchoOrb($game) => $body,
            Variant::PressureCraft($game) => $body,
            Variant::AscendLight($game) => $body,
            Variant::Heartbeat($game) => $body,
        }
    };
}

impl Variant {
    /// Start a fresh game of the given kind
    pub fn start(key: GameKey, tuning: &Tuning, ctx: &mut TickContext<'_>) -> Self {
        match key {
            GameKey::PulseLink => Variant::PulseLink(PulseLink::start(tuning.pulse_link, ctx)),
            GameKey::HeatBloom => Variant::HeatBloom(HeatBloom::start(tuning.heat_bloom, ctx)),
            GameKey::TensionLine => {
                Variant::TensionLine(TensionLine::start(tuning.tension_line, ctx))
            }
            GameKey::EchoOrb => Variant::EchoOrb(EchoOrb::start(tuning.echo_orb, ctx)),
            GameKey::PressureCraft => {
                Variant::PressureCraft(PressureCraft::start(tuning.pressure_craft, ctx))
            }
            GameKey::AscendLight => {
                Variant::AscendLight(AscendLight::start(tuning.ascend_light, ctx))
            }
            GameKey::Heartbeat => Variant::Heartbeat(Heartbeat::start(tuning.heartbeat)),
        }
    }

    pub fn key(&self) -> GameKey {
        match self {
            Variant::PulseLink(_) => GameKey::PulseLink,
            Variant::HeatBloom(_) => GameKey::HeatBloom,
            Variant::TensionLine(_) => GameKey::TensionLine,
            Variant::EchoOrb(_) => GameKey::EchoOrb,
            Variant::PressureCraft(_) => GameKey::PressureCraft,
            Variant::AscendLight(_) => GameKey::AscendLight,
            Variant::Heartbeat(_) => GameKey::Heartbeat,
        }
    }
}

impl Simulation for Variant {
    fn update(&mut self, dt: f32, input: &FrameInput, ctx: &mut TickContext<'_>) {
        each_variant!(self, game => game.update(dt, input, ctx))
    }

    fn on_event(&mut self, event: SessionEvent, at_ms: f64, ctx: &mut TickContext<'_>) {
        each_variant!(self, game => game.on_event(event, at_ms, ctx))
    }

    fn score(&self) -> u32 {
        each_variant!(self, game => game.score())
    }

    fn phase_name(&self) -> &'static str {
        each_variant!(self, game => game.phase_name())
    }
}

/// Uniform sample from an inclusive range given as (low, high).
///
/// Tolerates reversed or degenerate ranges from hand-edited tuning.
pub(crate) fn sample_f32(rng: &mut Pcg32, (a, b): (f32, f32)) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if !(lo.is_finite() && hi.is_finite()) || lo == hi {
        return if lo.is_finite() { lo } else { 0.0 };
    }
    rng.random_range(lo..=hi)
}

/// f64 flavor of [`sample_f32`]
pub(crate) fn sample_f64(rng: &mut Pcg32, (a, b): (f64, f64)) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if !(lo.is_finite() && hi.is_finite()) || lo == hi {
        return if lo.is_finite() { lo } else { 0.0 };
    }
    rng.random_range(lo..=hi)
}
