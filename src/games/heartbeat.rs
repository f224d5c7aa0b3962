//! Heartbeat: tap your own tempo, then stay on it
//!
//! calibrate -> sync. The player taps a steady rhythm; once enough taps are in,
//! their mean spacing sets a pulse. From then on presses are scored against
//! that pulse.

use super::{SessionEvent, Simulation, TickContext};
use crate::feedback::Cue;
use crate::sim::FrameInput;
use crate::sim::scoring::{accuracy_from_error, beat_interval_ms, cyclic_error, points_from_accuracy};
use crate::tuning::HeartbeatTuning;

#[derive(Debug, Clone, PartialEq)]
pub enum HeartbeatPhase {
    /// Collecting tap times (ms)
    Calibrate { taps: Vec<f64> },
    /// Pulsing at the calibrated tempo. `origin_ms` is the phase reference.
    Sync {
        bpm: f64,
        interval_ms: f64,
        origin_ms: f64,
    },
}

#[derive(Debug, Clone)]
pub struct Heartbeat {
    tuning: HeartbeatTuning,
    phase: HeartbeatPhase,
    pulses: u64,
    score: u32,
}

impl Heartbeat {
    pub fn start(tuning: HeartbeatTuning) -> Self {
        Self {
            tuning,
            phase: HeartbeatPhase::Calibrate { taps: Vec::new() },
            pulses: 0,
            score: 0,
        }
    }

    pub fn phase(&self) -> &HeartbeatPhase {
        &self.phase
    }

    /// Calibrated tempo, once in sync
    pub fn bpm(&self) -> Option<f64> {
        match self.phase {
            HeartbeatPhase::Sync { bpm, .. } => Some(bpm),
            HeartbeatPhase::Calibrate { .. } => None,
        }
    }

    pub fn pulses(&self) -> u64 {
        self.pulses
    }

    /// Tempo from evenly spaced taps, clamped to the allowed range
    fn tempo_from_taps(&self, taps: &[f64]) -> f64 {
        let (lo, hi) = self.tuning.bpm_range;
        let (lo, hi) = (lo.min(hi).max(1.0), hi.max(lo).max(1.0));
        let (Some(first), Some(last)) = (taps.first(), taps.last()) else {
            return hi;
        };
        let mean = (last - first) / (taps.len().saturating_sub(1).max(1)) as f64;
        if mean <= 0.0 || !mean.is_finite() {
            return hi;
        }
        (60_000.0 / mean).clamp(lo, hi)
    }

    fn calibrate_tap(&mut self, at_ms: f64, ctx: &mut TickContext<'_>) {
        let HeartbeatPhase::Calibrate { taps } = &mut self.phase else {
            return;
        };
        taps.push(at_ms);
        ctx.feedback.cue(Cue::Tick);
        if taps.len() < self.tuning.calibration_taps.max(2) {
            return;
        }

        let taps = std::mem::take(taps);
        let bpm = self.tempo_from_taps(&taps);
        let interval_ms = beat_interval_ms(bpm);
        self.phase = HeartbeatPhase::Sync {
            bpm,
            interval_ms,
            origin_ms: at_ms,
        };
        ctx.scheduler
            .schedule(at_ms + interval_ms, SessionEvent::Pulse);
        log::info!("Heartbeat calibrated at {:.1} BPM from {} taps", bpm, taps.len());
    }

    fn sync_tap(&mut self, at_ms: f64, interval_ms: f64, origin_ms: f64, ctx: &mut TickContext<'_>) {
        let err = cyclic_error(at_ms - origin_ms, interval_ms);
        let accuracy = accuracy_from_error(err, interval_ms / 2.0);
        let points = points_from_accuracy(accuracy, self.tuning.max_points);
        self.score = self.score.saturating_add(points);
        ctx.feedback.cue(if points > self.tuning.success_above {
            Cue::Success
        } else {
            Cue::Failure
        });
        log::debug!("Heartbeat tap err={:.1}ms points={}", err, points);
    }
}

impl Simulation for Heartbeat {
    fn update(&mut self, _dt: f32, input: &FrameInput, ctx: &mut TickContext<'_>) {
        for at_ms in input.starts() {
            match self.phase {
                HeartbeatPhase::Calibrate { .. } => self.calibrate_tap(at_ms, ctx),
                HeartbeatPhase::Sync {
                    interval_ms,
                    origin_ms,
                    ..
                } => self.sync_tap(at_ms, interval_ms, origin_ms, ctx),
            }
        }
    }

    fn on_event(&mut self, event: SessionEvent, at_ms: f64, ctx: &mut TickContext<'_>) {
        let (SessionEvent::Pulse, HeartbeatPhase::Sync { interval_ms, .. }) = (event, &self.phase)
        else {
            return;
        };
        let interval_ms = *interval_ms;
        // Same catch-up as the metronome: one pulse for any run of missed ones
        let behind = ((ctx.now_ms - at_ms) / interval_ms).floor().max(0.0);
        let latest = at_ms + behind * interval_ms;
        self.pulses += 1 + behind as u64;
        ctx.feedback.cue(Cue::Tick);
        ctx.scheduler
            .schedule(latest + interval_ms, SessionEvent::Pulse);
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn phase_name(&self) -> &'static str {
        match self.phase {
            HeartbeatPhase::Calibrate { .. } => "calibrate",
            HeartbeatPhase::Sync { .. } => "sync",
        }
    }
}
