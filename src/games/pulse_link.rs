//! Pulse Link: tap on the beat
//!
//! A metronome runs at a tempo picked once per session. Each press is scored
//! by its distance to the nearest beat.

use super::{SessionEvent, Simulation, TickContext, sample_f64};
use crate::feedback::Cue;
use crate::sim::FrameInput;
use crate::sim::scoring::{accuracy_from_error, beat_interval_ms, cyclic_error, points_from_accuracy};
use crate::tuning::PulseLinkTuning;

#[derive(Debug, Clone)]
pub struct PulseLink {
    tuning: PulseLinkTuning,
    bpm: f64,
    interval_ms: f64,
    /// When the latest beat was due (ms)
    last_beat_ms: f64,
    beats: u64,
    taps: u32,
    score: u32,
}

impl PulseLink {
    /// Start at a random tempo from the tuning range
    pub fn start(tuning: PulseLinkTuning, ctx: &mut TickContext<'_>) -> Self {
        let bpm = sample_f64(ctx.rng, tuning.bpm_range);
        Self::with_bpm(tuning, bpm, ctx)
    }

    /// Start at a fixed tempo. The first beat lands one interval from now.
    pub fn with_bpm(tuning: PulseLinkTuning, bpm: f64, ctx: &mut TickContext<'_>) -> Self {
        let interval_ms = beat_interval_ms(bpm);
        ctx.scheduler
            .schedule(ctx.now_ms + interval_ms, SessionEvent::Beat);
        log::info!("Pulse Link at {:.1} BPM ({:.0}ms)", bpm, interval_ms);
        Self {
            tuning,
            bpm,
            interval_ms,
            last_beat_ms: ctx.now_ms,
            beats: 0,
            taps: 0,
            score: 0,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn last_beat_ms(&self) -> f64 {
        self.last_beat_ms
    }

    pub fn beats(&self) -> u64 {
        self.beats
    }

    /// Score one press and report it
    fn tap(&mut self, at_ms: f64, ctx: &mut TickContext<'_>) -> u32 {
        let err = cyclic_error(at_ms - self.last_beat_ms, self.interval_ms);
        let accuracy = accuracy_from_error(err, self.interval_ms / 2.0);
        let points = points_from_accuracy(accuracy, self.tuning.max_points);
        self.score = self.score.saturating_add(points);
        self.taps += 1;

        let cue = if points >= self.tuning.strong_points {
            Cue::StrongSuccess
        } else if points >= self.tuning.success_points {
            Cue::Success
        } else {
            Cue::Failure
        };
        ctx.feedback.cue(cue);
        log::debug!("Pulse tap err={:.1}ms points={}", err, points);
        points
    }
}

impl Simulation for PulseLink {
    fn update(&mut self, _dt: f32, input: &FrameInput, ctx: &mut TickContext<'_>) {
        for at_ms in input.starts() {
            self.tap(at_ms, ctx);
        }
    }

    fn on_event(&mut self, event: SessionEvent, at_ms: f64, ctx: &mut TickContext<'_>) {
        if event != SessionEvent::Beat {
            return;
        }
        // A stalled frame may have skipped several beats; land on the latest
        // one and play a single tick for it.
        let behind = ((ctx.now_ms - at_ms) / self.interval_ms).floor().max(0.0);
        self.last_beat_ms = at_ms + behind * self.interval_ms;
        self.beats += 1 + behind as u64;
        ctx.feedback.cue(Cue::Tick);
        ctx.scheduler
            .schedule(self.last_beat_ms + self.interval_ms, SessionEvent::Beat);
    }

    fn score(&self) -> u32 {
        self.score
    }
}
