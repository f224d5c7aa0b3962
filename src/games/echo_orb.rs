//! Echo Orb: repeat the interval you just heard
//!
//! listen -> tap -> result -> listen. Two demo cues mark an interval, then the
//! player answers with two taps. The gap between the taps is compared to the
//! demonstrated interval.

use super::{SessionEvent, Simulation, TickContext, sample_f64};
use crate::feedback::Cue;
use crate::sim::FrameInput;
use crate::sim::scoring::{accuracy_from_error, points_from_accuracy};
use crate::tuning::EchoOrbTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EchoPhase {
    /// Demo cues playing
    Listen,
    /// Waiting for the two answering taps
    Tap {
        opened_ms: f64,
        first_ms: Option<f64>,
    },
    /// Showing the result of the last round
    Result { points: u32 },
}

#[derive(Debug, Clone)]
pub struct EchoOrb {
    tuning: EchoOrbTuning,
    phase: EchoPhase,
    interval_ms: f64,
    rounds: u32,
    score: u32,
}

impl EchoOrb {
    pub fn start(tuning: EchoOrbTuning, ctx: &mut TickContext<'_>) -> Self {
        let interval_ms = sample_f64(ctx.rng, tuning.interval_range_ms);
        Self::with_interval(tuning, interval_ms, ctx)
    }

    /// Start with a fixed first interval. Later rounds are random.
    pub fn with_interval(tuning: EchoOrbTuning, interval_ms: f64, ctx: &mut TickContext<'_>) -> Self {
        let mut game = Self {
            tuning,
            phase: EchoPhase::Listen,
            interval_ms,
            rounds: 0,
            score: 0,
        };
        game.listen(ctx.now_ms, ctx);
        game
    }

    pub fn phase(&self) -> EchoPhase {
        self.phase
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Queue the demo for the current interval starting from `from_ms`
    fn listen(&mut self, from_ms: f64, ctx: &mut TickContext<'_>) {
        self.phase = EchoPhase::Listen;
        let first = from_ms + self.tuning.lead_in_ms;
        let second = first + self.interval_ms;
        ctx.scheduler.schedule(first, SessionEvent::DemoCue);
        ctx.scheduler.schedule(second, SessionEvent::DemoCue);
        ctx.scheduler.schedule(second, SessionEvent::TapWindowOpen);
    }

    fn judge(&mut self, first_ms: f64, second_ms: f64, ctx: &mut TickContext<'_>) {
        let gap = second_ms - first_ms;
        let err = (gap - self.interval_ms).abs();
        let accuracy = accuracy_from_error(err, self.tuning.tolerance_ms);
        let points = points_from_accuracy(accuracy, self.tuning.max_points);
        self.score = self.score.saturating_add(points);
        self.rounds += 1;

        ctx.feedback.cue(if points > self.tuning.success_above {
            Cue::Success
        } else {
            Cue::Failure
        });
        log::debug!(
            "Echo gap={:.0}ms target={:.0}ms points={}",
            gap,
            self.interval_ms,
            points
        );

        self.phase = EchoPhase::Result { points };
        ctx.scheduler
            .schedule(second_ms + self.tuning.result_hold_ms, SessionEvent::ResultDone);
    }
}

impl Simulation for EchoOrb {
    fn update(&mut self, _dt: f32, input: &FrameInput, ctx: &mut TickContext<'_>) {
        for at_ms in input.starts() {
            let EchoPhase::Tap {
                opened_ms,
                first_ms,
            } = self.phase
            else {
                continue;
            };
            // A press captured before the window opened belongs to the demo
            if at_ms < opened_ms {
                continue;
            }
            match first_ms {
                None => {
                    self.phase = EchoPhase::Tap {
                        opened_ms,
                        first_ms: Some(at_ms),
                    };
                    ctx.feedback.cue(Cue::Tick);
                }
                Some(first) => self.judge(first, at_ms, ctx),
            }
        }
    }

    fn on_event(&mut self, event: SessionEvent, at_ms: f64, ctx: &mut TickContext<'_>) {
        match event {
            SessionEvent::DemoCue => ctx.feedback.cue(Cue::Demo),
            SessionEvent::TapWindowOpen => {
                self.phase = EchoPhase::Tap {
                    opened_ms: at_ms,
                    first_ms: None,
                };
            }
            SessionEvent::ResultDone => {
                self.interval_ms = sample_f64(ctx.rng, self.tuning.interval_range_ms);
                self.listen(at_ms, ctx);
            }
            _ => {}
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn phase_name(&self) -> &'static str {
        match self.phase {
            EchoPhase::Listen => "listen",
            EchoPhase::Tap { .. } => "tap",
            EchoPhase::Result { .. } => "result",
        }
    }
}
