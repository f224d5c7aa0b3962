//! Tension Line: release at the target length
//!
//! Holding pays out line, releasing reels it back in. The round is judged on
//! release by how far the line is from the target.

use super::{Simulation, TickContext, sample_f32};
use crate::feedback::Cue;
use crate::sim::FrameInput;
use crate::sim::scoring::{accuracy_from_error, points_from_accuracy};
use crate::tuning::TensionLineTuning;

#[derive(Debug, Clone)]
pub struct TensionLine {
    tuning: TensionLineTuning,
    len: f32,
    target: f32,
    rounds: u32,
    score: u32,
}

impl TensionLine {
    pub fn start(tuning: TensionLineTuning, ctx: &mut TickContext<'_>) -> Self {
        let target = sample_f32(ctx.rng, tuning.target_range);
        Self::with_target(tuning, target)
    }

    pub fn with_target(tuning: TensionLineTuning, target: f32) -> Self {
        Self {
            tuning,
            len: 0.0,
            target,
            rounds: 0,
            score: 0,
        }
    }

    pub fn length(&self) -> f32 {
        self.len
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Judge the line against the target and draw the next target
    fn release(&mut self, ctx: &mut TickContext<'_>) -> u32 {
        let err = (self.len - self.target).abs();
        let accuracy = accuracy_from_error(f64::from(err), f64::from(self.tuning.tolerance));
        let points = points_from_accuracy(accuracy, self.tuning.max_points);
        self.score = self.score.saturating_add(points);
        self.rounds += 1;

        ctx.feedback.cue(if err < self.tuning.success_error {
            Cue::Success
        } else {
            Cue::Failure
        });
        log::debug!(
            "Release len={:.3} target={:.3} points={}",
            self.len,
            self.target,
            points
        );

        self.target = sample_f32(ctx.rng, self.tuning.target_range);
        points
    }
}

impl Simulation for TensionLine {
    fn update(&mut self, dt: f32, input: &FrameInput, ctx: &mut TickContext<'_>) {
        for _ in input.ends() {
            self.release(ctx);
        }

        let delta = if input.held {
            self.tuning.rise
        } else {
            -self.tuning.fall
        };
        self.len = (self.len + delta * dt).clamp(0.0, 1.0);
    }

    fn score(&self) -> u32 {
        self.score
    }
}
