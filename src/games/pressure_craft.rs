//! Pressure Craft: release inside the moving zone
//!
//! Holding builds pressure, releasing bleeds it. A zone sweeps back and forth
//! across the gauge, faster with every level cleared.

use rand::Rng;

use super::{Simulation, TickContext};
use crate::feedback::Cue;
use crate::sim::FrameInput;
use crate::tuning::PressureCraftTuning;

#[derive(Debug, Clone)]
pub struct PressureCraft {
    tuning: PressureCraftTuning,
    fill: f32,
    /// Lower edge of the zone
    zone_start: f32,
    /// +1 moving up, -1 moving down
    zone_dir: f32,
    level: u32,
    score: u32,
}

impl PressureCraft {
    pub fn start(tuning: PressureCraftTuning, ctx: &mut TickContext<'_>) -> Self {
        let span = (1.0 - tuning.zone_width).max(0.0);
        let zone_start = ctx.rng.random::<f32>() * span;
        let zone_dir = if ctx.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Self::with_zone(tuning, zone_start, zone_dir)
    }

    pub fn with_zone(tuning: PressureCraftTuning, zone_start: f32, zone_dir: f32) -> Self {
        Self {
            tuning,
            fill: 0.0,
            zone_start,
            zone_dir: if zone_dir < 0.0 { -1.0 } else { 1.0 },
            level: 0,
            score: 0,
        }
    }

    pub fn fill(&self) -> f32 {
        self.fill
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current zone as (a, b)
    pub fn zone(&self) -> (f32, f32) {
        (self.zone_start, self.zone_start + self.zone_width())
    }

    /// Zone travel speed (units/s) at the current level
    pub fn zone_speed(&self) -> f32 {
        self.tuning.base_speed + self.tuning.speed_per_level * self.level as f32
    }

    fn zone_width(&self) -> f32 {
        self.tuning.zone_width.clamp(0.0, 1.0)
    }

    /// Sweep the zone, bouncing off both ends of the gauge
    fn move_zone(&mut self, dt: f32) {
        let top = 1.0 - self.zone_width();
        if top <= 0.0 {
            self.zone_start = 0.0;
            return;
        }
        let mut pos = self.zone_start + self.zone_dir * self.zone_speed() * dt;
        // Fold back until inside; more than one fold only with absurd speeds
        for _ in 0..8 {
            if pos < 0.0 {
                pos = -pos;
                self.zone_dir = 1.0;
            } else if pos > top {
                pos = 2.0 * top - pos;
                self.zone_dir = -1.0;
            } else {
                break;
            }
        }
        self.zone_start = pos.clamp(0.0, top);
    }

    fn release(&mut self, ctx: &mut TickContext<'_>) {
        let (a, b) = self.zone();
        if self.fill >= a && self.fill <= b {
            self.score = self.score.saturating_add(self.tuning.hit_points);
            self.level += 1;
            self.fill = self.tuning.fill_after_hit;
            ctx.feedback.cue(Cue::Success);
            log::debug!("Pressure hit, level {}", self.level);
        } else {
            self.score = self.score.saturating_sub(self.tuning.miss_penalty);
            self.fill = self.tuning.fill_after_miss;
            ctx.feedback.cue(Cue::Failure);
            log::debug!("Pressure miss at {:.3}, zone {:.3}-{:.3}", self.fill, a, b);
        }
    }
}

impl Simulation for PressureCraft {
    fn update(&mut self, dt: f32, input: &FrameInput, ctx: &mut TickContext<'_>) {
        self.move_zone(dt);

        for _ in input.ends() {
            self.release(ctx);
        }

        let delta = if input.held {
            self.tuning.fill_rise
        } else {
            -self.tuning.fill_fall
        };
        self.fill = (self.fill + delta * dt).clamp(0.0, 1.0);
    }

    fn score(&self) -> u32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::harness::Harness;

    /// Zone parked at 0.4-0.6
    fn parked() -> PressureCraft {
        let tuning = PressureCraftTuning {
            base_speed: 0.0,
            speed_per_level: 0.0,
            ..PressureCraftTuning::default()
        };
        PressureCraft::with_zone(tuning, 0.4, 1.0)
    }

    #[test]
    fn test_release_in_zone_levels_up() {
        let mut h = Harness::new(2);
        let mut game = parked();
        game.fill = 0.5;
        h.release(&mut game, 10.0);
        assert_eq!(game.score(), 12);
        assert_eq!(game.level(), 1);
        assert_eq!(h.cues, vec![Cue::Success]);
        // Reset to 0.15, then bled for one frame
        assert!((game.fill() - (0.15 - 0.008)).abs() < 1e-5);
    }

    #[test]
    fn test_release_outside_zone_penalized_and_floored() {
        let mut h = Harness::new(2);
        let mut game = parked();
        game.fill = 0.9;
        h.release(&mut game, 10.0);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 0);
        assert_eq!(h.cues, vec![Cue::Failure]);

        game.score = 10;
        game.fill = 0.1;
        h.release(&mut game, 10.0);
        assert_eq!(game.score(), 6);
    }

    #[test]
    fn test_level_never_decreases() {
        let mut h = Harness::new(2);
        let mut game = parked();
        game.fill = 0.5;
        h.release(&mut game, 10.0);
        game.fill = 0.95;
        h.release(&mut game, 10.0);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_hold_fills_at_rate() {
        let mut h = Harness::new(2);
        let mut game = parked();
        for _ in 0..50 {
            h.hold(&mut game, 10.0, true);
        }
        assert!((game.fill() - 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_zone_bounces_within_gauge() {
        let tuning = PressureCraftTuning::default();
        let mut game = PressureCraft::with_zone(tuning, 0.75, 1.0);
        let mut h = Harness::new(2);
        let mut saw_down = false;
        for _ in 0..400 {
            h.hold(&mut game, 16.0, false);
            let (a, b) = game.zone();
            assert!(a >= 0.0 && b <= 1.0 + 1e-6);
            saw_down |= game.zone_dir < 0.0;
        }
        assert!(saw_down);
    }

    #[test]
    fn test_zone_speeds_up_with_level() {
        let mut game = PressureCraft::with_zone(PressureCraftTuning::default(), 0.4, 1.0);
        let slow = game.zone_speed();
        game.level = 5;
        assert!(game.zone_speed() > slow);
        assert!((game.zone_speed() - (0.25 + 0.3)).abs() < 1e-6);
    }
}
