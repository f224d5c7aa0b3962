//! Ascend Light: ride the updrafts
//!
//! The orb sits at a fixed x and falls under gravity; holding thrusts it up.
//! Updrafts scroll past from the right and lift the orb when it is inside
//! them. Riding close to an updraft's center scores one point per frame.
//! Touching the top or bottom of the world crashes the orb for good. The score
//! is kept and paid out when the player leaves.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::{Simulation, TickContext, sample_f32};
use crate::feedback::Cue;
use crate::sim::FrameInput;
use crate::tuning::AscendLightTuning;

/// A circular lift zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Updraft {
    pub center: Vec2,
    pub radius: f32,
}

impl Updraft {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// 1 at the center, 0 at the rim and beyond
    pub fn closeness(&self, point: Vec2) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        (1.0 - point.distance(self.center) / self.radius).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct AscendLight {
    tuning: AscendLightTuning,
    y: f32,
    vy: f32,
    crashed: bool,
    updrafts: Vec<Updraft>,
    score: u32,
}

impl AscendLight {
    pub fn start(tuning: AscendLightTuning, ctx: &mut TickContext<'_>) -> Self {
        let count = tuning.updraft_count.max(1);
        let spacing = (tuning.world_width + 2.0 * tuning.updraft_radius) / count as f32;
        let updrafts = (0..count)
            .map(|i| {
                let x = tuning.orb_x + tuning.updraft_radius + spacing * i as f32;
                Updraft::new(
                    Vec2::new(x, random_height(ctx.rng, &tuning)),
                    tuning.updraft_radius,
                )
            })
            .collect();
        Self::with_updrafts(tuning, tuning.world_height / 2.0, updrafts)
    }

    /// Start at height `y` at rest with the given updrafts
    pub fn with_updrafts(tuning: AscendLightTuning, y: f32, updrafts: Vec<Updraft>) -> Self {
        Self {
            tuning,
            y,
            vy: 0.0,
            crashed: false,
            updrafts,
            score: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.tuning.orb_x, self.y)
    }

    pub fn velocity(&self) -> f32 {
        self.vy
    }

    pub fn is_crashed(&self) -> bool {
        self.crashed
    }

    pub fn updrafts(&self) -> &[Updraft] {
        &self.updrafts
    }

    /// Best closeness over all updrafts at the orb's position
    fn closeness(&self) -> f32 {
        let orb = self.position();
        self.updrafts
            .iter()
            .map(|u| u.closeness(orb))
            .fold(0.0, f32::max)
    }

    fn scroll(&mut self, dt: f32, rng: &mut Pcg32) {
        let t = &self.tuning;
        for updraft in &mut self.updrafts {
            updraft.center.x -= t.scroll_speed * dt;
            if updraft.center.x + updraft.radius < 0.0 {
                updraft.center.x = t.world_width + updraft.radius;
                updraft.center.y = random_height(rng, t);
            }
        }
    }

    fn fly(&mut self, dt: f32, held: bool, ctx: &mut TickContext<'_>) {
        let t = self.tuning;
        let orb = self.position();
        let lift: f32 = self
            .updrafts
            .iter()
            .map(|u| t.updraft_force * u.closeness(orb))
            .sum();
        let thrust = if held { t.thrust } else { 0.0 };
        self.vy += (thrust + lift - t.gravity) * dt;
        self.y += self.vy * dt;

        if self.y <= t.margin || self.y >= t.world_height - t.margin {
            self.crashed = true;
            self.vy = self.vy.min(0.0);
            ctx.feedback.cue(Cue::Failure);
            log::info!("Ascend Light crashed with {} points banked", self.score);
            return;
        }

        if self.closeness() > t.score_closeness {
            self.score = self.score.saturating_add(1);
        }
    }

    /// After a crash the orb just sinks to the floor
    fn sink(&mut self, dt: f32) {
        self.vy -= self.tuning.crash_gravity * dt;
        self.y += self.vy * dt;
        if self.y <= 0.0 {
            self.y = 0.0;
            self.vy = 0.0;
        }
    }
}

/// Updraft centers stay clear of the crash margins
fn random_height(rng: &mut Pcg32, t: &AscendLightTuning) -> f32 {
    let lo = t.margin + t.updraft_radius;
    let hi = t.world_height - t.margin - t.updraft_radius;
    sample_f32(rng, (lo, hi.max(lo)))
}

impl Simulation for AscendLight {
    fn update(&mut self, dt: f32, input: &FrameInput, ctx: &mut TickContext<'_>) {
        self.scroll(dt, ctx.rng);
        if self.crashed {
            self.sink(dt);
        } else {
            self.fly(dt, input.held, ctx);
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn phase_name(&self) -> &'static str {
        if self.crashed { "crashed" } else { "flying" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::harness::Harness;

    fn still_air() -> AscendLightTuning {
        AscendLightTuning {
            scroll_speed: 0.0,
            ..AscendLightTuning::default()
        }
    }

    #[test]
    fn test_falls_under_gravity() {
        let mut h = Harness::new(4);
        let mut game = AscendLight::with_updrafts(still_air(), 300.0, Vec::new());
        for _ in 0..50 {
            h.hold(&mut game, 10.0, false);
        }
        assert!((game.velocity() + 80.0).abs() < 1e-3);
        assert!(game.position().y < 300.0);
        assert!(!game.is_crashed());
    }

    #[test]
    fn test_thrust_beats_gravity() {
        let mut h = Harness::new(4);
        let mut game = AscendLight::with_updrafts(still_air(), 300.0, Vec::new());
        for _ in 0..50 {
            h.hold(&mut game, 10.0, true);
        }
        // 360 - 160 = 200 u/s^2 for half a second
        assert!((game.velocity() - 100.0).abs() < 1e-3);
        assert!(game.position().y > 300.0);
    }

    #[test]
    fn test_crash_at_floor_is_terminal() {
        let mut h = Harness::new(4);
        let mut game = AscendLight::with_updrafts(still_air(), 40.0, Vec::new());
        let mut frames = 0;
        while !game.is_crashed() {
            h.hold(&mut game, 10.0, false);
            frames += 1;
            assert!(frames < 500);
        }
        assert_eq!(game.phase_name(), "crashed");
        assert_eq!(h.take_cues(), vec![Cue::Failure]);

        // Thrust no longer helps and no further failure cues play
        for _ in 0..300 {
            h.hold(&mut game, 10.0, true);
        }
        assert!(game.is_crashed());
        assert!(h.cues.is_empty());
        assert_eq!(game.position().y, 0.0);
    }

    #[test]
    fn test_crash_at_ceiling() {
        let mut h = Harness::new(4);
        let mut game = AscendLight::with_updrafts(still_air(), 560.0, Vec::new());
        for _ in 0..100 {
            h.hold(&mut game, 10.0, true);
        }
        assert!(game.is_crashed());
    }

    #[test]
    fn test_scores_near_updraft_center() {
        let mut h = Harness::new(4);
        let center = Updraft::new(Vec2::new(240.0, 300.0), 70.0);
        let mut game = AscendLight::with_updrafts(still_air(), 300.0, vec![center]);
        for _ in 0..5 {
            h.hold(&mut game, 10.0, false);
        }
        assert_eq!(game.score(), 5);
        // Lifted: 420 at the center outweighs gravity
        assert!(game.velocity() > 0.0);
    }

    #[test]
    fn test_rim_of_updraft_lifts_without_scoring() {
        let mut h = Harness::new(4);
        // Orb 50 units below the center: closeness ~0.29
        let rim = Updraft::new(Vec2::new(240.0, 350.0), 70.0);
        let mut game = AscendLight::with_updrafts(still_air(), 300.0, vec![rim]);
        h.hold(&mut game, 10.0, false);
        assert_eq!(game.score(), 0);
        // Lift of ~120 partly cancels gravity
        assert!(game.velocity() > -1.6 && game.velocity() < 0.0);
    }

    #[test]
    fn test_no_scoring_after_crash() {
        let mut h = Harness::new(4);
        let center = Updraft::new(Vec2::new(240.0, 300.0), 70.0);
        let mut game = AscendLight::with_updrafts(still_air(), 300.0, vec![center]);
        for _ in 0..3 {
            h.hold(&mut game, 10.0, false);
        }
        game.crashed = true;
        let banked = game.score();
        for _ in 0..20 {
            h.hold(&mut game, 10.0, false);
        }
        assert_eq!(game.score(), banked);
        assert_eq!(banked, 3);
    }

    #[test]
    fn test_updrafts_scroll_and_wrap() {
        let mut h = Harness::new(4);
        let tuning = AscendLightTuning::default();
        let u = Updraft::new(Vec2::new(100.0, 300.0), 70.0);
        let mut game = AscendLight::with_updrafts(tuning, 300.0, vec![u]);
        h.hold(&mut game, 100.0, true);
        assert!((game.updrafts()[0].center.x - 91.0).abs() < 1e-3);

        // 100 + 70 units to go at 90 u/s is just under 2 seconds
        for _ in 0..20 {
            h.hold(&mut game, 100.0, false);
        }
        let wrapped = game.updrafts()[0];
        assert!(wrapped.center.x > 700.0);
        assert!((82.0..=518.0).contains(&wrapped.center.y));
    }

    #[test]
    fn test_start_spreads_updrafts() {
        let mut h = Harness::new(11);
        let mut ctx = h.ctx();
        let game = AscendLight::start(AscendLightTuning::default(), &mut ctx);
        assert_eq!(game.updrafts().len(), 3);
        assert_eq!(game.position(), Vec2::new(240.0, 300.0));
        for u in game.updrafts() {
            assert!((82.0..=518.0).contains(&u.center.y));
        }
    }
}
