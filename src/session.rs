//! One live game and everything it owns
//!
//! A session bundles the running variant with its event queue and its seeded
//! RNG. Dropping or settling the session takes its pending events with it, so
//! nothing queued by an old game can reach a new one.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::MAX_EVENTS_PER_TICK;
use crate::feedback::Feedback;
use crate::games::{GameKey, SessionEvent, Simulation, TickContext, Variant};
use crate::sim::{FrameInput, Scheduler};
use crate::tuning::{SettlementTuning, Tuning};

/// Where a finished session reports to
pub trait Settlement {
    /// Final score of the game the player just left
    fn on_exit(&mut self, key: GameKey, score: u32);
    /// Tokens earned by that score
    fn award(&mut self, tokens: u32);
}

/// Outcome of a settled session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub key: GameKey,
    pub score: u32,
    pub tokens: u32,
}

#[derive(Debug)]
pub struct GameSession {
    key: GameKey,
    variant: Variant,
    scheduler: Scheduler<SessionEvent>,
    rng: Pcg32,
    settlement: SettlementTuning,
    frames: u64,
}

impl GameSession {
    /// Start a fresh game of `key` at `now_ms`
    pub fn start(
        key: GameKey,
        tuning: &Tuning,
        seed: u64,
        now_ms: f64,
        feedback: &mut dyn Feedback,
    ) -> Self {
        Self::with_variant(seed, now_ms, tuning.settlement, feedback, |ctx| {
            Variant::start(key, tuning, ctx)
        })
    }

    /// Start a session around a variant built by `build`, which may queue its
    /// first events on the session's scheduler.
    pub fn with_variant(
        seed: u64,
        now_ms: f64,
        settlement: SettlementTuning,
        feedback: &mut dyn Feedback,
        build: impl FnOnce(&mut TickContext<'_>) -> Variant,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut scheduler = Scheduler::new();
        let variant = {
            let mut ctx = TickContext {
                now_ms,
                rng: &mut rng,
                scheduler: &mut scheduler,
                feedback,
            };
            build(&mut ctx)
        };
        let key = variant.key();
        log::info!("Entered {} (seed {})", key, seed);
        Self {
            key,
            variant,
            scheduler,
            rng,
            settlement,
            frames: 0,
        }
    }

    /// Run one frame: fire events that came due, then advance the game
    pub fn tick(&mut self, now_ms: f64, dt: f32, input: &FrameInput, feedback: &mut dyn Feedback) {
        self.frames += 1;

        let mut fired = 0;
        while fired < MAX_EVENTS_PER_TICK {
            let Some(due) = self.scheduler.pop_due(now_ms) else {
                break;
            };
            let mut ctx = TickContext {
                now_ms,
                rng: &mut self.rng,
                scheduler: &mut self.scheduler,
                feedback: &mut *feedback,
            };
            self.variant.on_event(due.event, due.at_ms, &mut ctx);
            fired += 1;
        }
        if fired == MAX_EVENTS_PER_TICK && self.scheduler.has_due(now_ms) {
            log::warn!(
                "{}: event cap hit, {} left for next frame",
                self.key,
                self.scheduler.len()
            );
        }

        let mut ctx = TickContext {
            now_ms,
            rng: &mut self.rng,
            scheduler: &mut self.scheduler,
            feedback,
        };
        self.variant.update(dt, input, &mut ctx);
    }

    pub fn key(&self) -> GameKey {
        self.key
    }

    pub fn score(&self) -> u32 {
        self.variant.score()
    }

    pub fn phase_name(&self) -> &'static str {
        self.variant.phase_name()
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// Close the session: cancel its events, report the score, pay out tokens
    pub fn settle(mut self, to: &mut impl Settlement) -> Settled {
        self.scheduler.teardown();
        let score = self.score();
        let tokens = self.settlement.tokens_for(score);
        to.on_exit(self.key, score);
        to.award(tokens);
        log::info!(
            "Left {} after {} frames: score {}, {} tokens",
            self.key,
            self.frames,
            score,
            tokens
        );
        Settled {
            key: self.key,
            score,
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Cue;
    use crate::games::PulseLink;
    use crate::sim::{InputEventSource, PressEdge};
    use crate::tuning::PulseLinkTuning;
    use proptest::prelude::*;

    /// Settlement that remembers every call
    #[derive(Default)]
    struct Ledger {
        exits: Vec<(GameKey, u32)>,
        awards: Vec<u32>,
    }

    impl Settlement for Ledger {
        fn on_exit(&mut self, key: GameKey, score: u32) {
            self.exits.push((key, score));
        }

        fn award(&mut self, tokens: u32) {
            self.awards.push(tokens);
        }
    }

    fn metronome(cues: &mut Vec<Cue>) -> GameSession {
        GameSession::with_variant(1, 0.0, SettlementTuning::default(), cues, |ctx| {
            Variant::PulseLink(PulseLink::with_bpm(PulseLinkTuning::default(), 60.0, ctx))
        })
    }

    #[test]
    fn test_every_game_starts_and_runs() {
        let tuning = Tuning::default();
        for key in GameKey::ALL {
            let mut cues = Vec::new();
            let mut session = GameSession::start(key, &tuning, 99, 0.0, &mut cues);
            assert_eq!(session.key(), key);
            for i in 1..=120 {
                session.tick(i as f64 * 16.0, 0.016, &FrameInput::holding(i % 30 < 15), &mut cues);
            }
            assert_eq!(session.frames(), 120);
            assert!(!session.phase_name().is_empty());
        }
    }

    #[test]
    fn test_on_beat_press_through_session() {
        let mut cues = Vec::new();
        let mut session = metronome(&mut cues);
        let input = FrameInput {
            held: true,
            edges: vec![PressEdge::start(1000.0)],
        };
        session.tick(1000.0, 0.016, &input, &mut cues);
        assert_eq!(session.score(), 10);
        // Beat fires before the press is judged
        assert_eq!(cues, vec![Cue::Tick, Cue::StrongSuccess]);
    }

    #[test]
    fn test_settle_reports_once_and_converts_tokens() {
        let mut cues = Vec::new();
        let mut session = metronome(&mut cues);
        for (i, t) in [1000.0, 2000.0, 3000.0].into_iter().enumerate() {
            let input = FrameInput {
                held: i % 2 == 0,
                edges: vec![PressEdge::start(t)],
            };
            session.tick(t, 0.016, &input, &mut cues);
        }
        assert_eq!(session.score(), 30);

        let mut ledger = Ledger::default();
        let settled = session.settle(&mut ledger);
        assert_eq!(
            settled,
            Settled {
                key: GameKey::PulseLink,
                score: 30,
                tokens: 3
            }
        );
        assert_eq!(ledger.exits, vec![(GameKey::PulseLink, 30)]);
        assert_eq!(ledger.awards, vec![3]);
    }

    #[test]
    fn test_settle_drops_pending_events() {
        let mut cues = Vec::new();
        let session = metronome(&mut cues);
        assert_eq!(session.pending_events(), 1);
        let mut ledger = Ledger::default();
        let settled = session.settle(&mut ledger);
        assert_eq!(settled.score, 0);
        assert_eq!(settled.tokens, 0);
        assert_eq!(ledger.awards, vec![0]);
    }

    #[test]
    fn test_same_seed_same_session() {
        let tuning = Tuning::default();
        let run = |seed: u64| {
            let mut cues = Vec::new();
            let mut session = GameSession::start(GameKey::EchoOrb, &tuning, seed, 0.0, &mut cues);
            let mut input = InputEventSource::new();
            for i in 1..=400u32 {
                let now = f64::from(i) * 16.0;
                if i % 37 == 0 {
                    input.press_start(now - 3.0);
                    input.press_end(now - 1.0);
                }
                let frame = input.drain();
                session.tick(now, 0.016, &frame, &mut cues);
            }
            (session.score(), cues)
        };
        assert_eq!(run(5), run(5));
    }

    proptest! {
        #[test]
        fn prop_random_play_settles_cleanly(
            game in 0usize..7,
            seed in any::<u64>(),
            script in proptest::collection::vec((1u32..120, any::<bool>()), 1..200),
        ) {
            let key = GameKey::ALL[game];
            let tuning = Tuning::default();
            let mut cues = Vec::new();
            let mut session = GameSession::start(key, &tuning, seed, 0.0, &mut cues);
            let mut input = InputEventSource::new();
            let mut now = 0.0;
            for (dt_ms, toggle) in script {
                now += f64::from(dt_ms);
                if toggle {
                    if input.is_held() {
                        input.press_end(now - 0.5);
                    } else {
                        input.press_start(now - 0.5);
                    }
                }
                let frame = input.drain();
                let dt = (f64::from(dt_ms) / 1000.0).min(0.1) as f32;
                session.tick(now, dt, &frame, &mut cues);
            }
            let score = session.score();
            let mut ledger = Ledger::default();
            let settled = session.settle(&mut ledger);
            prop_assert_eq!(settled.score, score);
            prop_assert_eq!(settled.tokens, score / 10);
            prop_assert_eq!(ledger.exits.len(), 1);
            prop_assert_eq!(ledger.awards.len(), 1);
        }
    }
}
