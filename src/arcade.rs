//! Single-session host
//!
//! The arcade owns the frame clock, the input buffer, the feedback dispatcher
//! and the player's progression, and runs at most one game at a time. Hosts
//! forward pointer callbacks and animation frames to it and read the live
//! score back out.

use crate::feedback::FeedbackDispatcher;
use crate::games::GameKey;
use crate::platform::KeyValueStore;
use crate::progression::ProgressionStore;
use crate::session::{GameSession, Settled};
use crate::settings::Settings;
use crate::sim::{FrameClock, InputEventSource};
use crate::tuning::Tuning;

#[derive(Debug)]
pub struct Arcade<S: KeyValueStore> {
    clock: FrameClock,
    input: InputEventSource,
    feedback: FeedbackDispatcher,
    progression: ProgressionStore<S>,
    settings: Settings,
    tuning: Tuning,
    session: Option<GameSession>,
    focused: bool,
}

impl<S: KeyValueStore> Arcade<S> {
    /// Load settings and progression from `store` and get ready to play
    pub fn new(store: S, tuning: Tuning, mut feedback: FeedbackDispatcher) -> Self {
        let settings = Settings::load(&store);
        feedback.apply_settings(&settings);
        let progression = ProgressionStore::load(store);
        Self {
            clock: FrameClock::default(),
            input: InputEventSource::new(),
            feedback,
            progression,
            settings,
            tuning,
            session: None,
            focused: true,
        }
    }

    /// Start `key`, settling whatever was running before
    pub fn enter(&mut self, key: GameKey, seed: u64, now_ms: f64) -> Option<Settled> {
        let previous = self.exit();
        self.clock.reset();
        self.clock.tick(now_ms);
        self.session = Some(GameSession::start(
            key,
            &self.tuning,
            seed,
            now_ms,
            &mut self.feedback,
        ));
        previous
    }

    /// Leave the current game and pay it out
    pub fn exit(&mut self) -> Option<Settled> {
        let session = self.session.take()?;
        self.input.reset();
        Some(session.settle(&mut self.progression))
    }

    /// Advance one animation frame
    pub fn frame(&mut self, now_ms: f64) {
        let dt = self.clock.tick(now_ms);
        let input = self.input.drain();
        if let Some(session) = self.session.as_mut() {
            session.tick(now_ms, dt, &input, &mut self.feedback);
        }
    }

    pub fn press_start(&mut self, at_ms: f64) {
        self.input.press_start(at_ms);
    }

    pub fn press_end(&mut self, at_ms: f64) {
        self.input.press_end(at_ms);
    }

    pub fn press_cancel(&mut self, at_ms: f64) {
        self.input.press_cancel(at_ms);
    }

    pub fn active_game(&self) -> Option<GameKey> {
        self.session.as_ref().map(GameSession::key)
    }

    pub fn live_score(&self) -> Option<u32> {
        self.session.as_ref().map(GameSession::score)
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn progression(&self) -> &ProgressionStore<S> {
        &self.progression
    }

    pub fn progression_mut(&mut self) -> &mut ProgressionStore<S> {
        &mut self.progression
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace, apply and save the player's settings
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.apply_mute();
        self.settings.save(self.progression.store_mut());
    }

    /// Page focus changed at `at_ms`; honors `mute_on_blur`.
    ///
    /// Losing focus cancels a held press, so its release is still judged on
    /// the next frame. Edges already buffered are kept.
    pub fn set_focused(&mut self, focused: bool, at_ms: f64) {
        self.focused = focused;
        self.apply_mute();
        if !focused {
            self.input.press_cancel(at_ms);
        }
    }

    fn apply_mute(&mut self) {
        self.feedback.apply_settings(&self.settings);
        if !self.focused && self.settings.mute_on_blur {
            self.feedback.set_muted(true);
        }
    }
}
