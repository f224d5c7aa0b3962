//! Pulse Arcade entry point
//!
//! On the web this wires pointer, keyboard and focus events plus the
//! animation-frame loop to an [`Arcade`](pulse_arcade::Arcade). Natively it
//! runs a scripted headless session of every game.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, EventTarget, KeyboardEvent, PointerEvent};

    use pulse_arcade::audio::WebAudioTones;
    use pulse_arcade::platform::{LocalStore, VibrationBackend};
    use pulse_arcade::{Arcade, FeedbackDispatcher, GameKey, Tuning};

    type Shared = Rc<RefCell<Host>>;

    /// Arcade plus what the page shows of it
    struct Host {
        arcade: Arcade<LocalStore>,
        shown_score: Option<u32>,
        document: Document,
    }

    impl Host {
        fn enter(&mut self, key: GameKey, now_ms: f64) {
            let seed = js_sys::Date::now() as u64 ^ (key as u64).rotate_left(32);
            if let Some(settled) = self.arcade.enter(key, seed, now_ms) {
                log::info!("{} paid {} tokens", settled.key, settled.tokens);
            }
            self.set_text("game", key.title());
            self.update_tokens();
        }

        fn exit(&mut self) {
            if let Some(settled) = self.arcade.exit() {
                log::info!("{} paid {} tokens", settled.key, settled.tokens);
            }
            self.set_text("game", "");
            self.update_tokens();
        }

        fn frame(&mut self, now_ms: f64) {
            self.arcade.frame(now_ms);
            let score = self.arcade.live_score();
            if score != self.shown_score {
                self.shown_score = score;
                let text = score.map(|s| s.to_string()).unwrap_or_default();
                self.set_text("score", &text);
            }
        }

        fn update_tokens(&self) {
            let tokens = self.arcade.progression().tokens();
            self.set_text("tokens", &tokens.to_string());
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Pulse Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let feedback =
            FeedbackDispatcher::new(Box::new(WebAudioTones::new()), Box::new(VibrationBackend));
        let host = Rc::new(RefCell::new(Host {
            arcade: Arcade::new(LocalStore, Tuning::default(), feedback),
            shown_score: None,
            document: document.clone(),
        }));
        host.borrow().update_tokens();

        // Presses go to the play area if the page has one
        let target: EventTarget = match document.get_element_by_id("stage") {
            Some(stage) => stage.into(),
            None => document.clone().into(),
        };
        setup_pointer(&target, host.clone());
        setup_keyboard(&document, host.clone());
        setup_focus(&window, &document, host.clone());

        request_animation_frame(host);
        Ok(())
    }

    fn listen<E: FromWasmAbi + 'static>(
        target: &EventTarget,
        kind: &str,
        handler: impl FnMut(E) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_pointer(target: &EventTarget, host: Shared) {
        {
            let host = host.clone();
            listen(target, "pointerdown", move |event: PointerEvent| {
                if !event.is_primary() {
                    return;
                }
                event.prevent_default();
                host.borrow_mut().arcade.press_start(event.time_stamp());
            });
        }
        {
            let host = host.clone();
            listen(target, "pointerup", move |event: PointerEvent| {
                if event.is_primary() {
                    host.borrow_mut().arcade.press_end(event.time_stamp());
                }
            });
        }
        for kind in ["pointercancel", "pointerleave"] {
            let host = host.clone();
            listen(target, kind, move |event: PointerEvent| {
                if event.is_primary() {
                    host.borrow_mut().arcade.press_cancel(event.time_stamp());
                }
            });
        }
    }

    fn setup_keyboard(document: &Document, host: Shared) {
        {
            let host = host.clone();
            listen(document, "keydown", move |event: KeyboardEvent| {
                let now = event.time_stamp();
                let mut h = host.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        if !event.repeat() {
                            h.arcade.press_start(now);
                        }
                    }
                    "Escape" => h.exit(),
                    key => {
                        let picked = key
                            .parse::<usize>()
                            .ok()
                            .and_then(|n| n.checked_sub(1))
                            .and_then(|i| GameKey::ALL.get(i).copied());
                        if let Some(game) = picked {
                            h.enter(game, now);
                        }
                    }
                }
            });
        }
        listen(document, "keyup", move |event: KeyboardEvent| {
            if event.key() == " " {
                host.borrow_mut().arcade.press_end(event.time_stamp());
            }
        });
    }

    fn setup_focus(window: &web_sys::Window, document: &Document, host: Shared) {
        // Visibility change (tab switch, minimize)
        {
            let host = host.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", move |event: web_sys::Event| {
                let visible = document_clone.visibility_state() == web_sys::VisibilityState::Visible;
                host.borrow_mut().arcade.set_focused(visible, event.time_stamp());
            });
        }
        {
            let host = host.clone();
            listen(window, "blur", move |event: web_sys::Event| {
                host.borrow_mut().arcade.set_focused(false, event.time_stamp());
            });
        }
        listen(window, "focus", move |event: web_sys::Event| {
            host.borrow_mut().arcade.set_focused(true, event.time_stamp());
        });
    }

    fn request_animation_frame(host: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            host.borrow_mut().frame(time);
            request_animation_frame(host);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pulse Arcade (native) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => pulse_arcade::Tuning::default(),
    };
    demo::run(tuning);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> pulse_arcade::Tuning {
    match std::fs::read_to_string(path) {
        Ok(json) => {
            log::info!("Loading tuning from {}", path);
            pulse_arcade::Tuning::from_json_or_default(&json)
        }
        Err(e) => {
            log::warn!("Cannot read tuning {}: {}, using defaults", path, e);
            pulse_arcade::Tuning::default()
        }
    }
}

/// Headless run of every game with a fixed press rhythm per game
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use pulse_arcade::consts::DEMO_FRAME_MS;
    use pulse_arcade::platform::MemoryStore;
    use pulse_arcade::{Arcade, FeedbackDispatcher, GameKey, Tuning};

    /// Seconds of play per game
    const DEMO_SECONDS: f64 = 20.0;

    /// (held ms, cycle ms): the press is down for the first part of each cycle
    fn rhythm(key: GameKey) -> (f64, f64) {
        match key {
            GameKey::PulseLink => (120.0, 700.0),
            GameKey::HeatBloom => (550.0, 1000.0),
            GameKey::TensionLine => (1200.0, 2000.0),
            GameKey::EchoOrb => (100.0, 900.0),
            GameKey::PressureCraft => (700.0, 1200.0),
            GameKey::AscendLight => (450.0, 1000.0),
            GameKey::Heartbeat => (100.0, 750.0),
        }
    }

    pub fn run(tuning: Tuning) {
        let mut arcade = Arcade::new(MemoryStore::new(), tuning, FeedbackDispatcher::silent());
        let mut now = 0.0;

        for (i, key) in GameKey::ALL.into_iter().enumerate() {
            arcade.enter(key, 0x5eed + i as u64, now);
            let (hold_ms, cycle_ms) = rhythm(key);
            let started = now;
            let mut held = false;

            while now - started < DEMO_SECONDS * 1000.0 {
                now += DEMO_FRAME_MS;
                let want = (now - started) % cycle_ms < hold_ms;
                if want != held {
                    if want {
                        arcade.press_start(now);
                    } else {
                        arcade.press_end(now);
                    }
                    held = want;
                }
                arcade.frame(now);
            }

            let phase = arcade
                .session()
                .map(|s| s.phase_name())
                .unwrap_or("none");
            if let Some(settled) = arcade.exit() {
                println!(
                    "{:<15} score {:>5}  tokens {:>3}  (ended in {})",
                    key.title(),
                    settled.score,
                    settled.tokens,
                    phase
                );
            }
        }

        let progression = arcade.progression();
        println!("Token balance: {}", progression.tokens());
        for key in GameKey::ALL {
            log::info!("Best {}: {}", key, progression.best(key));
        }
    }
}
