//! Vibration via `navigator.vibrate`

use wasm_bindgen::JsValue;

use crate::feedback::{FeedbackError, HapticBackend, HapticPattern};

/// Haptic backend for browsers that expose the Vibration API
#[derive(Debug, Default, Clone, Copy)]
pub struct VibrationBackend;

impl HapticBackend for VibrationBackend {
    fn vibrate(&mut self, pattern: &HapticPattern) -> Result<(), FeedbackError> {
        let navigator = web_sys::window()
            .ok_or(FeedbackError::Unavailable("haptic"))?
            .navigator();

        let accepted = match pattern {
            HapticPattern::Pulse(ms) => navigator.vibrate_with_duration(*ms),
            HapticPattern::Sequence(steps) => {
                let array = js_sys::Array::new();
                for ms in steps {
                    array.push(&JsValue::from(*ms));
                }
                navigator.vibrate_with_pattern(&array)
            }
        };

        if accepted {
            Ok(())
        } else {
            Err(FeedbackError::Rejected("vibrate() returned false".into()))
        }
    }
}
