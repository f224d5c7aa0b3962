//! Tone playback using the Web Audio API
//!
//! Every cue is a short procedurally generated blip: one oscillator through a
//! gain envelope. No sample files.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::feedback::{FeedbackError, Tone, ToneBackend};

/// Lowest gain an exponential ramp may target
const SILENT_GAIN: f32 = 0.001;

/// [`ToneBackend`] over a browser `AudioContext`
pub struct WebAudioTones {
    ctx: Option<AudioContext>,
}

impl Default for WebAudioTones {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudioTones {
    pub fn new() -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - tones disabled");
        }
        Self { ctx }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Low tones get a triangle so they still cut through on phone speakers
    fn wave_for(freq: f32) -> OscillatorType {
        if freq < 300.0 {
            OscillatorType::Triangle
        } else {
            OscillatorType::Sine
        }
    }
}

impl ToneBackend for WebAudioTones {
    fn play_tone(&mut self, tone: &Tone) -> Result<(), FeedbackError> {
        let ctx = self.ctx.as_ref().ok_or(FeedbackError::Unavailable("tone"))?;

        // Browsers start contexts suspended until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let (osc, gain) = Self::create_osc(ctx, tone.frequency_hz, Self::wave_for(tone.frequency_hz))
            .ok_or_else(|| FeedbackError::Rejected("could not build oscillator".into()))?;
        let t = ctx.current_time();
        let end = t + f64::from(tone.duration_s.max(0.01));

        gain.gain()
            .set_value_at_time(tone.gain.max(SILENT_GAIN), t)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(SILENT_GAIN, end)
            .ok();

        osc.start()
            .map_err(|e| FeedbackError::Rejected(format!("{:?}", e)))?;
        osc.stop_with_when(end + 0.02)
            .map_err(|e| FeedbackError::Rejected(format!("{:?}", e)))?;
        Ok(())
    }
}
