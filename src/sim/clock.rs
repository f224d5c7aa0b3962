//! Frame clock
//!
//! Turns the host's per-frame timestamps (ms) into a clamped delta-time (s).
//! A backgrounded tab can hand us a multi-second gap; integrating that in one
//! step would blow up every physical quantity, so the delta is capped.

use crate::consts::MAX_FRAME_DT;

/// Monotonic simulation clock driven by host frame timestamps
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Timestamp of the latest tick (ms), None before the first tick
    last_ms: Option<f64>,
    /// Upper bound for a single delta (s)
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt: max_dt.max(0.0),
        }
    }

    /// Advance to `now_ms` and return the clamped delta in seconds.
    ///
    /// The first tick returns 0. A timestamp that goes backwards also yields 0
    /// and does not rewind the clock.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms > last => (((now_ms - last) / 1000.0) as f32).min(self.max_dt),
            Some(_) => 0.0,
            None => 0.0,
        };
        if self.last_ms.is_none_or(|last| now_ms > last) {
            self.last_ms = Some(now_ms);
        }
        dt
    }

    /// Timestamp of the latest tick (ms)
    pub fn now_ms(&self) -> f64 {
        self.last_ms.unwrap_or(0.0)
    }

    /// Forget the previous timestamp so the next tick starts fresh (dt = 0).
    ///
    /// Used when the host resumes after being hidden.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(5000.0), 0.0);
        assert_eq!(clock.now_ms(), 5000.0);
    }

    #[test]
    fn test_regular_frame_delta() {
        let mut clock = FrameClock::default();
        clock.tick(1000.0);
        let dt = clock.tick(1016.0);
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(clock.now_ms(), 1016.0);
    }

    #[test]
    fn test_spike_is_clamped() {
        let mut clock = FrameClock::default();
        clock.tick(0.0);
        // Tab was in the background for 30 seconds
        let dt = clock.tick(30_000.0);
        assert_eq!(dt, MAX_FRAME_DT);
    }

    #[test]
    fn test_backwards_timestamp_never_negative() {
        let mut clock = FrameClock::default();
        clock.tick(2000.0);
        assert_eq!(clock.tick(1500.0), 0.0);
        assert_eq!(clock.now_ms(), 2000.0);
        let dt = clock.tick(2010.0);
        assert!((dt - 0.010).abs() < 1e-6);
    }

    #[test]
    fn test_reset_restarts_delta() {
        let mut clock = FrameClock::default();
        clock.tick(100.0);
        clock.reset();
        assert_eq!(clock.tick(9000.0), 0.0);
    }
}
