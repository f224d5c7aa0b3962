//! Shared accuracy and points conversion
//!
//! Every variant reduces its scoring to these two functions with its own
//! tolerance and point ceiling. Penalties are applied by the variants.

/// Accuracy in [0, 1] for an error against a tolerance.
///
/// 1 at zero error, 0 once the error reaches the tolerance. A non-positive
/// tolerance only accepts a perfect hit.
pub fn accuracy_from_error(err: f64, tolerance: f64) -> f64 {
    let err = err.abs();
    if tolerance <= 0.0 || !tolerance.is_finite() {
        return if err == 0.0 { 1.0 } else { 0.0 };
    }
    if !err.is_finite() {
        return 0.0;
    }
    1.0 - (err / tolerance).clamp(0.0, 1.0)
}

/// Points for an accuracy, rounded to the nearest integer
pub fn points_from_accuracy(accuracy: f64, max_points: u32) -> u32 {
    let accuracy = if accuracy.is_nan() {
        0.0
    } else {
        accuracy.clamp(0.0, 1.0)
    };
    (accuracy * f64::from(max_points)).round() as u32
}

/// Distance from `offset_ms` to the nearest multiple of `interval_ms`.
///
/// Used by the beat-matching games: with `d = |offset| mod interval` the error
/// is `min(d, interval - d)`, so early and late taps are treated alike.
pub fn cyclic_error(offset_ms: f64, interval_ms: f64) -> f64 {
    if interval_ms <= 0.0 || !interval_ms.is_finite() || !offset_ms.is_finite() {
        return 0.0;
    }
    let d = offset_ms.abs().rem_euclid(interval_ms);
    d.min(interval_ms - d)
}

/// Beat interval (ms) for a tempo, guarding against zero or negative BPM
pub fn beat_interval_ms(bpm: f64) -> f64 {
    60_000.0 / bpm.max(1.0)
}
