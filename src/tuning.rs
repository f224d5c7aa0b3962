//! Data-driven game balance
//!
//! Every rate, band and point value the games use. `Tuning::default()` is the
//! shipped balance; a JSON document can override any subset of it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete balance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub pulse_link: PulseLinkTuning,
    pub heat_bloom: HeatBloomTuning,
    pub tension_line: TensionLineTuning,
    pub echo_orb: EchoOrbTuning,
    pub pressure_craft: PressureCraftTuning,
    pub ascend_light: AscendLightTuning,
    pub heartbeat: HeartbeatTuning,
    pub settlement: SettlementTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse overrides, keeping the defaults if the document is bad
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("{}; using default tuning", e);
            Self::default()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseLinkTuning {
    /// Tempo range, chosen once per session
    pub bpm_range: (f64, f64),
    pub max_points: u32,
    /// Points at or above this trigger the strong haptic
    pub strong_points: u32,
    /// Points at or above this count as a success
    pub success_points: u32,
}

impl Default for PulseLinkTuning {
    fn default() -> Self {
        Self {
            bpm_range: (72.0, 128.0),
            max_points: 10,
            strong_points: 9,
            success_points: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatBloomTuning {
    pub heat_rise: f32,
    pub heat_fall: f32,
    pub bloom_rise: f32,
    pub bloom_fall: f32,
    pub band_min_range: (f32, f32),
    pub band_max_range: (f32, f32),
    pub bloom_points: u32,
    pub overheat_at: f32,
    pub overheat_penalty: u32,
    /// Heat after an overheat or a bloom
    pub restart_heat: f32,
}

impl Default for HeatBloomTuning {
    fn default() -> Self {
        Self {
            heat_rise: 0.55,
            heat_fall: 0.35,
            bloom_rise: 0.6,
            bloom_fall: 0.8,
            band_min_range: (0.3, 0.5),
            band_max_range: (0.6, 0.8),
            bloom_points: 10,
            overheat_at: 0.995,
            overheat_penalty: 3,
            restart_heat: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensionLineTuning {
    pub rise: f32,
    pub fall: f32,
    pub target_range: (f32, f32),
    /// Error at which a release is worth nothing
    pub tolerance: f32,
    pub max_points: u32,
    /// Errors below this count as a success
    pub success_error: f32,
}

impl Default for TensionLineTuning {
    fn default() -> Self {
        Self {
            rise: 0.35,
            fall: 0.25,
            target_range: (0.3, 0.9),
            tolerance: 0.3,
            max_points: 12,
            success_error: 0.04,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoOrbTuning {
    pub interval_range_ms: (f64, f64),
    /// Delay from entering listen to the first demo cue
    pub lead_in_ms: f64,
    pub tolerance_ms: f64,
    pub max_points: u32,
    /// Points above this count as a success
    pub success_above: u32,
    pub result_hold_ms: f64,
}

impl Default for EchoOrbTuning {
    fn default() -> Self {
        Self {
            interval_range_ms: (500.0, 1400.0),
            lead_in_ms: 450.0,
            tolerance_ms: 800.0,
            max_points: 12,
            success_above: 8,
            result_hold_ms: 700.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureCraftTuning {
    pub fill_rise: f32,
    pub fill_fall: f32,
    pub zone_width: f32,
    pub base_speed: f32,
    pub speed_per_level: f32,
    pub hit_points: u32,
    pub miss_penalty: u32,
    pub fill_after_hit: f32,
    pub fill_after_miss: f32,
}

impl Default for PressureCraftTuning {
    fn default() -> Self {
        Self {
            fill_rise: 0.8,
            fill_fall: 0.8,
            zone_width: 0.2,
            base_speed: 0.25,
            speed_per_level: 0.06,
            hit_points: 12,
            miss_penalty: 4,
            fill_after_hit: 0.15,
            fill_after_miss: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AscendLightTuning {
    pub world_width: f32,
    pub world_height: f32,
    pub orb_x: f32,
    /// Distance from top/bottom that counts as a crash
    pub margin: f32,
    pub gravity: f32,
    pub thrust: f32,
    /// Gravity while falling after a crash
    pub crash_gravity: f32,
    pub updraft_count: usize,
    pub updraft_radius: f32,
    pub scroll_speed: f32,
    /// Upward acceleration at the center of an updraft
    pub updraft_force: f32,
    /// Closeness above which each frame scores a point
    pub score_closeness: f32,
}

impl Default for AscendLightTuning {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            orb_x: 240.0,
            margin: 12.0,
            gravity: 160.0,
            thrust: 360.0,
            crash_gravity: 60.0,
            updraft_count: 3,
            updraft_radius: 70.0,
            scroll_speed: 90.0,
            updraft_force: 420.0,
            score_closeness: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatTuning {
    pub calibration_taps: usize,
    pub bpm_range: (f64, f64),
    pub max_points: u32,
    pub success_above: u32,
}

impl Default for HeartbeatTuning {
    fn default() -> Self {
        Self {
            calibration_taps: 6,
            bpm_range: (50.0, 150.0),
            max_points: 10,
            success_above: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementTuning {
    /// Score points per awarded token
    pub points_per_token: u32,
}

impl Default for SettlementTuning {
    fn default() -> Self {
        Self {
            points_per_token: 10,
        }
    }
}

impl SettlementTuning {
    /// Tokens earned for a final score
    pub fn tokens_for(&self, score: u32) -> u32 {
        score / self.points_per_token.max(1)
    }
}
