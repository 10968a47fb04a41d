//! Mapping engine metrics to an entrainment plan.
//!
//! The engine exposes tremor amplitude and a stability-derived tempo as
//! read-only signals; this module is where that derivation lives. A less
//! stable gait slows the metronome toward a steadier pace so the wearer
//! can re-entrain, and tremor correction intensity tracks the measured
//! amplitude directly.

use proprio_motion_core::EngineSnapshot;
use serde::{Deserialize, Serialize};

/// Settings for entrainment derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrainmentConfig {
    /// Metronome tempo at full stability (steps per minute).
    pub base_bpm: f64,

    /// Lower clamp for the derived tempo.
    pub min_bpm: f64,

    /// Upper clamp for the derived tempo.
    pub max_bpm: f64,

    /// How strongly instability slows the tempo, in [0, 1].
    /// 0 = fixed metronome, 1 = tempo halves at zero stability.
    pub stability_slowdown: f64,
}

impl Default for EntrainmentConfig {
    fn default() -> Self {
        Self {
            base_bpm: 60.0,
            min_bpm: 30.0,
            max_bpm: 180.0,
            stability_slowdown: 0.5,
        }
    }
}

/// What the haptic layer should play right now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntrainmentPlan {
    /// Metronome tempo (beats per minute).
    pub tempo_bpm: f64,

    /// Correction pulse intensity in [0, 1].
    pub intensity: f64,
}

impl EntrainmentPlan {
    /// Seconds between metronome ticks.
    pub fn tick_interval_secs(&self) -> f64 {
        60.0 / self.tempo_bpm
    }
}

/// Derive the current entrainment plan from a published snapshot.
pub fn entrainment_plan(snapshot: &EngineSnapshot, config: &EntrainmentConfig) -> EntrainmentPlan {
    // Stability 1.0 plays the base tempo; instability slows it down by up
    // to the configured fraction.
    let slowdown = config.stability_slowdown.clamp(0.0, 1.0);
    let stability = snapshot.gait_stability_index.clamp(0.0, 1.0);
    let scale = 1.0 - slowdown * (1.0 - stability);
    let tempo_bpm = (config.base_bpm * scale).clamp(config.min_bpm, config.max_bpm);

    EntrainmentPlan {
        tempo_bpm,
        intensity: snapshot.tremor_amplitude.clamp(0.0, 1.0),
    }
}
