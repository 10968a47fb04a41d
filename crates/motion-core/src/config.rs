//! Engine configuration.
//!
//! Every threshold the pipelines use lives here with a documented default —
//! nothing is a hidden magic number. Configs are serializable so a session
//! can be replayed under the exact settings that produced it.

use proprio_common::{ProprioError, ProprioResult};
use proprio_pose_model::Joint;
use serde::{Deserialize, Serialize};

/// Configuration for the motion analysis engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum detection confidence for a keypoint to enter the rolling
    /// statistics. Samples below this are treated as missing, not zero.
    /// Valid range [0, 1].
    pub confidence_threshold: f64,

    /// Rolling window capacity in samples (~1 second at 60 Hz).
    pub window_capacity: usize,

    /// Consecutive processed frames without a qualifying sample before the
    /// engine surfaces a low-confidence condition.
    pub low_confidence_frame_limit: u32,

    /// Tremor pipeline settings.
    pub tremor: TremorConfig,

    /// Gait pipeline settings.
    pub gait: GaitConfig,
}

/// Settings for the tremor (fine-motor) pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TremorConfig {
    /// Joint whose x-coordinate is tracked for oscillation.
    pub tracked_joint: Joint,

    /// Maps normalized-coordinate jitter into the [0, 1] feedback range:
    /// `amplitude = min(sqrt(variance) * amplitude_scale, 1.0)`.
    /// Must be positive. The default of 100 was tuned so typical resting
    /// hand jitter lands mid-range.
    pub amplitude_scale: f64,

    /// How many recent amplitude values the trend classifier compares
    /// across.
    pub trend_window: usize,

    /// Minimum amplitude change across the trend window to report a
    /// direction instead of "stable".
    pub trend_tolerance: f64,
}

/// Settings for the gait pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaitConfig {
    /// How far (normalized units) an ankle must deviate from its stance
    /// baseline to count as lifted.
    pub lift_threshold: f64,

    /// EMA smoothing factor applied to ankle height before strike
    /// detection, in (0, 1]; lower = more smoothing.
    pub smoothing_alpha: f64,

    /// Refractory period between foot strikes on the same side.
    /// Prevents double-counting one strike (max ~4 steps/sec at 250 ms).
    pub min_strike_interval_ns: u64,

    /// How many recent stride intervals per side feed the stability and
    /// symmetry indices.
    pub stride_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            window_capacity: 60,
            low_confidence_frame_limit: 30,
            tremor: TremorConfig::default(),
            gait: GaitConfig::default(),
        }
    }
}

impl Default for TremorConfig {
    fn default() -> Self {
        Self {
            tracked_joint: Joint::RightWrist,
            amplitude_scale: 100.0,
            trend_window: 30,
            trend_tolerance: 0.05,
        }
    }
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            lift_threshold: 0.03,
            smoothing_alpha: 0.4,
            min_strike_interval_ns: 250_000_000,
            stride_window: 8,
        }
    }
}

impl EngineConfig {
    /// Reject settings that would make the pipelines meaningless.
    pub fn validate(&self) -> ProprioResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ProprioError::config(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.window_capacity == 0 {
            return Err(ProprioError::config("window_capacity must be at least 1"));
        }
        if self.low_confidence_frame_limit == 0 {
            return Err(ProprioError::config(
                "low_confidence_frame_limit must be at least 1",
            ));
        }
        if !self.tremor.amplitude_scale.is_finite() || self.tremor.amplitude_scale <= 0.0 {
            return Err(ProprioError::config(format!(
                "tremor amplitude_scale must be positive, got {}",
                self.tremor.amplitude_scale
            )));
        }
        if !self.tremor.tracked_joint.is_upper_body() {
            return Err(ProprioError::config(format!(
                "tremor tracked_joint must be an upper-body joint, got {:?}",
                self.tremor.tracked_joint
            )));
        }
        if !(0.0..=1.0).contains(&self.gait.smoothing_alpha) || self.gait.smoothing_alpha == 0.0 {
            return Err(ProprioError::config(format!(
                "gait smoothing_alpha must be in (0, 1], got {}",
                self.gait.smoothing_alpha
            )));
        }
        if !self.gait.lift_threshold.is_finite() || self.gait.lift_threshold <= 0.0 {
            return Err(ProprioError::config(format!(
                "gait lift_threshold must be positive, got {}",
                self.gait.lift_threshold
            )));
        }
        if self.gait.stride_window < 2 {
            return Err(ProprioError::config(
                "gait stride_window must hold at least 2 intervals",
            ));
        }
        Ok(())
    }
}
