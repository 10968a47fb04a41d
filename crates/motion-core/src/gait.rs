//! Gait metric pipeline.
//!
//! Step events are inferred per side from ankle vertical displacement:
//! the EMA-smoothed height must deviate from its stance baseline by the
//! lift threshold (swing), then return within half the threshold (strike).
//! A refractory interval rejects double-counted strikes. A stride cycle
//! for a side completes on its next strike; each completed cycle records
//! one stride interval and increments the session step count.
//!
//! - `stability = clamp(1 - cv, 0, 1)` where `cv` is the coefficient of
//!   variation of the pooled recent stride intervals
//! - `symmetry = min(mean_left, mean_right) / max(mean_left, mean_right)`
//!
//! Both indices default to 1.0 until at least two stride cycles of history
//! exist. All aggregates are combined with commutative operations, so
//! relabeling which side is "left" cannot change any published value.

use proprio_pose_model::{BodySide, Joint, TimestampNs};

use crate::config::GaitConfig;
use crate::window::{clamp_unit, RollingWindow};

/// Output of one gait recomputation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitMetrics {
    pub stability_index: f64,
    pub symmetry_index: f64,
    pub step_count: u64,
}

impl Default for GaitMetrics {
    fn default() -> Self {
        Self {
            stability_index: 1.0,
            symmetry_index: 1.0,
            step_count: 0,
        }
    }
}

/// Strike detector and stride-interval history for one side of the body.
#[derive(Debug)]
struct StrideTracker {
    smoothed: Option<f64>,
    baseline: RollingWindow<f64>,
    lifted: bool,
    last_strike_ns: Option<TimestampNs>,
    intervals: RollingWindow<f64>,
}

impl StrideTracker {
    fn new(config: &GaitConfig, window_capacity: usize) -> Self {
        Self {
            smoothed: None,
            baseline: RollingWindow::new(window_capacity),
            lifted: false,
            last_strike_ns: None,
            intervals: RollingWindow::new(config.stride_window),
        }
    }

    /// Feed one ankle height sample. Returns true when a stride cycle
    /// completed (an interval was recorded).
    fn ingest(&mut self, config: &GaitConfig, height: f64, timestamp_ns: TimestampNs) -> bool {
        let alpha = config.smoothing_alpha;
        let smoothed = match self.smoothed {
            Some(prev) => alpha * height + (1.0 - alpha) * prev,
            None => height,
        };
        self.smoothed = Some(smoothed);

        let baseline = self.baseline.mean().unwrap_or(smoothed);
        let deviation = (smoothed - baseline).abs();

        if !self.lifted {
            // The baseline only learns stance-phase heights; updating it
            // during swing would chase the foot upward.
            self.baseline.push(smoothed);
            if deviation > config.lift_threshold {
                self.lifted = true;
            }
            return false;
        }

        if deviation <= config.lift_threshold * 0.5 {
            self.lifted = false;
            return self.record_strike(config, timestamp_ns);
        }

        false
    }

    fn record_strike(&mut self, config: &GaitConfig, timestamp_ns: TimestampNs) -> bool {
        match self.last_strike_ns {
            None => {
                self.last_strike_ns = Some(timestamp_ns);
                false
            }
            Some(previous) => {
                let elapsed = timestamp_ns.saturating_sub(previous);
                if elapsed < config.min_strike_interval_ns {
                    // Bounce within the refractory period: not a real strike.
                    return false;
                }
                self.last_strike_ns = Some(timestamp_ns);
                self.intervals.push(elapsed as f64 / 1_000_000_000.0);
                true
            }
        }
    }

    fn clear(&mut self) {
        self.smoothed = None;
        self.baseline.clear();
        self.lifted = false;
        self.last_strike_ns = None;
        self.intervals.clear();
    }
}

/// Stateful gait analyzer tracking both ankles.
#[derive(Debug)]
pub struct GaitPipeline {
    config: GaitConfig,
    left: StrideTracker,
    right: StrideTracker,
    step_count: u64,
}

impl GaitPipeline {
    pub fn new(config: GaitConfig, window_capacity: usize) -> Self {
        let left = StrideTracker::new(&config, window_capacity);
        let right = StrideTracker::new(&config, window_capacity);
        Self {
            config,
            left,
            right,
            step_count: 0,
        }
    }

    /// Joints this pipeline consumes.
    pub fn tracked_joints(&self) -> [Joint; 2] {
        [Joint::LeftAnkle, Joint::RightAnkle]
    }

    /// Ingest one qualifying ankle height sample and recompute.
    pub fn ingest(
        &mut self,
        side: BodySide,
        height: f64,
        timestamp_ns: TimestampNs,
    ) -> GaitMetrics {
        let tracker = match side {
            BodySide::Left => &mut self.left,
            BodySide::Right => &mut self.right,
            BodySide::Center => return self.metrics(),
        };
        if tracker.ingest(&self.config, height, timestamp_ns) {
            self.step_count += 1;
        }
        self.metrics()
    }

    /// Current metrics without ingesting anything.
    pub fn metrics(&self) -> GaitMetrics {
        GaitMetrics {
            stability_index: self.stability_index(),
            symmetry_index: self.symmetry_index(),
            step_count: self.step_count,
        }
    }

    /// Drop all buffered samples, timing state, and the step count.
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.step_count = 0;
    }

    /// Pooled coefficient-of-variation stability over both sides' recent
    /// stride intervals. Per-side aggregates are combined with commutative
    /// additions so left/right relabeling is exactly invariant.
    fn stability_index(&self) -> f64 {
        let n = self.left.intervals.len() + self.right.intervals.len();
        if n < 2 {
            return 1.0;
        }

        let sum = self.left.intervals.sum() + self.right.intervals.sum();
        let mean = sum / n as f64;
        if mean <= 0.0 {
            return 1.0;
        }

        let ssd = self.left.intervals.sum_squared_deviations(mean)
            + self.right.intervals.sum_squared_deviations(mean);
        let cv = (ssd / n as f64).sqrt() / mean;
        clamp_unit(1.0 - cv)
    }

    /// Ratio of per-side mean stride intervals, 1.0 when both sides match.
    /// `min/max` is symmetric under relabeling by construction.
    fn symmetry_index(&self) -> f64 {
        let left_mean = match self.left.intervals.mean() {
            Some(m) => m,
            None => return 1.0,
        };
        let right_mean = match self.right.intervals.mean() {
            Some(m) => m,
            None => return 1.0,
        };
        if left_mean <= 0.0 || right_mean <= 0.0 {
            return 1.0;
        }

        let ratio = left_mean.min(right_mean) / left_mean.max(right_mean);
        clamp_unit(ratio)
    }
}
