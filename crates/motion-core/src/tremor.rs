//! Tremor metric pipeline.
//!
//! Tracks one rolling window of the configured joint's x-coordinate and
//! maps its positional variance into a `[0, 1]` feedback amplitude:
//!
//! `amplitude = min(sqrt(population_variance) * amplitude_scale, 1.0)`
//!
//! Population variance (divide by n) is deliberate: this is a feedback
//! number biased toward responsiveness, not an unbiased statistical
//! estimate. The result is deterministic for a given sample sequence.

use proprio_pose_model::Joint;

use crate::config::TremorConfig;
use crate::state::TremorTrend;
use crate::window::{clamp_unit, RollingWindow};

/// Output of one tremor recomputation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TremorMetrics {
    pub amplitude: f64,
    pub trend: TremorTrend,
}

impl Default for TremorMetrics {
    fn default() -> Self {
        Self {
            amplitude: 0.0,
            trend: TremorTrend::Stable,
        }
    }
}

/// Stateful tremor analyzer for a single tracked joint.
#[derive(Debug)]
pub struct TremorPipeline {
    config: TremorConfig,
    positions: RollingWindow<f64>,
    amplitude_history: RollingWindow<f64>,
}

impl TremorPipeline {
    pub fn new(config: TremorConfig, window_capacity: usize) -> Self {
        let trend_window = config.trend_window.max(2);
        Self {
            config,
            positions: RollingWindow::new(window_capacity),
            amplitude_history: RollingWindow::new(trend_window),
        }
    }

    /// The joint this pipeline consumes.
    pub fn tracked_joint(&self) -> Joint {
        self.config.tracked_joint
    }

    /// Ingest one qualifying x-coordinate sample and recompute.
    pub fn ingest(&mut self, x: f64) -> TremorMetrics {
        self.positions.push(x);
        let amplitude = self.compute_amplitude();
        self.amplitude_history.push(amplitude);
        self.metrics()
    }

    /// Current metrics without ingesting anything.
    pub fn metrics(&self) -> TremorMetrics {
        TremorMetrics {
            amplitude: self.compute_amplitude(),
            trend: self.classify_trend(),
        }
    }

    /// Number of buffered position samples (stable across mode switches).
    pub fn sample_count(&self) -> usize {
        self.positions.len()
    }

    /// Drop all buffered samples and history.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.amplitude_history.clear();
    }

    fn compute_amplitude(&self) -> f64 {
        // < 2 samples: variance defined as 0, so startup never reports a
        // false-positive tremor.
        let variance = self.positions.population_variance();
        clamp_unit(variance.sqrt() * self.config.amplitude_scale)
    }

    fn classify_trend(&self) -> TremorTrend {
        let (oldest, latest) = match (
            self.amplitude_history.oldest(),
            self.amplitude_history.latest(),
        ) {
            (Some(o), Some(l)) if self.amplitude_history.len() >= 2 => (*o, *l),
            _ => return TremorTrend::Stable,
        };

        let delta = latest - oldest;
        if delta > self.config.trend_tolerance {
            TremorTrend::Increasing
        } else if delta < -self.config.trend_tolerance {
            TremorTrend::Decreasing
        } else {
            TremorTrend::Stable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> TremorPipeline {
        TremorPipeline::new(TremorConfig::default(), 60)
    }

    #[test]
    fn test_no_samples_reports_zero() {
        assert_eq!(pipeline().metrics().amplitude, 0.0);
    }

    #[test]
    fn test_single_sample_reports_zero() {
        let mut p = pipeline();
        let metrics = p.ingest(0.5);
        assert_eq!(metrics.amplitude, 0.0);
    }

    #[test]
    fn test_steady_hand_reports_zero() {
        let mut p = pipeline();
        let mut last = TremorMetrics::default();
        for _ in 0..60 {
            last = p.ingest(0.5);
        }
        assert_eq!(last.amplitude, 0.0);
        assert_eq!(last.trend, TremorTrend::Stable);
    }

    #[test]
    fn test_oscillation_reports_positive_bounded_amplitude() {
        let mut p = pipeline();
        let mut last = TremorMetrics::default();
        for i in 0..60 {
            let x = if i % 2 == 0 { 0.51 } else { 0.49 };
            last = p.ingest(x);
        }
        assert!(last.amplitude > 0.0);
        assert!(last.amplitude <= 1.0);
        // ±0.01 square wave: stddev = 0.01, scaled by 100 = 1.0.
        assert!((last.amplitude - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_amplitude_is_deterministic() {
        let sequence: Vec<f64> = (0..60)
            .map(|i| 0.5 + 0.008 * ((i % 3) as f64 - 1.0))
            .collect();

        let mut a = pipeline();
        let mut b = pipeline();
        for &x in &sequence {
            a.ingest(x);
        }
        for &x in &sequence {
            b.ingest(x);
        }
        assert_eq!(a.metrics().amplitude, b.metrics().amplitude);
    }

    #[test]
    fn test_trend_increases_with_growing_oscillation() {
        let mut p = TremorPipeline::new(
            TremorConfig {
                trend_window: 20,
                trend_tolerance: 0.05,
                ..Default::default()
            },
            60,
        );

        // Quiet hand, then growing oscillation.
        for _ in 0..30 {
            p.ingest(0.5);
        }
        let mut last = TremorMetrics::default();
        for i in 0..30 {
            let swing = 0.002 * (i + 1) as f64;
            let x = if i % 2 == 0 { 0.5 + swing } else { 0.5 - swing };
            last = p.ingest(x);
        }
        assert_eq!(last.trend, TremorTrend::Increasing);
    }

    #[test]
    fn test_clear_resets_to_startup_state() {
        let mut p = pipeline();
        for i in 0..20 {
            p.ingest(0.5 + (i % 2) as f64 * 0.02);
        }
        assert!(p.metrics().amplitude > 0.0);

        p.clear();
        assert_eq!(p.sample_count(), 0);
        assert_eq!(p.metrics().amplitude, 0.0);
        assert_eq!(p.metrics().trend, TremorTrend::Stable);
    }
}
