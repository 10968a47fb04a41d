//! Published engine state.
//!
//! The engine mutates its pipelines privately and republishes an
//! [`EngineSnapshot`] as a whole after each operation. Concurrent readers
//! (display, haptic triggers) go through [`SharedState`], which swaps the
//! entire struct under a lock — a reader can never observe tremor metrics
//! from one frame next to gait metrics from another.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Which metric pipeline is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Lower-body tracking: steps, stride stability, symmetry.
    #[default]
    Gait,
    /// Upper-body tracking: fine-motor oscillation.
    Tremor,
}

impl AnalysisMode {
    /// Human-readable mode label.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::Gait => "Gait Assistance",
            AnalysisMode::Tremor => "Fine Motor",
        }
    }
}

/// Coarse direction of recent tremor amplitude movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TremorTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl TremorTrend {
    /// Arrow glyph used by display layers.
    pub fn arrow(&self) -> &'static str {
        match self {
            TremorTrend::Increasing => "↑",
            TremorTrend::Decreasing => "↓",
            TremorTrend::Stable => "→",
        }
    }
}

/// The externally observable engine state.
///
/// All ratio-valued fields stay inside `[0, 1]` and are never NaN,
/// regardless of input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Normalized tremor amplitude, 0.0 = no detectable oscillation.
    pub tremor_amplitude: f64,

    /// Direction the amplitude has moved over the recent trend window.
    pub tremor_trend: TremorTrend,

    /// Stride-to-stride stability, 1.0 = stable.
    pub gait_stability_index: f64,

    /// Left/right stride agreement, 1.0 = symmetric.
    pub gait_symmetry_index: f64,

    /// Completed stride cycles this session. Monotone except across
    /// `reset_metrics`.
    pub session_step_count: u64,

    /// Whether frames are currently being analyzed.
    pub is_active: bool,

    /// The active metric pipeline.
    pub current_mode: AnalysisMode,

    /// Most recent classified failure, if any.
    pub last_error: Option<AnalysisError>,
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self {
            tremor_amplitude: 0.0,
            tremor_trend: TremorTrend::Stable,
            gait_stability_index: 1.0,
            gait_symmetry_index: 1.0,
            session_step_count: 0,
            is_active: false,
            current_mode: AnalysisMode::Gait,
            last_error: None,
        }
    }
}

impl EngineSnapshot {
    /// Threshold check used by presentation layers to decide whether to
    /// show guidance (the engine does not own the threshold).
    pub fn stability_below(&self, threshold: f64) -> bool {
        self.gait_stability_index < threshold
    }
}

/// Cloneable handle to the atomically published snapshot.
///
/// The engine holds one of these and swaps the whole snapshot under the
/// write lock; any number of reader clones may poll concurrently.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<RwLock<EngineSnapshot>>,
}

impl SharedState {
    pub fn new(snapshot: EngineSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Replace the published snapshot as a whole.
    pub fn publish(&self, snapshot: EngineSnapshot) {
        // A poisoned lock means a reader panicked mid-read; the snapshot
        // itself is still valid to overwrite.
        match self.inner.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }

    /// Current snapshot, copied out whole.
    pub fn get(&self) -> EngineSnapshot {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_matches_documented_defaults() {
        let snapshot = EngineSnapshot::default();
        assert_eq!(snapshot.tremor_amplitude, 0.0);
        assert_eq!(snapshot.gait_stability_index, 1.0);
        assert_eq!(snapshot.gait_symmetry_index, 1.0);
        assert_eq!(snapshot.session_step_count, 0);
        assert!(!snapshot.is_active);
        assert_eq!(snapshot.current_mode, AnalysisMode::Gait);
        assert_eq!(snapshot.last_error, None);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(AnalysisMode::Gait.label(), "Gait Assistance");
        assert_eq!(AnalysisMode::Tremor.label(), "Fine Motor");
    }

    #[test]
    fn test_trend_arrows() {
        assert_eq!(TremorTrend::Increasing.arrow(), "↑");
        assert_eq!(TremorTrend::Decreasing.arrow(), "↓");
        assert_eq!(TremorTrend::Stable.arrow(), "→");
    }

    #[test]
    fn test_stability_threshold_check() {
        let mut snapshot = EngineSnapshot::default();
        assert!(!snapshot.stability_below(0.8));
        snapshot.gait_stability_index = 0.5;
        assert!(snapshot.stability_below(0.8));
    }

    #[test]
    fn test_shared_state_publishes_whole_snapshots() {
        let shared = SharedState::default();
        let reader = shared.clone();

        let mut snapshot = EngineSnapshot::default();
        snapshot.tremor_amplitude = 0.42;
        snapshot.session_step_count = 7;
        shared.publish(snapshot.clone());

        assert_eq!(reader.get(), snapshot);
    }

    #[test]
    fn test_shared_state_concurrent_readers() {
        let shared = SharedState::default();
        let reader = shared.clone();

        let handle = std::thread::spawn(move || {
            for _ in 0..100 {
                let snapshot = reader.get();
                // Ratio fields must always be in-bounds mid-stream.
                assert!((0.0..=1.0).contains(&snapshot.tremor_amplitude));
                assert!((0.0..=1.0).contains(&snapshot.gait_stability_index));
            }
        });

        for i in 0..100 {
            let mut snapshot = EngineSnapshot::default();
            snapshot.tremor_amplitude = (i as f64 / 100.0).clamp(0.0, 1.0);
            shared.publish(snapshot);
        }

        handle.join().unwrap();
    }
}
