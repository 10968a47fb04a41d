//! The motion analysis engine.
//!
//! Owns all rolling state: a confidence gate in front of two per-mode
//! pipelines, a lifecycle/mode state machine, and the published snapshot.
//! Frames arrive strictly sequentially from one source; reads of the
//! published state may happen concurrently through [`SharedState`].
//!
//! Per-mode buffers are kept separate — a Tremor-mode window is never read
//! or written while Gait is active and vice versa — so switching modes
//! mid-session cannot mix incompatible signals.

use proprio_common::ProprioResult;
use proprio_pose_model::PoseFrame;

use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::gait::GaitPipeline;
use crate::state::{AnalysisMode, EngineSnapshot, SharedState};
use crate::tremor::TremorPipeline;

/// Stateful analysis engine; one instance per session.
///
/// Explicitly constructed and owned by the caller; dropping it ends the
/// session and releases all buffered state.
pub struct MotionEngine {
    config: EngineConfig,
    tremor: TremorPipeline,
    gait: GaitPipeline,
    is_active: bool,
    current_mode: AnalysisMode,
    last_error: Option<AnalysisError>,
    frames_without_sample: u32,
    shared: SharedState,
}

impl MotionEngine {
    /// Create an engine after validating the configuration.
    pub fn new(config: EngineConfig) -> ProprioResult<Self> {
        config.validate()?;
        let tremor = TremorPipeline::new(config.tremor.clone(), config.window_capacity);
        let gait = GaitPipeline::new(config.gait.clone(), config.window_capacity);
        let engine = Self {
            config,
            tremor,
            gait,
            is_active: false,
            current_mode: AnalysisMode::default(),
            last_error: None,
            frames_without_sample: 0,
            shared: SharedState::new(EngineSnapshot::default()),
        };
        Ok(engine)
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        // Defaults are validated by a unit test; constructing from them
        // cannot fail.
        Self::new(EngineConfig::default()).expect("default config is valid")
    }

    /// Engine configuration (read-only).
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current published state, copied out whole.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.shared.get()
    }

    /// Cloneable handle for concurrent readers (display, haptic triggers).
    pub fn state_handle(&self) -> SharedState {
        self.shared.clone()
    }

    /// Begin analyzing frames. Existing buffers are kept, so a stopped
    /// session resumes without data loss.
    pub fn start_analysis(&mut self) {
        if !self.is_active {
            tracing::info!(mode = self.current_mode.label(), "motion analysis started");
        }
        self.is_active = true;
        self.publish();
    }

    /// Stop analyzing frames. Buffers are retained; any frame already
    /// being processed completes before this takes effect (single-writer
    /// contract).
    pub fn stop_analysis(&mut self) {
        if self.is_active {
            tracing::info!("motion analysis stopped");
        }
        self.is_active = false;
        self.publish();
    }

    /// Switch the active metric pipeline. Does not alter `is_active`, and
    /// never touches the buffers of the mode being switched away from.
    pub fn set_mode(&mut self, mode: AnalysisMode) {
        if mode != self.current_mode {
            tracing::info!(from = self.current_mode.label(), to = mode.label(), "mode switched");
            self.current_mode = mode;
            self.frames_without_sample = 0;
        }
        self.publish();
    }

    /// Clear all rolling windows for both modes and restore every metric
    /// to its documented default. `is_active` and `current_mode` are
    /// unchanged.
    pub fn reset_metrics(&mut self) {
        self.tremor.clear();
        self.gait.clear();
        self.last_error = None;
        self.frames_without_sample = 0;
        tracing::debug!("metrics reset");
        self.publish();
    }

    /// Record that the upstream frame source cannot supply frames.
    pub fn notify_camera_unavailable(&mut self) {
        tracing::warn!("pose source reported camera unavailable");
        self.last_error = Some(AnalysisError::CameraUnavailable);
        self.publish();
    }

    /// Process one frame of keypoint observations.
    ///
    /// Always returns a definite outcome and leaves the engine usable:
    /// a malformed frame is skipped and reported, a low-confidence frame
    /// simply contributes no sample. No-op while inactive.
    pub fn process_frame(&mut self, frame: &PoseFrame) -> Result<(), AnalysisError> {
        if !self.is_active {
            return Ok(());
        }

        if let Some(bad) = frame.keypoints.iter().find(|k| !k.is_well_formed()) {
            let error = AnalysisError::processing_failed(format!(
                "malformed observation for {:?} at t={}ns",
                bad.joint, frame.timestamp_ns
            ));
            tracing::debug!(%error, "frame skipped");
            self.last_error = Some(error.clone());
            self.publish();
            return Err(error);
        }

        let ingested = match self.current_mode {
            AnalysisMode::Tremor => self.ingest_tremor(frame),
            AnalysisMode::Gait => self.ingest_gait(frame),
        };

        if ingested {
            self.frames_without_sample = 0;
            // A good sample self-heals any prior condition.
            self.last_error = None;
        } else {
            self.frames_without_sample = self.frames_without_sample.saturating_add(1);
            if self.frames_without_sample >= self.config.low_confidence_frame_limit
                && self.last_error != Some(AnalysisError::LowConfidence)
            {
                tracing::warn!(
                    frames = self.frames_without_sample,
                    "no qualifying sample; metrics are stale"
                );
                self.last_error = Some(AnalysisError::LowConfidence);
            }
        }

        self.publish();
        Ok(())
    }

    /// Tremor mode consumes the configured joint's x-coordinate.
    fn ingest_tremor(&mut self, frame: &PoseFrame) -> bool {
        let threshold = self.config.confidence_threshold;
        match frame
            .observation(self.tremor.tracked_joint())
            .filter(|obs| obs.confidence >= threshold)
        {
            Some(obs) => {
                self.tremor.ingest(obs.x);
                true
            }
            None => false,
        }
    }

    /// Gait mode consumes both ankles' y-coordinates; either side alone
    /// still qualifies the frame.
    fn ingest_gait(&mut self, frame: &PoseFrame) -> bool {
        let threshold = self.config.confidence_threshold;
        let mut ingested = false;
        for joint in self.gait.tracked_joints() {
            if let Some(obs) = frame
                .observation(joint)
                .filter(|obs| obs.confidence >= threshold)
            {
                self.gait.ingest(joint.side(), obs.y, frame.timestamp_ns);
                ingested = true;
            }
        }
        ingested
    }

    /// Rebuild the snapshot from pipeline state and swap it in whole.
    fn publish(&self) {
        let tremor = self.tremor.metrics();
        let gait = self.gait.metrics();
        self.shared.publish(EngineSnapshot {
            tremor_amplitude: tremor.amplitude,
            tremor_trend: tremor.trend,
            gait_stability_index: gait.stability_index,
            gait_symmetry_index: gait.symmetry_index,
            session_step_count: gait.step_count,
            is_active: self.is_active,
            current_mode: self.current_mode,
            last_error: self.last_error.clone(),
        });
    }
}
