//! Analysis error taxonomy.
//!
//! No error here is fatal: every failure mode is recoverable by design,
//! because a frame-dropping camera or a momentarily occluded joint must not
//! corrupt multi-second rolling state. Errors are classified and stored in
//! the published snapshot (`last_error`) rather than thrown across the
//! state boundary.

use serde::{Deserialize, Serialize};

/// Classified, recoverable analysis failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisError {
    /// The upstream frame source cannot supply frames. Reported by the
    /// caller via [`crate::MotionEngine::notify_camera_unavailable`].
    #[error("Camera unavailable: the pose source cannot supply frames")]
    CameraUnavailable,

    /// No qualifying sample has arrived for the configured number of
    /// consecutive frames; published metrics are stale, not wrong.
    #[error("Pose confidence too low for sustained analysis")]
    LowConfidence,

    /// Decoding or analyzing one frame failed unrecoverably. The frame is
    /// skipped; the engine stays active and self-heals on the next good
    /// frame.
    #[error("Frame processing failed: {cause}")]
    ProcessingFailed { cause: String },
}

impl AnalysisError {
    pub fn processing_failed(cause: impl Into<String>) -> Self {
        Self::ProcessingFailed {
            cause: cause.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptions_name_the_failure() {
        assert!(AnalysisError::CameraUnavailable.to_string().contains("Camera"));
        assert!(AnalysisError::LowConfidence.to_string().contains("confidence"));
        assert!(AnalysisError::processing_failed("bad joint")
            .to_string()
            .contains("bad joint"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_string(&AnalysisError::LowConfidence).unwrap();
        assert!(json.contains("\"kind\":\"low_confidence\""));
    }
}
