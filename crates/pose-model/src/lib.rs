//! Proprio Pose Model
//!
//! Core data model for pose streams: named body joints, per-frame keypoint
//! observations, and the JSONL recording format used to persist and replay
//! sessions. Coordinates are normalized to `[0.0, 1.0]` relative to the
//! camera image; confidence is the pose detector's per-joint score.

pub mod keypoint;
pub mod stream;

pub use keypoint::{BodySide, Joint, KeypointObservation, PoseFrame, TimestampNs};
pub use stream::{RecordingError, RecordingHeader};
