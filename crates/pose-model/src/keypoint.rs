//! Keypoint observation types for the Proprio pose stream.
//!
//! A pose source (camera + detector) emits one [`PoseFrame`] per camera
//! frame: a set of named joints, each with a normalized 2D position and a
//! detection confidence. All pointer coordinates are normalized to
//! `[0.0, 1.0]` relative to the image dimensions.

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in nanoseconds since session start.
pub type TimestampNs = u64;

/// Which side of the body a joint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySide {
    Left,
    Right,
    /// Midline joints (e.g., nose, neck) if the detector reports them.
    Center,
}

/// A named anatomical landmark tracked by the pose detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// Whether this joint belongs to the upper body (tremor analysis).
    pub fn is_upper_body(&self) -> bool {
        matches!(
            self,
            Joint::LeftShoulder
                | Joint::RightShoulder
                | Joint::LeftElbow
                | Joint::RightElbow
                | Joint::LeftWrist
                | Joint::RightWrist
        )
    }

    /// Whether this joint belongs to the lower body (gait analysis).
    pub fn is_lower_body(&self) -> bool {
        !self.is_upper_body()
    }

    /// Body side of the joint.
    pub fn side(&self) -> BodySide {
        match self {
            Joint::LeftShoulder
            | Joint::LeftElbow
            | Joint::LeftWrist
            | Joint::LeftHip
            | Joint::LeftKnee
            | Joint::LeftAnkle => BodySide::Left,
            Joint::RightShoulder
            | Joint::RightElbow
            | Joint::RightWrist
            | Joint::RightHip
            | Joint::RightKnee
            | Joint::RightAnkle => BodySide::Right,
        }
    }

    /// The same joint on the opposite side of the body.
    pub fn mirrored(&self) -> Joint {
        match self {
            Joint::LeftShoulder => Joint::RightShoulder,
            Joint::RightShoulder => Joint::LeftShoulder,
            Joint::LeftElbow => Joint::RightElbow,
            Joint::RightElbow => Joint::LeftElbow,
            Joint::LeftWrist => Joint::RightWrist,
            Joint::RightWrist => Joint::LeftWrist,
            Joint::LeftHip => Joint::RightHip,
            Joint::RightHip => Joint::LeftHip,
            Joint::LeftKnee => Joint::RightKnee,
            Joint::RightKnee => Joint::LeftKnee,
            Joint::LeftAnkle => Joint::RightAnkle,
            Joint::RightAnkle => Joint::LeftAnkle,
        }
    }
}

/// One joint's detection for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeypointObservation {
    /// Which joint was detected.
    pub joint: Joint,

    /// Normalized X coordinate [0.0, 1.0].
    pub x: f64,

    /// Normalized Y coordinate [0.0, 1.0].
    pub y: f64,

    /// Detection confidence [0.0, 1.0].
    pub confidence: f64,
}

impl KeypointObservation {
    /// Create an observation.
    pub fn new(joint: Joint, x: f64, y: f64, confidence: f64) -> Self {
        Self {
            joint,
            x,
            y,
            confidence,
        }
    }

    /// Position as an (x, y) tuple.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Whether all numeric fields are finite and confidence is in range.
    ///
    /// A detector glitch (NaN position, confidence outside [0,1]) must be
    /// classified as a decode failure, never fed to rolling statistics.
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.confidence.is_finite()
            && (0.0..=1.0).contains(&self.confidence)
    }

    /// This observation with its joint relabeled to the opposite side.
    pub fn mirrored(&self) -> Self {
        Self {
            joint: self.joint.mirrored(),
            ..*self
        }
    }
}

/// One camera frame's worth of keypoint observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Monotonic nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Detected keypoints, at most one per joint.
    pub keypoints: Vec<KeypointObservation>,
}

impl PoseFrame {
    /// Create a frame from a set of observations.
    pub fn new(timestamp_ns: TimestampNs, keypoints: Vec<KeypointObservation>) -> Self {
        Self {
            timestamp_ns,
            keypoints,
        }
    }

    /// Create a frame containing a single observation.
    pub fn single(
        timestamp_ns: TimestampNs,
        joint: Joint,
        x: f64,
        y: f64,
        confidence: f64,
    ) -> Self {
        Self::new(
            timestamp_ns,
            vec![KeypointObservation::new(joint, x, y, confidence)],
        )
    }

    /// Timestamp as fractional seconds since session start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }

    /// Look up the observation for a specific joint, if present.
    pub fn observation(&self, joint: Joint) -> Option<&KeypointObservation> {
        self.keypoints.iter().find(|k| k.joint == joint)
    }

    /// This frame with every observation relabeled to the opposite side.
    pub fn mirrored(&self) -> Self {
        Self {
            timestamp_ns: self.timestamp_ns,
            keypoints: self.keypoints.iter().map(|k| k.mirrored()).collect(),
        }
    }
}
