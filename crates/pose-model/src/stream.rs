//! JSONL recording format for pose streams.
//!
//! Recordings are append-only JSONL for crash safety: a `#`-prefixed header
//! line followed by one [`PoseFrame`] object per line. Frames must be
//! timestamp-ordered; the reader enforces this so replay is deterministic.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::keypoint::PoseFrame;

/// Current recording schema version.
pub const SCHEMA_VERSION: &str = "1.0";

/// Errors produced while reading or writing recordings.
#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("Failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed recording line {line}: {source}")]
    MalformedLine {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Malformed recording header: {0}")]
    MalformedHeader(serde_json::Error),

    #[error("Failed to serialize recording: {0}")]
    Serialize(serde_json::Error),

    #[error("Frames out of order at line {line}: {timestamp_ns} < {previous_ns}")]
    OutOfOrder {
        line: usize,
        timestamp_ns: u64,
        previous_ns: u64,
    },
}

/// Recording metadata stored as the first (comment) line of a JSONL file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at recording start (ISO 8601).
    pub epoch_wall: String,

    /// Nominal pose sampling rate (Hz).
    pub sample_rate_hz: u32,

    /// Free-form descriptor of the pose source (detector name, camera id).
    #[serde(default)]
    pub source: Option<String>,
}

impl RecordingHeader {
    /// Create a header stamped with the current wall-clock time.
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
            sample_rate_hz,
            source: None,
        }
    }
}

/// Parse frames from JSONL content (one JSON object per line).
///
/// Header/comment lines starting with `#` and blank lines are skipped.
/// Returns an error if any frame's timestamp precedes its predecessor's.
pub fn parse_frames(jsonl: &str) -> Result<Vec<PoseFrame>, RecordingError> {
    let mut frames = Vec::new();
    let mut previous_ns: Option<u64> = None;

    for (index, line) in jsonl.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let frame: PoseFrame =
            serde_json::from_str(trimmed).map_err(|source| RecordingError::MalformedLine {
                line: index + 1,
                source,
            })?;

        if let Some(prev) = previous_ns {
            if frame.timestamp_ns < prev {
                return Err(RecordingError::OutOfOrder {
                    line: index + 1,
                    timestamp_ns: frame.timestamp_ns,
                    previous_ns: prev,
                });
            }
        }

        previous_ns = Some(frame.timestamp_ns);
        frames.push(frame);
    }

    Ok(frames)
}

/// Parse the header from JSONL content, if the first non-blank line carries one.
pub fn parse_header(jsonl: &str) -> Result<Option<RecordingHeader>, RecordingError> {
    for line in jsonl.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(raw) = trimmed.strip_prefix('#') {
            let header =
                serde_json::from_str(raw.trim()).map_err(RecordingError::MalformedHeader)?;
            return Ok(Some(header));
        }
        return Ok(None);
    }
    Ok(None)
}

/// Serialize frames to JSONL, prefixed with a header comment line.
pub fn serialize_recording(
    header: &RecordingHeader,
    frames: &[PoseFrame],
) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    output.push_str("# ");
    output.push_str(&serde_json::to_string(header)?);
    output.push('\n');
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

/// Read a recording file, returning its header (if any) and ordered frames.
pub fn read_recording(
    path: impl AsRef<Path>,
) -> Result<(Option<RecordingHeader>, Vec<PoseFrame>), RecordingError> {
    let content = std::fs::read_to_string(path)?;
    let header = parse_header(&content)?;
    let frames = parse_frames(&content)?;
    Ok((header, frames))
}

/// Write a recording file.
pub fn write_recording(
    path: impl AsRef<Path>,
    header: &RecordingHeader,
    frames: &[PoseFrame],
) -> Result<(), RecordingError> {
    let content = serialize_recording(header, frames).map_err(RecordingError::Serialize)?;
    std::fs::write(path, content)?;
    Ok(())
}
