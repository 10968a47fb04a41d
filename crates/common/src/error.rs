//! Error types shared across Proprio crates.
//!
//! Subsystems own their domain errors (`AnalysisError`, `HapticError`,
//! `RecordingError`); this type covers the cross-cutting concerns they
//! all share: configuration, I/O, and serialization.

/// Top-level error type for Proprio operations.
#[derive(Debug, thiserror::Error)]
pub enum ProprioError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ProprioError.
pub type ProprioResult<T> = Result<T, ProprioError>;

impl ProprioError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
