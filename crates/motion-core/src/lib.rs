//! Proprio Motion Core — The Analysis Engine
//!
//! Consumes per-frame keypoint observations and maintains clinically
//! relevant motion metrics in real time:
//! - **Tremor:** positional variance of a tracked upper-body joint,
//!   normalized into a `[0, 1]` feedback amplitude
//! - **Gait:** step events, stride-interval stability, and left/right
//!   symmetry from lower-body keypoints
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! All inputs are data; all outputs are data. The engine is a single
//! logical writer; readers observe its state through atomic whole-struct
//! snapshots ([`state::SharedState`]).

pub mod config;
pub mod engine;
pub mod error;
pub mod gait;
pub mod state;
pub mod tremor;
pub mod window;

pub use config::{EngineConfig, GaitConfig, TremorConfig};
pub use engine::MotionEngine;
pub use error::AnalysisError;
pub use state::{AnalysisMode, EngineSnapshot, SharedState, TremorTrend};
pub use window::RollingWindow;
