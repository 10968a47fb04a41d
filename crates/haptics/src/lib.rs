//! Proprio Haptics — Biofeedback Playback
//!
//! Consumes engine snapshots (read-only) and turns them into haptic
//! entrainment: a rhythmic metronome for gait cadence and continuous
//! correction pulses proportional to tremor amplitude. Device access sits
//! behind the [`HapticActuator`] trait; this crate owns playback timing,
//! the engine does not.

pub mod controller;
pub mod entrainment;

pub use controller::{HapticActuator, HapticController, HapticError, NullActuator};
pub use entrainment::{entrainment_plan, EntrainmentConfig, EntrainmentPlan};
