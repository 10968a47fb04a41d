//! Haptic playback control.
//!
//! [`HapticController`] owns playback state and timing; actual device
//! output goes through the [`HapticActuator`] seam so the controller is
//! testable without hardware. The caller pumps [`HapticController::drive`]
//! with elapsed session time — ticks are emitted deterministically from
//! that, never from a wall clock.

/// Errors from the haptic subsystem.
#[derive(Debug, thiserror::Error)]
pub enum HapticError {
    /// The device has no haptic engine.
    #[error("Haptic playback is not supported on this device")]
    EngineNotSupported,

    /// A pattern was built but could not be played.
    #[error("Failed to play haptic pattern: {0}")]
    PatternFailed(String),
}

/// Hardware seam: something that can emit haptic events.
pub trait HapticActuator {
    /// A sharp, distinct transient event (metronome tick).
    fn transient_tick(&mut self, intensity: f64, sharpness: f64) -> Result<(), HapticError>;

    /// A continuous event for smooth feedback.
    fn continuous_pulse(
        &mut self,
        intensity: f64,
        sharpness: f64,
        duration_secs: f64,
    ) -> Result<(), HapticError>;
}

/// Actuator that records events without touching hardware.
///
/// Backs tests and headless replay.
#[derive(Debug, Default)]
pub struct NullActuator {
    pub ticks: u32,
    pub pulses: u32,
}

impl HapticActuator for NullActuator {
    fn transient_tick(&mut self, _intensity: f64, _sharpness: f64) -> Result<(), HapticError> {
        self.ticks += 1;
        Ok(())
    }

    fn continuous_pulse(
        &mut self,
        _intensity: f64,
        _sharpness: f64,
        _duration_secs: f64,
    ) -> Result<(), HapticError> {
        self.pulses += 1;
        Ok(())
    }
}

/// Valid metronome tempo range (steps per minute).
pub const BPM_RANGE: std::ops::RangeInclusive<f64> = 30.0..=180.0;

/// Upper bound on ticks emitted by one `drive` call. A clock discontinuity
/// (corrupt recording timestamp, suspended process) resynchronizes instead
/// of flooding the actuator.
pub const MAX_TICKS_PER_DRIVE: u32 = 1_000;

/// Playback controller for gait entrainment and tremor correction.
pub struct HapticController<A: HapticActuator> {
    actuator: A,
    rhythm_bpm: f64,
    haptic_intensity: f64,
    is_playing_entrainment: bool,
    next_tick_secs: f64,
}

impl<A: HapticActuator> HapticController<A> {
    /// Create a controller over the given actuator.
    pub fn new(actuator: A) -> Self {
        Self {
            actuator,
            rhythm_bpm: 60.0,
            haptic_intensity: 1.0,
            is_playing_entrainment: false,
            next_tick_secs: 0.0,
        }
    }

    /// Base metronome tempo (steps per minute). Default 60.
    pub fn rhythm_bpm(&self) -> f64 {
        self.rhythm_bpm
    }

    /// Set the metronome tempo, clamped to the valid range.
    pub fn set_rhythm_bpm(&mut self, bpm: f64) {
        self.rhythm_bpm = bpm.clamp(*BPM_RANGE.start(), *BPM_RANGE.end());
    }

    /// Correction pulse intensity in [0, 1]. Default 1.0.
    pub fn haptic_intensity(&self) -> f64 {
        self.haptic_intensity
    }

    /// Set the correction intensity, clamped to [0, 1].
    pub fn set_haptic_intensity(&mut self, intensity: f64) {
        self.haptic_intensity = intensity.clamp(0.0, 1.0);
    }

    /// Whether the entrainment metronome is running.
    pub fn is_playing_entrainment(&self) -> bool {
        self.is_playing_entrainment
    }

    /// Start the rhythmic entrainment metronome.
    pub fn start_gait_entrainment(&mut self, session_secs: f64) {
        self.is_playing_entrainment = true;
        self.next_tick_secs = session_secs;
        tracing::info!(bpm = self.rhythm_bpm, "gait entrainment started");
    }

    /// Emit all metronome ticks due by `session_secs`. Returns how many
    /// were played. No-op when entrainment is not running.
    pub fn drive(&mut self, session_secs: f64) -> Result<u32, HapticError> {
        if !self.is_playing_entrainment {
            return Ok(0);
        }

        let interval = 60.0 / self.rhythm_bpm;
        let mut played = 0;
        while self.next_tick_secs <= session_secs {
            if played == MAX_TICKS_PER_DRIVE {
                tracing::warn!(session_secs, "tick backlog capped; resynchronizing");
                self.next_tick_secs = session_secs + interval;
                break;
            }
            self.actuator.transient_tick(1.0, 1.0)?;
            self.next_tick_secs += interval;
            played += 1;
        }
        Ok(played)
    }

    /// Stop the entrainment metronome.
    pub fn stop_entrainment(&mut self) {
        if self.is_playing_entrainment {
            tracing::info!("gait entrainment stopped");
        }
        self.is_playing_entrainment = false;
    }

    /// Immediately halt all playback. Safe to call at any time, including
    /// before anything has played.
    pub fn emergency_stop(&mut self) {
        if self.is_playing_entrainment {
            tracing::warn!("haptic emergency stop");
        }
        self.is_playing_entrainment = false;
        self.next_tick_secs = 0.0;
    }

    /// One continuous correction pulse scaled by the given tremor
    /// amplitude and the configured intensity.
    pub fn play_tremor_correction(&mut self, amplitude: f64) -> Result<(), HapticError> {
        let intensity = (amplitude.clamp(0.0, 1.0) * self.haptic_intensity).clamp(0.0, 1.0);
        self.actuator.continuous_pulse(intensity, 0.5, 0.1)
    }

    /// Access the actuator (tests inspect recorded events through this).
    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> HapticController<NullActuator> {
        HapticController::new(NullActuator::default())
    }

    #[test]
    fn test_defaults() {
        let c = controller();
        assert!(!c.is_playing_entrainment());
        assert_eq!(c.rhythm_bpm(), 60.0);
        assert_eq!(c.haptic_intensity(), 1.0);
    }

    #[test]
    fn test_bpm_is_settable_within_range() {
        let mut c = controller();
        c.set_rhythm_bpm(120.0);
        assert_eq!(c.rhythm_bpm(), 120.0);
        c.set_rhythm_bpm(40.0);
        assert_eq!(c.rhythm_bpm(), 40.0);
    }

    #[test]
    fn test_bpm_clamps_out_of_range_values() {
        let mut c = controller();
        c.set_rhythm_bpm(500.0);
        assert_eq!(c.rhythm_bpm(), 180.0);
        c.set_rhythm_bpm(1.0);
        assert_eq!(c.rhythm_bpm(), 30.0);
    }

    #[test]
    fn test_intensity_is_settable_and_clamped() {
        let mut c = controller();
        c.set_haptic_intensity(0.5);
        assert_eq!(c.haptic_intensity(), 0.5);
        c.set_haptic_intensity(0.0);
        assert_eq!(c.haptic_intensity(), 0.0);
        c.set_haptic_intensity(3.0);
        assert_eq!(c.haptic_intensity(), 1.0);
    }

    #[test]
    fn test_emergency_stop_before_playback_is_safe() {
        let mut c = controller();
        c.emergency_stop();
        assert!(!c.is_playing_entrainment());
    }

    #[test]
    fn test_metronome_ticks_at_tempo() {
        let mut c = controller();
        c.set_rhythm_bpm(120.0); // one tick every 0.5 s
        c.start_gait_entrainment(0.0);

        // Ticks due at 0.0, 0.5, 1.0, 1.5, 2.0.
        let played = c.drive(2.0).unwrap();
        assert_eq!(played, 5);
        assert_eq!(c.actuator().ticks, 5);

        // Nothing new is due immediately after.
        assert_eq!(c.drive(2.0).unwrap(), 0);
    }

    #[test]
    fn test_clock_jump_caps_ticks_and_resynchronizes() {
        let mut c = controller(); // 60 bpm: one tick per second
        c.start_gait_entrainment(0.0);

        // A wildly late drive (e.g. a corrupt recording timestamp) emits at
        // most the cap, never one tick per elapsed beat.
        let played = c.drive(1e12).unwrap();
        assert_eq!(played, MAX_TICKS_PER_DRIVE);
        assert_eq!(c.actuator().ticks, MAX_TICKS_PER_DRIVE);

        // The metronome resumes normal cadence from the new position.
        assert_eq!(c.drive(1e12).unwrap(), 0);
        assert_eq!(c.drive(1e12 + 1.0).unwrap(), 1);
    }

    #[test]
    fn test_stop_halts_metronome() {
        let mut c = controller();
        c.start_gait_entrainment(0.0);
        c.drive(1.0).unwrap();
        c.stop_entrainment();
        assert!(!c.is_playing_entrainment());
        assert_eq!(c.drive(10.0).unwrap(), 0);
    }

    #[test]
    fn test_tremor_correction_scales_by_configured_intensity() {
        let mut c = controller();
        c.set_haptic_intensity(0.5);
        c.play_tremor_correction(0.8).unwrap();
        assert_eq!(c.actuator().pulses, 1);
    }

    #[test]
    fn test_error_descriptions() {
        assert!(HapticError::EngineNotSupported
            .to_string()
            .contains("not supported"));
        assert!(HapticError::PatternFailed("busy".into())
            .to_string()
            .contains("Failed to play"));
    }
}
