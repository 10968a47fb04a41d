//! End-to-end engine scenarios driven through the public surface only.

use proprio_motion_core::{
    AnalysisError, AnalysisMode, EngineConfig, EngineSnapshot, GaitConfig, MotionEngine,
};
use proprio_pose_model::{Joint, KeypointObservation, PoseFrame};

const FRAME_NS: u64 = 20_000_000; // 50 Hz

fn scenario_config() -> EngineConfig {
    EngineConfig {
        low_confidence_frame_limit: 10,
        gait: GaitConfig {
            lift_threshold: 0.05,
            smoothing_alpha: 0.5,
            min_strike_interval_ns: 100_000_000,
            stride_window: 8,
        },
        ..Default::default()
    }
}

fn engine_in(mode: AnalysisMode) -> MotionEngine {
    let mut engine = MotionEngine::new(scenario_config()).unwrap();
    engine.set_mode(mode);
    engine.start_analysis();
    engine
}

fn wrist_frame(index: u64, x: f64, confidence: f64) -> PoseFrame {
    PoseFrame::single(index * FRAME_NS, Joint::RightWrist, x, 0.5, confidence)
}

/// Both ankles at 50 Hz: left swings early in each cycle, right swings
/// half a cycle later. One strike per side per 40-frame cycle.
fn walking_frames(cycles: usize, start_index: u64) -> Vec<PoseFrame> {
    let mut frames = Vec::new();
    let mut index = start_index;

    let mut push = |index: u64, left_y: f64, right_y: f64| {
        frames.push(PoseFrame::new(
            index * FRAME_NS,
            vec![
                KeypointObservation::new(Joint::LeftAnkle, 0.45, left_y, 0.9),
                KeypointObservation::new(Joint::RightAnkle, 0.55, right_y, 0.9),
            ],
        ));
    };

    // Settle both baselines.
    for _ in 0..10 {
        push(index, 0.9, 0.9);
        index += 1;
    }
    for _ in 0..cycles {
        for phase in 0..40u64 {
            let left_y = if phase < 8 { 0.7 } else { 0.9 };
            let right_y = if (20..28).contains(&phase) { 0.7 } else { 0.9 };
            push(index, left_y, right_y);
            index += 1;
        }
    }
    frames
}

#[test]
fn steady_wrist_reports_zero_amplitude() {
    let mut engine = engine_in(AnalysisMode::Tremor);
    for i in 0..60 {
        engine.process_frame(&wrist_frame(i, 0.5, 0.9)).unwrap();
    }
    assert_eq!(engine.snapshot().tremor_amplitude, 0.0);
}

#[test]
fn oscillating_wrist_reports_bounded_deterministic_amplitude() {
    let sequence: Vec<f64> = (0..60)
        .map(|i| if i % 2 == 0 { 0.51 } else { 0.49 })
        .collect();

    let run = || {
        let mut engine = engine_in(AnalysisMode::Tremor);
        for (i, &x) in sequence.iter().enumerate() {
            engine.process_frame(&wrist_frame(i as u64, x, 0.9)).unwrap();
        }
        engine.snapshot().tremor_amplitude
    };

    let first = run();
    let second = run();
    assert!(first > 0.0);
    assert!(first <= 1.0);
    assert_eq!(first, second, "same input sequence must reproduce exactly");
}

#[test]
fn sustained_low_confidence_surfaces_error_and_keeps_last_good_metrics() {
    let mut engine = engine_in(AnalysisMode::Tremor);

    // Establish a last-good amplitude.
    for i in 0..30 {
        let x = if i % 2 == 0 { 0.52 } else { 0.48 };
        engine.process_frame(&wrist_frame(i, x, 0.9)).unwrap();
    }
    let last_good = engine.snapshot().tremor_amplitude;
    assert!(last_good > 0.0);

    // Ten consecutive frames below the 0.3 gate (limit configured to 10).
    for i in 30..40 {
        engine.process_frame(&wrist_frame(i, 0.9, 0.2)).unwrap();
        assert_eq!(engine.snapshot().tremor_amplitude, last_good);
    }

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.last_error, Some(AnalysisError::LowConfidence));
    assert_eq!(snapshot.tremor_amplitude, last_good);

    // The next qualifying sample self-heals.
    engine.process_frame(&wrist_frame(40, 0.5, 0.9)).unwrap();
    assert_eq!(engine.snapshot().last_error, None);
}

#[test]
fn start_then_immediate_stop_leaves_defaults() {
    let mut engine = MotionEngine::new(scenario_config()).unwrap();
    engine.start_analysis();
    engine.stop_analysis();

    let snapshot = engine.snapshot();
    assert!(!snapshot.is_active);
    assert_eq!(snapshot.tremor_amplitude, 0.0);
    assert_eq!(snapshot.gait_stability_index, 1.0);
    assert_eq!(snapshot.gait_symmetry_index, 1.0);
    assert_eq!(snapshot.session_step_count, 0);
}

#[test]
fn reset_restores_default_metrics_regardless_of_prior_state() {
    let mut engine = engine_in(AnalysisMode::Gait);
    for frame in walking_frames(5, 0) {
        engine.process_frame(&frame).unwrap();
    }
    engine.notify_camera_unavailable();
    assert!(engine.snapshot().session_step_count > 0);

    engine.reset_metrics();

    let snapshot = engine.snapshot();
    let defaults = EngineSnapshot::default();
    assert_eq!(snapshot.tremor_amplitude, defaults.tremor_amplitude);
    assert_eq!(snapshot.gait_stability_index, defaults.gait_stability_index);
    assert_eq!(snapshot.gait_symmetry_index, defaults.gait_symmetry_index);
    assert_eq!(snapshot.session_step_count, 0);
    assert_eq!(snapshot.last_error, None);
    // Lifecycle and mode are not reset's business.
    assert!(snapshot.is_active);
    assert_eq!(snapshot.current_mode, AnalysisMode::Gait);
}

#[test]
fn walking_produces_steps_and_bounded_indices() {
    let mut engine = engine_in(AnalysisMode::Gait);
    let mut previous_steps = 0;
    for frame in walking_frames(6, 0) {
        engine.process_frame(&frame).unwrap();
        let snapshot = engine.snapshot();
        assert!(snapshot.session_step_count >= previous_steps);
        previous_steps = snapshot.session_step_count;
        assert!((0.0..=1.0).contains(&snapshot.gait_stability_index));
        assert!((0.0..=1.0).contains(&snapshot.gait_symmetry_index));
    }

    let snapshot = engine.snapshot();
    assert!(snapshot.session_step_count >= 4, "steps = {}", snapshot.session_step_count);
    // Metronome-regular synthetic gait should read as stable and symmetric.
    assert!(snapshot.gait_stability_index > 0.9);
    assert!(snapshot.gait_symmetry_index > 0.9);
}

#[test]
fn symmetry_is_invariant_under_side_relabeling() {
    let frames = walking_frames(6, 0);

    let run = |mirror: bool| {
        let mut engine = engine_in(AnalysisMode::Gait);
        for frame in &frames {
            let frame = if mirror { frame.mirrored() } else { frame.clone() };
            engine.process_frame(&frame).unwrap();
        }
        engine.snapshot()
    };

    let original = run(false);
    let mirrored = run(true);
    assert_eq!(original.gait_symmetry_index, mirrored.gait_symmetry_index);
    assert_eq!(original.gait_stability_index, mirrored.gait_stability_index);
    assert_eq!(original.session_step_count, mirrored.session_step_count);
}

#[test]
fn mode_detour_does_not_disturb_tremor_buffers() {
    let head: Vec<f64> = (0..40)
        .map(|i| if i % 2 == 0 { 0.515 } else { 0.485 })
        .collect();
    let tail: Vec<f64> = (0..20)
        .map(|i| if i % 3 == 0 { 0.52 } else { 0.49 })
        .collect();

    // Control: tremor samples only, no detour.
    let mut control = engine_in(AnalysisMode::Tremor);
    for (i, &x) in head.iter().chain(tail.iter()).enumerate() {
        control.process_frame(&wrist_frame(i as u64, x, 0.9)).unwrap();
    }

    // Detour: same samples with a Gait excursion in between.
    let mut detoured = engine_in(AnalysisMode::Tremor);
    let mut index = 0u64;
    for &x in &head {
        detoured.process_frame(&wrist_frame(index, x, 0.9)).unwrap();
        index += 1;
    }
    detoured.set_mode(AnalysisMode::Gait);
    for frame in walking_frames(3, index) {
        detoured.process_frame(&frame).unwrap();
    }
    index += 10 + 3 * 40;
    detoured.set_mode(AnalysisMode::Tremor);
    for &x in &tail {
        detoured.process_frame(&wrist_frame(index, x, 0.9)).unwrap();
        index += 1;
    }

    assert_eq!(
        control.snapshot().tremor_amplitude,
        detoured.snapshot().tremor_amplitude,
        "gait detour must not touch tremor windows"
    );
}

#[test]
fn concurrent_reader_sees_whole_snapshots() {
    let mut engine = engine_in(AnalysisMode::Tremor);
    let reader = engine.state_handle();

    let handle = std::thread::spawn(move || {
        for _ in 0..500 {
            let snapshot = reader.get();
            assert!(!snapshot.tremor_amplitude.is_nan());
            assert!((0.0..=1.0).contains(&snapshot.tremor_amplitude));
            assert!((0.0..=1.0).contains(&snapshot.gait_stability_index));
            assert!((0.0..=1.0).contains(&snapshot.gait_symmetry_index));
        }
    });

    for i in 0..500 {
        let x = 0.5 + 0.01 * ((i % 4) as f64 - 1.5);
        engine.process_frame(&wrist_frame(i, x, 0.9)).unwrap();
    }

    handle.join().unwrap();
}
