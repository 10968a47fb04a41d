//! Replay a recorded pose stream through the analysis engine.

use std::path::PathBuf;

use proprio_haptics::{entrainment_plan, EntrainmentConfig, HapticController, NullActuator};
use proprio_motion_core::{AnalysisMode, EngineConfig, MotionEngine};
use proprio_pose_model::stream::read_recording;

pub fn run(
    path: PathBuf,
    mode: String,
    confidence_threshold: Option<f64>,
    entrain: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mode = parse_mode(&mode)?;

    let mut config = EngineConfig::default();
    if let Some(threshold) = confidence_threshold {
        config.confidence_threshold = threshold;
    }

    let (header, frames) = read_recording(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read recording {}: {e}", path.display()))?;

    println!("Replaying: {}", path.display());
    if let Some(ref h) = header {
        println!(
            "  Recorded: {} @ {}Hz{}",
            h.epoch_wall,
            h.sample_rate_hz,
            h.source
                .as_deref()
                .map(|s| format!(" ({s})"))
                .unwrap_or_default()
        );
    }
    println!("  Frames: {}", frames.len());

    if frames.is_empty() {
        println!("  Nothing to replay.");
        return Ok(());
    }

    let mut engine =
        MotionEngine::new(config).map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    engine.set_mode(mode);
    engine.start_analysis();

    let mut skipped = 0usize;
    for frame in &frames {
        if engine.process_frame(frame).is_err() {
            skipped += 1;
        }
    }
    engine.stop_analysis();

    let duration_secs =
        frames[frames.len() - 1].timestamp_secs() - frames[0].timestamp_secs();
    println!("  Duration: {duration_secs:.1}s");
    if skipped > 0 {
        println!("  Skipped {skipped} malformed frames");
    }

    let snapshot = engine.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!();
    println!("Results ({}):", mode.label());
    match mode {
        AnalysisMode::Tremor => {
            println!(
                "  Tremor amplitude: {:.3} {}",
                snapshot.tremor_amplitude,
                snapshot.tremor_trend.arrow()
            );
        }
        AnalysisMode::Gait => {
            println!("  Steps: {}", snapshot.session_step_count);
            println!("  Stability index: {:.3}", snapshot.gait_stability_index);
            println!("  Symmetry index: {:.3}", snapshot.gait_symmetry_index);
            if duration_secs > 0.0 {
                let cadence = snapshot.session_step_count as f64 / duration_secs * 60.0;
                println!("  Cadence: {cadence:.1} steps/min");
            }
        }
    }
    if let Some(ref error) = snapshot.last_error {
        println!("  Last condition: {error}");
    }

    if entrain {
        let plan = entrainment_plan(&snapshot, &EntrainmentConfig::default());
        println!();
        println!("Entrainment plan:");
        println!("  Tempo: {:.1} bpm", plan.tempo_bpm);
        println!("  Correction intensity: {:.2}", plan.intensity);

        // Dry-run the metronome over the recording's duration.
        let mut controller = HapticController::new(NullActuator::default());
        controller.set_rhythm_bpm(plan.tempo_bpm);
        controller.set_haptic_intensity(plan.intensity);
        controller.start_gait_entrainment(0.0);
        let ticks = controller
            .drive(duration_secs)
            .map_err(|e| anyhow::anyhow!("Haptic simulation failed: {e}"))?;
        controller.stop_entrainment();
        println!("  Metronome would play {ticks} ticks over {duration_secs:.1}s");
    }

    Ok(())
}

fn parse_mode(mode: &str) -> anyhow::Result<AnalysisMode> {
    match mode {
        "gait" => Ok(AnalysisMode::Gait),
        "tremor" => Ok(AnalysisMode::Tremor),
        other => anyhow::bail!("Unknown mode '{other}' (expected gait|tremor)"),
    }
}
