//! Show the effective configuration and validate engine defaults.

use proprio_common::config::AppConfig;
use proprio_motion_core::EngineConfig;

pub fn run() -> anyhow::Result<()> {
    println!("Proprio Configuration Check");
    println!("{}", "=".repeat(50));

    let app = AppConfig::load();
    println!("Sessions directory: {}", app.sessions_dir.display());
    if app.sessions_dir.exists() {
        println!("  [OK] exists");
    } else {
        println!("  [WARN] does not exist yet (created on first recording)");
    }

    println!();
    println!("Session defaults:");
    println!("  Sample rate: {}Hz", app.session.sample_rate_hz);
    println!("  Mode: {}", app.session.default_mode);
    println!("  Auto entrainment: {}", app.session.auto_entrainment);

    println!();
    println!("Logging:");
    println!("  Level: {}", app.logging.level);
    println!("  JSON: {}", app.logging.json);
    match app.logging.file {
        Some(ref path) => println!("  File: {}", path.display()),
        None => println!("  File: (stderr only)"),
    }

    println!();
    let engine = EngineConfig::default();
    match engine.validate() {
        Ok(()) => println!("[OK] Engine defaults are valid"),
        Err(e) => println!("[FAIL] Engine defaults rejected: {e}"),
    }
    println!("  Confidence threshold: {}", engine.confidence_threshold);
    println!("  Window capacity: {}", engine.window_capacity);
    println!(
        "  Tremor joint: {:?} (scale {})",
        engine.tremor.tracked_joint, engine.tremor.amplitude_scale
    );
    println!(
        "  Gait lift threshold: {} ({}ms refractory)",
        engine.gait.lift_threshold,
        engine.gait.min_strike_interval_ns / 1_000_000
    );

    Ok(())
}
