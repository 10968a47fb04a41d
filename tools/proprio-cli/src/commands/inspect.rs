//! Show recording metadata and per-joint signal quality.

use std::collections::HashMap;
use std::path::PathBuf;

use proprio_pose_model::stream::read_recording;
use proprio_pose_model::Joint;

pub fn run(path: PathBuf, confidence_threshold: f64) -> anyhow::Result<()> {
    let (header, frames) = read_recording(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read recording {}: {e}", path.display()))?;

    println!("Recording: {}", path.display());
    match header {
        Some(h) => {
            println!("  Schema: {}", h.schema_version);
            println!("  Recorded: {}", h.epoch_wall);
            println!("  Sample rate: {}Hz", h.sample_rate_hz);
            if let Some(source) = h.source {
                println!("  Source: {source}");
            }
        }
        None => println!("  (no header)"),
    }
    println!("  Frames: {}", frames.len());

    if frames.is_empty() {
        return Ok(());
    }

    let duration_secs =
        frames[frames.len() - 1].timestamp_secs() - frames[0].timestamp_secs();
    println!("  Duration: {duration_secs:.1}s");
    if duration_secs > 0.0 {
        println!(
            "  Effective rate: {:.1}Hz",
            (frames.len() as f64 - 1.0) / duration_secs
        );
    }

    // Per-joint counts: (observations, observations at/above the threshold).
    let mut stats: HashMap<Joint, (usize, usize)> = HashMap::new();
    for frame in &frames {
        for obs in &frame.keypoints {
            let entry = stats.entry(obs.joint).or_default();
            entry.0 += 1;
            if obs.confidence >= confidence_threshold {
                entry.1 += 1;
            }
        }
    }

    let mut rows: Vec<(String, usize, usize)> = stats
        .into_iter()
        .map(|(joint, (seen, qualifying))| (format!("{joint:?}"), seen, qualifying))
        .collect();
    rows.sort();

    println!();
    println!("Signal quality (threshold {confidence_threshold}):");
    for (name, seen, qualifying) in rows {
        let ratio = qualifying as f64 / seen as f64;
        println!("  {name:<14} {qualifying:>6}/{seen:<6} qualifying ({:.0}%)", ratio * 100.0);
    }

    Ok(())
}
