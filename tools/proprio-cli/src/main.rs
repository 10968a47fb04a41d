//! Proprio CLI — Command-line interface for session replay and inspection.
//!
//! Usage:
//!   proprio replay <PATH>      Run the analysis engine over a recording
//!   proprio inspect <PATH>     Show recording metadata and signal quality
//!   proprio check              Show effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "proprio",
    about = "Motion analysis for gait and tremor biofeedback",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded pose stream through the analysis engine
    Replay {
        /// Path to the recording (JSONL)
        path: PathBuf,

        /// Analysis mode: gait|tremor
        #[arg(short, long, default_value = "gait")]
        mode: String,

        /// Minimum keypoint confidence for a sample to count
        #[arg(long)]
        confidence_threshold: Option<f64>,

        /// Derive and simulate a haptic entrainment plan after replay
        #[arg(long)]
        entrain: bool,

        /// Print the final engine state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recording metadata and per-joint signal quality
    Inspect {
        /// Path to the recording (JSONL)
        path: PathBuf,

        /// Confidence threshold used for the quality report
        #[arg(long, default_value = "0.3")]
        confidence_threshold: f64,
    },

    /// Show the effective configuration and validate engine defaults
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    proprio_common::logging::init_logging(&proprio_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Replay {
            path,
            mode,
            confidence_threshold,
            entrain,
            json,
        } => commands::replay::run(path, mode, confidence_threshold, entrain, json),
        Commands::Inspect {
            path,
            confidence_threshold,
        } => commands::inspect::run(path, confidence_threshold),
        Commands::Check => commands::check::run(),
    }
}
