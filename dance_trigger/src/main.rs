//! dance_trigger — command-line entry point.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dance_trigger::app::{self, AppError};
use dance_trigger::config::{AppConfig, BackendKind};
use dance_trigger::source::{spawn_frame_source, ReplaySource, ScriptedSource};

#[derive(Parser, Debug)]
#[command(name = "dance_trigger", version, about = "Cue a track for every recognised dance move")]
struct Cli {
    /// TOML config file; every key is optional
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay poses from a JSON-lines recording
    #[arg(short, long, conflicts_with = "demo")]
    replay: Option<PathBuf>,

    /// Run the built-in scripted demo (default when no --replay is given)
    #[arg(long)]
    demo: bool,

    /// Minimum pose-level score
    #[arg(long)]
    min_pose: Option<f32>,

    /// Minimum per-part confidence
    #[arg(long)]
    min_part: Option<f32>,

    /// Frames a new gesture must hold before it is confirmed
    #[arg(long)]
    confirm_frames: Option<u32>,

    /// Playback backend
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None       => AppConfig::default(),
    };
    if let Some(v) = cli.min_pose       { cfg.min_pose_confidence = v; }
    if let Some(v) = cli.min_part       { cfg.min_part_confidence = v; }
    if let Some(v) = cli.confirm_frames { cfg.confirm_frames = v; }
    if let Some(b) = cli.backend        { cfg.playback.backend = b; }

    if cli.print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Dance Trigger — pose-driven playback cues           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let interval = Duration::from_millis(cfg.frame_interval_ms);
    let frames = match &cli.replay {
        Some(path) => {
            println!("  Source:  replay {}", path.display());
            spawn_frame_source(ReplaySource::open(path, interval)?)
        }
        None => {
            debug!(requested = cli.demo, "no recording given; running the scripted demo");
            let script = ScriptedSource::demo(interval);
            println!("  Source:  scripted demo ({} frames)", script.frames());
            spawn_frame_source(script)
        }
    };
    println!("  Backend: {:?}", cfg.playback.backend);
    println!();

    let stats = app::run(&cfg, frames)?;

    println!();
    println!("  {} frames, {} transitions, {} cues ({} coalesced, {} dropped)",
        stats.frames, stats.transitions, stats.cues_submitted, stats.cues_coalesced, stats.cues_dropped);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn replay_and_demo_are_exclusive() {
        assert!(Cli::try_parse_from(["dance_trigger", "--demo", "--replay", "poses.jsonl"]).is_err());
        let cli = Cli::try_parse_from(["dance_trigger", "--replay", "poses.jsonl"]).unwrap();
        assert_eq!(cli.replay.as_deref(), Some(std::path::Path::new("poses.jsonl")));
        assert!(!cli.demo);
    }
}
