//! target_replay - run a recorded detection log through the target lock
//!
//! Reads JSON Lines frame records (frame size + detector output), selects and
//! tracks a single person across frames and prints one telemetry line per
//! frame. With `--realtime` frames are paced at the configured frame rate and
//! Ctrl-C stops the run.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use target_lock::{
    format_tracking_output, plan_overlay, DetectionSource, FrameOutcome, FrameRunner,
    ReplaySource, TrackingSession, TrackingState, VisionConfig,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "target_replay",
    about = "Replay a detection log through single-target lock selection"
)]
struct Args {
    /// Detection log (JSON Lines), or "-" for stdin
    #[arg(long, short, default_value = "-")]
    input: String,

    /// JSON config file (defaults plus TARGET_LOCK_* env overrides otherwise)
    #[arg(long, env = "TARGET_LOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Pace frames at the configured frame rate
    #[arg(long)]
    realtime: bool,

    /// Include the overlay draw list in JSON output
    #[arg(long)]
    overlay: bool,
}

#[derive(Serialize)]
struct FrameReport<'a> {
    frame: u64,
    skipped: bool,
    target: Option<&'a TrackingState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlay: Option<Vec<target_lock::DrawOp>>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = VisionConfig::load_from(args.config.as_deref())?;
    log::info!(
        "deadzone={}x{}px, persistence_radius={:.1}px, conf={:.2}, fps={}",
        config.tracking.deadzone_x_px(),
        config.tracking.deadzone_y_px(),
        config.tracking.lock_persistence_radius_px(),
        config.confidence_threshold,
        config.frame_rate
    );

    let mut source: Box<dyn DetectionSource> = if args.input == "-" {
        Box::new(ReplaySource::stdin())
    } else {
        Box::new(ReplaySource::open(&args.input)?)
    };
    source.warm_up()?;
    log::info!("reading detections from {} ({})", args.input, source.name());

    let running = Arc::new(AtomicBool::new(true));
    if args.realtime {
        let flag = running.clone();
        ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
            .map_err(|e| anyhow!("error setting Ctrl-C handler: {}", e))?;
    }

    let frame_interval = config.frame_interval();
    let mut runner = FrameRunner::new(
        TrackingSession::new(config.tracking),
        config.confidence_threshold,
    );

    while running.load(Ordering::SeqCst) {
        let loop_start = Instant::now();
        let Some(outcome) = runner.step(source.as_mut())? else {
            break;
        };
        emit(&args, &config, &outcome)?;

        if args.realtime {
            if let Some(remaining) = frame_interval.checked_sub(loop_start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    let stats = runner.session().stats();
    log::info!(
        "replay finished: {} processed, {} skipped, {} with target, {} lock switches",
        stats.frames_processed,
        stats.frames_skipped,
        stats.frames_with_target,
        stats.lock_switches
    );
    Ok(())
}

fn emit(args: &Args, config: &VisionConfig, outcome: &FrameOutcome) -> Result<()> {
    if outcome.skipped {
        log::debug!("frame {} dropped; reporting held lock", outcome.index);
    }
    println!("{}", render(args.format, args.overlay, config, outcome)?);
    Ok(())
}

/// One output line per frame. Dropped frames report the lock held over the gap.
fn render(
    format: OutputFormat,
    with_overlay: bool,
    config: &VisionConfig,
    outcome: &FrameOutcome,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_tracking_output(outcome.state.as_ref())),
        OutputFormat::Json => {
            let overlay = with_overlay.then(|| {
                plan_overlay(
                    outcome.geometry,
                    &outcome.detections,
                    outcome.state.as_ref(),
                    &config.tracking,
                    &config.overlay,
                )
            });
            let report = FrameReport {
                frame: outcome.index,
                skipped: outcome.skipped,
                target: outcome.state.as_ref(),
                overlay,
            };
            Ok(serde_json::to_string(&report)?)
        }
    }
}
