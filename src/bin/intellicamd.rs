//! intellicamd - Intellicam detection-alert daemon
//!
//! Per frame, this daemon:
//! 1. Pulls a frame from the configured source
//! 2. Runs the detector backend
//! 3. Feeds the snapshot through the pipeline (sanitize, track, debounce)
//! 4. Hands dangerous new labels to the async dispatcher (speech/screenshot/log)
//! 5. Prints the presence panel when it changes

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use intellicam::{
    open_source, render_presence, AlertDispatcher, AlertSinks, Clock, CommandSpeech,
    DetectorBackend, FileLogSink, IntellicamConfig, JpegScreenshotSink, Pipeline, StubDetector,
};

#[derive(Parser, Debug)]
#[command(name = "intellicamd", about = "Intellicam detection-alert daemon")]
struct Args {
    /// Config file path (overrides INTELLICAM_CONFIG).
    #[arg(long, env = "INTELLICAM_CONFIG")]
    config: Option<PathBuf>,

    /// Camera url override (e.g. stub://webcam).
    #[arg(long)]
    source: Option<String>,

    /// Stop after this many frames (smoke runs).
    #[arg(long)]
    frames: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = IntellicamConfig::load_with(args.config.as_deref())?;
    if let Some(source) = args.source {
        cfg.camera.url = source;
    }

    let clock = Clock::new();
    let mut source = open_source(&cfg.camera, &clock)?;
    let mut detector: Box<dyn DetectorBackend> =
        Box::new(StubDetector::looping(StubDetector::demo_script()));
    detector.warm_up()?;

    let sinks = AlertSinks {
        speech: Box::new(CommandSpeech::new(cfg.tts_command.clone())),
        screenshots: Box::new(JpegScreenshotSink::new(&cfg.screenshot_dir)?),
        log: Box::new(FileLogSink::new(&cfg.alert_log_path)),
    };
    let dispatcher = AlertDispatcher::spawn(sinks);
    let counters = dispatcher.counters();
    let mut pipeline = Pipeline::new(&cfg, dispatcher);

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_flag.store(true, Ordering::SeqCst);
    })?;

    let frame_interval = Duration::from_millis(1000 / u64::from(cfg.camera.target_fps.max(1)));
    let mut last_health_log = Instant::now();
    let mut last_panel = String::new();
    let mut frame_count = 0u64;

    log::info!(
        "intellicamd running: source={} detector={} dangerous_labels={:?}",
        cfg.camera.url,
        detector.name(),
        cfg.dangerous_labels
    );
    log::info!(
        "display_timeout={:.1}s alert_cooldown={:.0}s threshold={:.2}",
        cfg.display_timeout,
        cfg.alert_cooldown,
        cfg.alert_confidence_threshold
    );

    while !shutdown.load(Ordering::SeqCst) {
        let frame = source.next_frame()?;
        let detections = match detector.detect(&frame) {
            Ok(detections) => detections,
            Err(e) => {
                log::warn!("detector failed at t={:.3}: {}", frame.timestamp, e);
                vec![]
            }
        };

        let outcome = pipeline.process(&frame, detections);
        for label in &outcome.alerted {
            log::info!("alert: {} at t={:.3}", label, frame.timestamp);
        }

        let panel = render_presence(&outcome.presence);
        if panel != last_panel {
            print!("{panel}");
            last_panel = panel;
        }

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            let stats = source.stats();
            log::info!(
                "source health={} frames={} url={} alerts_dispatched={} sink_failures={} dropped_detections={}",
                source.is_healthy(),
                stats.frames_captured,
                stats.url,
                counters.dispatched(),
                counters.failures(),
                pipeline.dropped_total()
            );
            last_health_log = Instant::now();
        }

        frame_count += 1;
        if let Some(cap) = args.frames {
            if frame_count >= cap {
                break;
            }
        }

        std::thread::sleep(frame_interval);
    }

    // Dropping the pipeline drops the dispatcher, which joins the worker;
    // anything still queued is drained, nothing is retried.
    log::info!(
        "shutting down after {} frames, {} alerts dispatched",
        frame_count,
        counters.dispatched()
    );
    Ok(())
}
