//! centermark - live center-object highlighter
//!
//! Opens the configured camera, loads the detector backend, and runs the
//! per-frame pipeline until the user quits (q / Escape / window close /
//! Ctrl-C) or the camera stops delivering frames.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;

use centermark::config::CentermarkConfig;
use centermark::detect::create_backend;
use centermark::display::{Display, DisplayConfig};
use centermark::ingest::{CameraConfig, CameraSource};
use centermark::runner::Runner;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Camera device path, or stub:// for synthetic frames.
    #[arg(long)]
    device: Option<String>,
    /// Requested capture width (best-effort).
    #[arg(long)]
    width: Option<u32>,
    /// Requested capture height (best-effort).
    #[arg(long)]
    height: Option<u32>,
    /// Requested capture frame rate; 0 keeps the driver default.
    #[arg(long)]
    fps: Option<u32>,
    /// Path to the ONNX detection model.
    #[arg(long)]
    model: Option<PathBuf>,
    /// Detector backend name ("tract" or "stub").
    #[arg(long)]
    backend: Option<String>,
    /// Minimum detection confidence in [0, 1].
    #[arg(long)]
    confidence: Option<f32>,
    /// Run without a display window.
    #[arg(long)]
    headless: bool,
    /// Stop after this many frames (mainly for demos and smoke tests).
    #[arg(long)]
    max_frames: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = CentermarkConfig::load()?;
    apply_args(&mut cfg, &args);
    cfg.validate()?;

    log::info!(
        "centermark {}: device={} backend={} model={}",
        env!("CARGO_PKG_VERSION"),
        cfg.camera.device,
        cfg.model.backend,
        cfg.model.path.display()
    );

    let mut source = CameraSource::new(CameraConfig {
        device: cfg.camera.device.clone(),
        width: cfg.camera.width,
        height: cfg.camera.height,
        target_fps: cfg.camera.target_fps,
    })?;
    source.connect()?;

    let mut detector = create_backend(&cfg.model)?;
    detector.warm_up().context("detector warm-up failed")?;
    log::info!("detector backend '{}' ready", detector.name());

    let display = Display::new(DisplayConfig {
        window_title: cfg.display.window_title.clone(),
        headless: cfg.display.headless,
    })?;

    let mut runner = Runner::new(source, detector, display).with_max_frames(args.max_frames);

    let stop_flag = runner.stop_flag();
    ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    })
    .context("install Ctrl-C handler")?;

    let stats = runner.run()?;
    log::info!(
        "stopped after {} frames, {} detections, {} highlighted",
        stats.frames,
        stats.detections,
        stats.highlighted
    );
    Ok(())
}

fn apply_args(cfg: &mut CentermarkConfig, args: &Args) {
    if let Some(device) = &args.device {
        cfg.camera.device = device.clone();
    }
    if let Some(width) = args.width {
        cfg.camera.width = width;
    }
    if let Some(height) = args.height {
        cfg.camera.height = height;
    }
    if let Some(fps) = args.fps {
        cfg.camera.target_fps = fps;
    }
    if let Some(model) = &args.model {
        cfg.model.path = model.clone();
    }
    if let Some(backend) = &args.backend {
        cfg.model.backend = backend.clone();
    }
    if let Some(confidence) = args.confidence {
        cfg.model.confidence_threshold = confidence;
    }
    if args.headless {
        cfg.display.headless = true;
    }
}
