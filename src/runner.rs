//! The per-frame run loop.
//!
//! A single-threaded, blocking pipeline: read one frame, run the detector,
//! select the center target, annotate, present, poll for quit. There is no
//! overlap between frames; the effective frame rate is the inverse of total
//! per-frame latency.
//!
//! The loop has two states, RUNNING and STOPPED. It stops on the first
//! failed frame read (no retry, no reconnect), on the quit key, on a stop
//! flag raised from a signal handler, or after an optional frame limit.
//! A detector error propagates out and is fatal. The camera, model, and
//! window are owned by the runner and released on drop on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::annotate;
use crate::detect::DetectorBackend;
use crate::display::Display;
use crate::ingest::CameraSource;
use crate::select;

const HEALTH_LOG_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopState {
    Running,
    Stopped,
}

/// Counters accumulated over one run.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunStats {
    pub frames: u64,
    pub detections: u64,
    /// Frames on which a center target was highlighted.
    pub highlighted: u64,
}

/// Owns the camera, detector, and display for the duration of a run.
pub struct Runner {
    source: CameraSource,
    detector: Box<dyn DetectorBackend>,
    display: Display,
    stop_flag: Arc<AtomicBool>,
    max_frames: Option<u64>,
}

impl Runner {
    pub fn new(source: CameraSource, detector: Box<dyn DetectorBackend>, display: Display) -> Self {
        Self {
            source,
            detector,
            display,
            stop_flag: Arc::new(AtomicBool::new(false)),
            max_frames: None,
        }
    }

    /// Stop after this many frames. Unbounded when `None`.
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Flag polled once per iteration; raising it stops the loop cleanly.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Drive the loop until it stops. Returns accumulated counters.
    pub fn run(&mut self) -> Result<RunStats> {
        let mut stats = RunStats::default();
        let mut state = LoopState::Running;
        let started = Instant::now();
        let mut last_health_log = Instant::now();

        while state == LoopState::Running {
            if self.stop_flag.load(Ordering::Relaxed) {
                log::info!("stop requested, shutting down");
                state = LoopState::Stopped;
                continue;
            }
            if let Some(max_frames) = self.max_frames {
                if stats.frames >= max_frames {
                    state = LoopState::Stopped;
                    continue;
                }
            }

            let mut frame = match self.source.next_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    // A single failed read is fatal to the loop; no retry.
                    log::error!("frame read failed: {:#}", err);
                    state = LoopState::Stopped;
                    continue;
                }
            };

            let detections = self.detector.infer(&frame)?;
            let selected = select::center_target(&detections, frame.width(), frame.height());

            stats.frames += 1;
            stats.detections += detections.len() as u64;
            if selected.is_some() {
                stats.highlighted += 1;
            }

            annotate::annotate_frame(&mut frame, &detections, selected);
            self.display.present(&frame)?;

            if self.display.quit_requested() {
                log::info!("quit key pressed");
                state = LoopState::Stopped;
            }

            if last_health_log.elapsed() >= HEALTH_LOG_INTERVAL {
                let source_stats = self.source.stats();
                let elapsed = started.elapsed().as_secs_f64();
                let fps = if elapsed > 0.0 {
                    stats.frames as f64 / elapsed
                } else {
                    0.0
                };
                log::info!(
                    "camera health={} frames={} fps={:.1} detections={} highlighted={}",
                    self.source.is_healthy(),
                    source_stats.frames_captured,
                    fps,
                    stats.detections,
                    stats.highlighted
                );
                last_health_log = Instant::now();
            }
        }

        Ok(stats)
    }
}
