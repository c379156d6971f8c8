//! Frame ingestion sources.
//!
//! Sources deliver RGB frames to the run loop:
//! - V4L2 devices (feature: ingest-v4l2)
//! - Synthetic frames for `stub://` device paths (always available)
//!
//! Requested width/height/fps are best-effort: the driver may grant a
//! different format, and every produced `Frame` carries the dimensions the
//! capture actually had. A frame read error is fatal to the caller; sources
//! do not retry or reconnect.

mod camera;

pub use camera::{CameraConfig, CameraSource, CameraStats};
