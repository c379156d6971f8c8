//! centermark
//!
//! Live camera viewer that runs a pretrained object-detection model on each
//! frame, selects the detection whose bounding box contains the frame's
//! center pixel, darkens that region, and presents the annotated stream
//! until the user quits.
//!
//! # Architecture
//!
//! One synchronous pipeline per frame, with no overlap between frames:
//!
//! read -> infer -> select center target -> annotate -> present -> poll quit
//!
//! The camera and model are opened once, owned by the run loop, and released
//! on every exit path. A failed frame read is fatal; there is no retry.
//!
//! # Module Structure
//!
//! - `ingest`: frame sources (V4L2 devices, synthetic `stub://` frames)
//! - `detect`: detector backends, detection types, class-name table
//! - `select`: center-containment selection with confidence tie-break
//! - `annotate`: outlines, labels, highlight darkening, center crosshair
//! - `display`: window presentation and quit-key polling
//! - `runner`: the RUNNING/STOPPED loop tying the stages together
//! - `config`: file- and environment-driven settings

pub mod annotate;
pub mod config;
pub mod detect;
pub mod display;
pub mod frame;
pub mod ingest;
pub mod runner;
pub mod select;

pub use annotate::annotate_frame;
pub use config::{CentermarkConfig, ModelSettings};
pub use detect::{class_label, create_backend, BoundingBox, Detection, DetectorBackend, StubBackend, COCO_CLASSES};
pub use display::{Display, DisplayConfig};
pub use frame::Frame;
pub use ingest::{CameraConfig, CameraSource, CameraStats};
pub use runner::{RunStats, Runner};
pub use select::{center_target, frame_center};

#[cfg(feature = "backend-tract")]
pub use detect::TractBackend;
