use anyhow::Result;

use crate::detect::result::Detection;
use crate::frame::Frame;

/// Detector backend trait.
///
/// Backends are invoked once per frame, synchronously, from the run loop.
/// They are assumed stateless across calls apart from loaded model weights;
/// a returned error is fatal to the caller.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    ///
    /// Returns detections in the backend's native output order. Callers rely
    /// on that order being preserved for confidence tie-breaking.
    fn infer(&mut self, frame: &Frame) -> Result<Vec<Detection>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
