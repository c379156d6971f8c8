use anyhow::Result;

use crate::detect::backend::DetectorBackend;
use crate::detect::result::Detection;
use crate::frame::Frame;

/// Stub backend for testing and model-free runs.
///
/// Replays a scripted sequence of per-frame detection sets, cycling when the
/// script is exhausted. An empty script yields no detections.
pub struct StubBackend {
    script: Vec<Vec<Detection>>,
    cursor: usize,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            script: Vec::new(),
            cursor: 0,
        }
    }

    /// Replay the given per-frame detection sets in order, cycling.
    pub fn with_script(script: Vec<Vec<Detection>>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn infer(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
        if self.script.is_empty() {
            return Ok(Vec::new());
        }
        let detections = self.script[self.cursor % self.script.len()].clone();
        self.cursor += 1;
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::result::BoundingBox;
    use image::RgbImage;

    fn frame() -> Frame {
        Frame::new(RgbImage::new(64, 48), 1)
    }

    #[test]
    fn empty_script_yields_no_detections() {
        let mut backend = StubBackend::new();
        assert!(backend.infer(&frame()).unwrap().is_empty());
        assert!(backend.infer(&frame()).unwrap().is_empty());
    }

    #[test]
    fn script_cycles_per_frame() {
        let first = vec![Detection::new(BoundingBox::new(0, 0, 10, 10), 0, 0.9)];
        let second = vec![];
        let mut backend = StubBackend::with_script(vec![first.clone(), second]);

        assert_eq!(backend.infer(&frame()).unwrap().len(), 1);
        assert!(backend.infer(&frame()).unwrap().is_empty());
        assert_eq!(backend.infer(&frame()).unwrap().len(), 1);
    }
}
