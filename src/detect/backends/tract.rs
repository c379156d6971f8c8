#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use tract_onnx::prelude::*;

use crate::detect::backend::DetectorBackend;
use crate::detect::result::{BoundingBox, Detection};
use crate::frame::Frame;

/// Tract-based backend for YOLO-family ONNX models.
///
/// Loads a local model file and performs inference on RGB frames. The model
/// is expected to take a `[1, 3, H, W]` f32 input in `[0, 1]` and emit a
/// `[1, 4 + classes, anchors]` prediction tensor (center-x, center-y, width,
/// height rows followed by one score row per class).
pub struct TractBackend {
    model: TypedSimplePlan<TypedModel>,
    input_width: u32,
    input_height: u32,
    confidence_threshold: f32,
    nms_iou: f32,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P, input_width: u32, input_height: u32) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, input_height as usize, input_width as usize),
                ),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self {
            model,
            input_width,
            input_height,
            confidence_threshold: 0.25,
            nms_iou: 0.45,
        })
    }

    /// Override the default confidence threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Override the default NMS IoU threshold.
    pub fn with_nms_iou(mut self, iou: f32) -> Self {
        self.nms_iou = iou;
        self
    }

    fn build_input(&self, frame: &Frame) -> Tensor {
        // Plain resize to the model input, no letterboxing; boxes are scaled
        // back with the same per-axis factors after decoding.
        let resized = imageops::resize(
            &frame.image,
            self.input_width,
            self.input_height,
            FilterType::Triangle,
        );
        let input = tract_ndarray::Array4::from_shape_fn(
            (1, 3, self.input_height as usize, self.input_width as usize),
            |(_, channel, y, x)| resized.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0,
        );
        input.into_tensor()
    }
}

impl DetectorBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn infer(&mut self, frame: &Frame) -> Result<Vec<Detection>> {
        let input = self.build_input(frame);
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let view = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;

        let shape = view.shape();
        if shape.len() != 3 || shape[0] != 1 || shape[1] < 5 {
            return Err(anyhow!(
                "unexpected prediction tensor shape {:?}, expected [1, 4 + classes, anchors]",
                shape
            ));
        }
        let data = view
            .as_slice()
            .ok_or_else(|| anyhow!("prediction tensor was not contiguous"))?;

        let scale_x = frame.width() as f32 / self.input_width as f32;
        let scale_y = frame.height() as f32 / self.input_height as f32;
        let detections = decode_predictions(
            data,
            shape[1],
            shape[2],
            self.confidence_threshold,
            scale_x,
            scale_y,
        );
        Ok(non_max_suppression(detections, self.nms_iou))
    }

    fn warm_up(&mut self) -> Result<()> {
        let zeros = Tensor::zero::<f32>(&[
            1,
            3,
            self.input_height as usize,
            self.input_width as usize,
        ])?;
        self.model
            .run(tvec!(zeros.into()))
            .context("warm-up inference failed")?;
        Ok(())
    }
}

/// Decode a flat `[1, rows, anchors]` prediction tensor into detections in
/// frame coordinates. Anchors are visited in tensor order, so the output
/// preserves the model's native ordering.
fn decode_predictions(
    data: &[f32],
    rows: usize,
    anchors: usize,
    threshold: f32,
    scale_x: f32,
    scale_y: f32,
) -> Vec<Detection> {
    let at = |row: usize, anchor: usize| data[row * anchors + anchor];
    let classes = rows - 4;

    let mut detections = Vec::new();
    for anchor in 0..anchors {
        let mut best_class = 0usize;
        let mut best_score = f32::NEG_INFINITY;
        for class in 0..classes {
            let score = at(4 + class, anchor);
            if score > best_score {
                best_score = score;
                best_class = class;
            }
        }
        if !best_score.is_finite() || best_score < threshold {
            continue;
        }

        let cx = at(0, anchor);
        let cy = at(1, anchor);
        let w = at(2, anchor);
        let h = at(3, anchor);
        let bbox = BoundingBox::new(
            ((cx - w / 2.0) * scale_x).round() as i32,
            ((cy - h / 2.0) * scale_y).round() as i32,
            ((cx + w / 2.0) * scale_x).round() as i32,
            ((cy + h / 2.0) * scale_y).round() as i32,
        );
        detections.push(Detection::new(bbox, best_class, best_score));
    }
    detections
}

/// Greedy non-maximum suppression.
///
/// The sort is stable, so detections with equal confidence keep their
/// original relative order and downstream tie-breaking stays reproducible.
fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<Detection> = Vec::new();
    for det in detections {
        if keep
            .iter()
            .all(|kept| det.bbox.iou(&kept.bbox) <= iou_threshold)
        {
            keep.push(det);
        }
    }
    keep
}
