//! Center-containment selection.
//!
//! Given one frame's detections, pick the detection whose box contains the
//! frame's center pixel. When several boxes contain the center, the one with
//! strictly greatest confidence wins; exact ties keep the earliest detection
//! in the input sequence, so input order must be the detector's output order.

use crate::detect::Detection;

/// Center pixel `(width / 2, height / 2)`, truncating integer division.
pub fn frame_center(width: u32, height: u32) -> (i32, i32) {
    ((width / 2) as i32, (height / 2) as i32)
}

/// Select the detection under the frame center, if any.
///
/// Containment is inclusive on all four box edges and no bounds clamping is
/// applied here; a box lying partly or fully outside the frame is still
/// eligible if it satisfies the containment test.
pub fn center_target<'a>(
    detections: &'a [Detection],
    width: u32,
    height: u32,
) -> Option<&'a Detection> {
    let (cx, cy) = frame_center(width, height);

    let mut selected: Option<&Detection> = None;
    for detection in detections {
        if !detection.bbox.contains(cx, cy) {
            continue;
        }
        match selected {
            Some(best) if detection.confidence <= best.confidence => {}
            _ => selected = Some(detection),
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BoundingBox;

    fn det(x1: i32, y1: i32, x2: i32, y2: i32, confidence: f32) -> Detection {
        Detection::new(BoundingBox::new(x1, y1, x2, y2), 0, confidence)
    }

    #[test]
    fn empty_detections_select_nothing() {
        assert!(center_target(&[], 640, 480).is_none());
    }

    #[test]
    fn single_containing_box_is_selected() {
        // 640x480 frame, center (320, 240).
        let detections = vec![det(300, 200, 340, 260, 0.9)];
        let selected = center_target(&detections, 640, 480).unwrap();
        assert_eq!(selected.bbox, BoundingBox::new(300, 200, 340, 260));
    }

    #[test]
    fn boxes_missing_the_center_are_ignored() {
        let detections = vec![det(0, 0, 100, 100, 0.99), det(400, 300, 600, 400, 0.95)];
        assert!(center_target(&detections, 640, 480).is_none());
    }

    #[test]
    fn highest_confidence_wins_among_contenders() {
        let detections = vec![
            det(310, 230, 330, 250, 0.4),
            det(0, 0, 639, 479, 0.8),
            det(300, 200, 340, 260, 0.6),
        ];
        let selected = center_target(&detections, 640, 480).unwrap();
        assert!((selected.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn exact_confidence_tie_keeps_first_seen() {
        let first = det(310, 230, 330, 250, 0.8);
        let second = det(300, 200, 340, 260, 0.8);
        let detections = vec![first.clone(), second];
        let selected = center_target(&detections, 640, 480).unwrap();
        assert_eq!(selected.bbox, first.bbox);
    }

    #[test]
    fn containment_is_inclusive_at_every_edge() {
        // Each box touches the center (320, 240) with exactly one edge.
        for bbox in [
            det(320, 200, 400, 260, 0.5), // x1 == cx
            det(200, 200, 320, 260, 0.5), // x2 == cx
            det(300, 240, 340, 300, 0.5), // y1 == cy
            det(300, 100, 340, 240, 0.5), // y2 == cy
        ] {
            let detections = vec![bbox];
            assert!(
                center_target(&detections, 640, 480).is_some(),
                "edge-touching box must contain the center"
            );
        }
    }

    #[test]
    fn out_of_frame_box_is_still_eligible() {
        // Box extends far outside the frame but covers the center; no
        // clamping happens during selection.
        let detections = vec![det(-1000, -1000, 1000, 1000, 0.3)];
        assert!(center_target(&detections, 640, 480).is_some());
    }

    #[test]
    fn center_uses_truncating_division() {
        assert_eq!(frame_center(640, 480), (320, 240));
        assert_eq!(frame_center(7, 5), (3, 2));
    }
}
