/// Axis-aligned bounding box in pixel coordinates.
///
/// Corners are inclusive on both axes: a box with `x1 == x2` spans a single
/// column. Boxes are produced by detector backends and may extend outside the
/// frame; callers clamp before pixel access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Inclusive containment test on both axes.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    /// Clamp all four coordinates into `[0, width-1] x [0, height-1]`.
    ///
    /// Idempotent; a box fully outside the frame collapses to a single
    /// row/column at the nearest edge.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let max_x = (width as i32 - 1).max(0);
        let max_y = (height as i32 - 1).max(0);
        Self {
            x1: self.x1.clamp(0, max_x),
            y1: self.y1.clamp(0, max_y),
            x2: self.x2.clamp(0, max_x),
            y2: self.y2.clamp(0, max_y),
        }
    }

    fn area(&self) -> f32 {
        let w = (self.x2 - self.x1 + 1).max(0);
        let h = (self.y2 - self.y1 + 1).max(0);
        (w * h) as f32
    }

    /// Intersection-over-union with another box.
    pub fn iou(&self, other: &Self) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let inter_w = (x2 - x1 + 1).max(0) as f32;
        let inter_h = (y2 - y1 + 1).max(0) as f32;
        let inter = inter_w * inter_h;

        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// One output of a detector backend: a box, a class index into the class-name
/// table, and a confidence in `[0, 1]`. Produced fresh each frame and
/// discarded after rendering.
#[derive(Clone, Debug)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class_index: usize,
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_index: usize, confidence: f32) -> Self {
        Self {
            bbox,
            class_index,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_is_inclusive_on_all_edges() {
        let b = BoundingBox::new(10, 20, 30, 40);
        assert!(b.contains(10, 25));
        assert!(b.contains(30, 25));
        assert!(b.contains(15, 20));
        assert!(b.contains(15, 40));
        assert!(!b.contains(9, 25));
        assert!(!b.contains(31, 25));
        assert!(!b.contains(15, 41));
    }

    #[test]
    fn clamp_is_idempotent_for_in_bounds_boxes() {
        let b = BoundingBox::new(10, 20, 30, 40);
        assert_eq!(b.clamp_to(640, 480), b);
        assert_eq!(b.clamp_to(640, 480).clamp_to(640, 480), b);
    }

    #[test]
    fn clamp_collapses_fully_outside_boxes() {
        let left = BoundingBox::new(-50, 10, -10, 20).clamp_to(640, 480);
        assert_eq!((left.x1, left.x2), (0, 0));

        let below = BoundingBox::new(10, 500, 20, 600).clamp_to(640, 480);
        assert_eq!((below.y1, below.y2), (479, 479));
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let b = BoundingBox::new(0, 0, 9, 9);
        assert!((b.iou(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BoundingBox::new(0, 0, 9, 9);
        let b = BoundingBox::new(20, 20, 29, 29);
        assert_eq!(a.iou(&b), 0.0);
    }
}
