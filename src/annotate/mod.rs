//! In-place frame annotation.
//!
//! Every detection gets an outline and a `"<class> <confidence>"` label. The
//! selected detection additionally has its box clamped into the frame, the
//! enclosed region darkened 50% toward black, and a thicker dark outline
//! drawn over the clamped box. A crosshair marks the frame center whether or
//! not a highlight exists.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::detect::{class_label, BoundingBox, Detection};
use crate::frame::Frame;

mod font;

const DETECTION_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
const DETECTION_THICKNESS: i32 = 2;
const HIGHLIGHT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const HIGHLIGHT_THICKNESS: i32 = 3;
const CROSSHAIR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CROSSHAIR_HALF_SIZE: i32 = 6;
const CROSSHAIR_THICKNESS: i32 = 2;
const LABEL_SCALE: u32 = 1;

/// Annotate one frame in place.
///
/// `selected` must reference a detection chosen by the center selector; its
/// box is clamped here before any pixel access, so out-of-frame coordinates
/// are safe.
pub fn annotate_frame(frame: &mut Frame, detections: &[Detection], selected: Option<&Detection>) {
    let (cx, cy) = frame.center();
    let (width, height) = (frame.width(), frame.height());
    let img = &mut frame.image;

    for detection in detections {
        draw_box_outline(img, &detection.bbox, DETECTION_COLOR, DETECTION_THICKNESS);
        let label = format!(
            "{} {:.2}",
            class_label(detection.class_index),
            detection.confidence
        );
        let label_y = (detection.bbox.y1 - font::line_height(LABEL_SCALE) - 3).max(0);
        font::draw_text(img, &label, detection.bbox.x1, label_y, DETECTION_COLOR, LABEL_SCALE);
    }

    if let Some(selected) = selected {
        let clamped = selected.bbox.clamp_to(width, height);
        darken_region(img, &clamped);
        draw_box_outline(img, &clamped, HIGHLIGHT_COLOR, HIGHLIGHT_THICKNESS);
    }

    draw_crosshair(img, cx, cy);
}

/// Draw a rectangle outline of the given thickness, rings growing inward
/// from the box boundary. Out-of-bounds portions are clipped.
fn draw_box_outline(img: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>, thickness: i32) {
    for inset in 0..thickness {
        let x1 = bbox.x1 + inset;
        let y1 = bbox.y1 + inset;
        let x2 = bbox.x2 - inset;
        let y2 = bbox.y2 - inset;
        if x2 < x1 || y2 < y1 {
            break;
        }
        let rect = Rect::at(x1, y1).of_size((x2 - x1 + 1) as u32, (y2 - y1 + 1) as u32);
        draw_hollow_rect_mut(img, rect, color);
    }
}

/// Blend a clamped region 50% toward black: each channel becomes `v / 2`.
fn darken_region(img: &mut RgbImage, bbox: &BoundingBox) {
    for y in bbox.y1..=bbox.y2 {
        for x in bbox.x1..=bbox.x2 {
            let pixel = img.get_pixel_mut(x as u32, y as u32);
            for channel in pixel.0.iter_mut() {
                *channel /= 2;
            }
        }
    }
}

fn draw_crosshair(img: &mut RgbImage, cx: i32, cy: i32) {
    let half = CROSSHAIR_HALF_SIZE;
    let t = CROSSHAIR_THICKNESS;
    draw_filled_rect_mut(
        img,
        Rect::at(cx - half, cy - t / 2).of_size((2 * half + 1) as u32, t as u32),
        CROSSHAIR_COLOR,
    );
    draw_filled_rect_mut(
        img,
        Rect::at(cx - t / 2, cy - half).of_size(t as u32, (2 * half + 1) as u32),
        CROSSHAIR_COLOR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn gray_frame(width: u32, height: u32, value: u8) -> Frame {
        let image = RgbImage::from_pixel(width, height, Rgb([value, value, value]));
        Frame::new(image, 1)
    }

    #[test]
    fn selected_region_is_darkened_and_outside_left_untouched() {
        // 640x480 frame, center (320, 240); the box contains the center.
        let mut frame = gray_frame(640, 480, 100);
        let detection = Detection::new(BoundingBox::new(300, 200, 340, 260), 0, 0.9);
        let detections = vec![detection.clone()];

        annotate_frame(&mut frame, &detections, Some(&detection));

        // Interior of the highlight, clear of outlines, label, and crosshair.
        assert_eq!(frame.image.get_pixel(310, 220).0, [50, 50, 50]);
        // Far outside the box: untouched.
        assert_eq!(frame.image.get_pixel(100, 100).0, [100, 100, 100]);
        // Highlight outline overdraws the box boundary in black.
        assert_eq!(frame.image.get_pixel(300, 230).0, [0, 0, 0]);
        // Crosshair at the frame center.
        assert_eq!(frame.image.get_pixel(320, 240).0, [0, 255, 0]);
    }

    #[test]
    fn crosshair_is_drawn_without_any_detections() {
        let mut frame = gray_frame(64, 48, 10);
        annotate_frame(&mut frame, &[], None);

        assert_eq!(frame.image.get_pixel(32, 24).0, [0, 255, 0]);
        assert_eq!(frame.image.get_pixel(5, 5).0, [10, 10, 10]);
    }

    #[test]
    fn out_of_range_class_index_renders_numeric_label() {
        let mut frame = gray_frame(200, 100, 0);
        let detection = Detection::new(BoundingBox::new(20, 30, 80, 70), 999, 0.5);
        // Must not panic; the label falls back to "999".
        annotate_frame(&mut frame, &[detection], None);

        // The label row above the box carries detection-colored pixels.
        let label_band = (0..200)
            .flat_map(|x| (17..27).map(move |y| (x, y)))
            .any(|(x, y)| frame.image.get_pixel(x, y).0 == [255, 0, 255]);
        assert!(label_band);
    }

    #[test]
    fn highlight_extending_outside_the_frame_is_clamped() {
        let mut frame = gray_frame(64, 48, 200);
        let detection = Detection::new(BoundingBox::new(-100, -100, 2000, 2000), 0, 0.9);

        annotate_frame(&mut frame, &[detection.clone()], Some(&detection));

        // Whole frame darkened; interior pixel clear of outline rings.
        assert_eq!(frame.image.get_pixel(10, 10).0, [100, 100, 100]);
    }

    #[test]
    fn darkening_truncates_per_channel() {
        let mut img = RgbImage::from_pixel(4, 4, Rgb([101, 50, 1]));
        darken_region(&mut img, &BoundingBox::new(0, 0, 3, 3));
        assert_eq!(img.get_pixel(2, 2).0, [50, 25, 0]);
    }
}
