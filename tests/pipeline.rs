//! End-to-end pipeline tests using the synthetic camera, the scripted stub
//! detector, and the headless display.

use centermark::annotate::annotate_frame;
use centermark::detect::{BoundingBox, Detection, DetectorBackend, StubBackend};
use centermark::display::{Display, DisplayConfig};
use centermark::ingest::{CameraConfig, CameraSource};
use centermark::runner::Runner;
use centermark::select::center_target;

fn stub_camera(width: u32, height: u32) -> CameraSource {
    let mut source = CameraSource::new(CameraConfig {
        device: "stub://pipeline".to_string(),
        width,
        height,
        target_fps: 10,
    })
    .expect("stub camera");
    source.connect().expect("connect stub camera");
    source
}

fn headless() -> Display {
    Display::new(DisplayConfig {
        headless: true,
        ..DisplayConfig::default()
    })
    .expect("headless display")
}

#[test]
fn full_loop_runs_and_counts_highlights() {
    // 640x480 frames, center (320, 240). Frame 1 has two contenders at the
    // center with an exact confidence tie, frame 2 has none.
    let tied_a = Detection::new(BoundingBox::new(310, 230, 330, 250), 0, 0.8);
    let tied_b = Detection::new(BoundingBox::new(300, 200, 340, 260), 2, 0.8);
    let backend = StubBackend::with_script(vec![vec![tied_a, tied_b], vec![]]);

    let mut runner = Runner::new(stub_camera(640, 480), Box::new(backend), headless())
        .with_max_frames(Some(2));

    let stats = runner.run().expect("run loop");
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.detections, 2);
    assert_eq!(stats.highlighted, 1);
}

#[test]
fn captured_frame_is_darkened_under_the_selected_box() {
    let mut camera = stub_camera(640, 480);
    let mut frame = camera.next_frame().expect("capture");

    let detection = Detection::new(BoundingBox::new(300, 200, 340, 260), 0, 0.9);
    let detections = vec![detection];

    let selected = center_target(&detections, frame.width(), frame.height());
    assert!(selected.is_some(), "box contains the 640x480 center");

    let before = frame.image.get_pixel(310, 220).0;
    annotate_frame(&mut frame, &detections, selected);
    let after = frame.image.get_pixel(310, 220).0;

    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(*a, b / 2, "highlight interior must be halved per channel");
    }

    // A pixel far from the box, label, and crosshair is untouched.
    let mut reference = stub_camera(640, 480);
    let untouched = reference.next_frame().expect("capture");
    assert_eq!(
        frame.image.get_pixel(100, 400).0,
        untouched.image.get_pixel(100, 400).0
    );
}

#[test]
fn tie_break_selects_first_seen_detection() {
    let first = Detection::new(BoundingBox::new(310, 230, 330, 250), 0, 0.8);
    let second = Detection::new(BoundingBox::new(300, 200, 340, 260), 2, 0.8);
    let detections = vec![first.clone(), second];

    let selected = center_target(&detections, 640, 480).expect("tie contender");
    assert_eq!(selected.bbox, first.bbox);
    assert_eq!(selected.class_index, first.class_index);
}

#[test]
fn detector_output_order_reaches_the_selector_unchanged() {
    // The stub backend replays its script verbatim; the selector sees the
    // detector's output order, which the tie-break depends on.
    let script = vec![vec![
        Detection::new(BoundingBox::new(0, 0, 639, 479), 5, 0.5),
        Detection::new(BoundingBox::new(310, 230, 330, 250), 7, 0.5),
    ]];
    let mut backend = StubBackend::with_script(script);

    let mut camera = stub_camera(640, 480);
    let frame = camera.next_frame().expect("capture");
    let detections = backend.infer(&frame).expect("stub infer");

    assert_eq!(detections[0].class_index, 5);
    assert_eq!(detections[1].class_index, 7);

    let selected = center_target(&detections, 640, 480).expect("contender");
    assert_eq!(selected.class_index, 5, "equal confidence keeps input order");
}

#[cfg(feature = "ingest-v4l2")]
#[test]
fn unconnected_device_read_stops_the_loop_cleanly() {
    // A device source that was never connected fails its first read; the
    // loop treats that as fatal, stops, and reports zero frames.
    let source = CameraSource::new(CameraConfig {
        device: "/dev/null".to_string(),
        width: 64,
        height: 48,
        target_fps: 10,
    })
    .expect("device camera");

    let mut runner = Runner::new(source, Box::new(StubBackend::new()), headless());
    let stats = runner.run().expect("loop ends without propagating");
    assert_eq!(stats.frames, 0);
}
