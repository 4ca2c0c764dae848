use std::sync::Arc;

use glam::DVec2;
use image::{GrayImage, Luma};
use tempfile::TempDir;
use video_mosaic::config::StabilizationConfig;
use video_mosaic::controls::SharedControls;
use video_mosaic::engine::StitchingEngine;
use video_mosaic::io::write_session_report;
use video_mosaic::processor::{FrameOutcome, MosaicProcessor};
use video_mosaic::render::{OverlayStyle, render_overlay};
use video_mosaic::scripted::ScriptedEngine;
use video_mosaic::snapshot::SnapshotSlot;
use video_mosaic::types::affine;

fn frame(index: u32) -> GrayImage {
    GrayImage::from_fn(320, 240, |x, y| {
        Luma([((x / 8 + y / 8 + index) % 2 * 180 + 40) as u8])
    })
}

fn pipeline(
    drift: DVec2,
    failures: Vec<u64>,
) -> (
    MosaicProcessor<ScriptedEngine>,
    Arc<SharedControls>,
    Arc<SnapshotSlot>,
) {
    let config = StabilizationConfig::default();
    let engine = ScriptedEngine::new(&config, drift, 42).with_failures(failures);
    let controls = Arc::new(SharedControls::new());
    let slot = Arc::new(SnapshotSlot::new());
    let processor = MosaicProcessor::new(engine, config, controls.clone(), slot.clone());
    (processor, controls, slot)
}

#[test]
fn reset_is_idempotent_before_any_frame() {
    let config = StabilizationConfig::default();
    let init = affine(0.5, 0.5, 240.0, 60.0).try_inverse().unwrap();

    let mut once = ScriptedEngine::new(&config, DVec2::new(4.0, 0.0), 42);
    once.configure(640, 240, &init);
    once.reset();

    let mut twice = ScriptedEngine::new(&config, DVec2::new(4.0, 0.0), 42);
    twice.configure(640, 240, &init);
    twice.reset();
    twice.reset();

    assert_eq!(once.world_to_current(), twice.world_to_current());
    assert_eq!(once.stitched_image().as_raw(), twice.stitched_image().as_raw());
    assert_eq!(once.image_corners(320, 240), twice.image_corners(320, 240));
}

#[test]
fn replay_stitches_every_frame_with_small_drift() {
    let (mut processor, controls, slot) = pipeline(DVec2::new(2.0, 0.0), vec![]);
    controls.set_show_features(true);

    for i in 0..20 {
        let outcome = processor.process_frame(&frame(i));
        assert!(matches!(outcome, FrameOutcome::Stitched { .. }));
    }

    let stats = processor.stats();
    assert_eq!(stats.frames_stitched, 20);
    assert_eq!(stats.failure_resets, 0);

    let snapshot = slot.latest().unwrap();
    assert_eq!(snapshot.image.width(), 640);
    assert_eq!(snapshot.image.height(), 240);
    // Default config tracks 150 features.
    assert_eq!(snapshot.track_count(), 150);
}

#[test]
fn heavy_drift_eventually_reanchors() {
    // 40 frame px per frame = 20 canvas px of footprint motion.
    let (mut processor, _controls, _slot) = pipeline(DVec2::new(-40.0, 0.0), vec![]);

    let mut reanchored = false;
    for i in 0..30 {
        if let FrameOutcome::Stitched { reanchored: r } = processor.process_frame(&frame(i)) {
            reanchored |= r;
        }
    }
    assert!(reanchored);
    assert!(processor.stats().reanchors >= 1);

    // After re-anchoring the footprint is back inside the margin.
    let outcome = processor.process_frame(&frame(30));
    assert_eq!(outcome, FrameOutcome::Stitched { reanchored: false });
}

#[test]
fn scripted_failure_resets_and_replay_recovers() {
    let (mut processor, _controls, slot) = pipeline(DVec2::new(2.0, 0.0), vec![3]);

    let mut outcomes = Vec::new();
    for i in 0..6 {
        outcomes.push(processor.process_frame(&frame(i)));
    }
    assert_eq!(outcomes[3], FrameOutcome::FailedReset);
    assert!(matches!(outcomes[4], FrameOutcome::Stitched { .. }));
    assert_eq!(processor.stats().failure_resets, 1);
    assert!(slot.latest().is_some());
}

#[test]
fn overlay_and_report_from_a_replay() {
    let temp_dir = TempDir::new().unwrap();
    let (mut processor, controls, slot) = pipeline(DVec2::new(2.0, 0.0), vec![]);
    controls.set_show_features(true);

    for i in 0..10 {
        processor.process_frame(&frame(i));
    }

    let snapshot = slot.latest().unwrap();
    let overlay = render_overlay(&snapshot, &OverlayStyle::default());
    assert_eq!((overlay.width(), overlay.height()), (640, 240));

    let report_path = temp_dir.path().join("report.txt");
    write_session_report(report_path.to_str().unwrap(), &processor.stats()).unwrap();
    let report = std::fs::read_to_string(report_path).unwrap();
    assert!(report.contains("frames stitched:  10"));
}
