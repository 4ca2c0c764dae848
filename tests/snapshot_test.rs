use std::sync::Arc;
use std::thread;

use glam::DVec2;
use image::GrayImage;
use video_mosaic::snapshot::{MosaicSnapshot, SnapshotSlot};
use video_mosaic::types::Quadrilateral;

fn snapshot(frame_index: u64) -> Arc<MosaicSnapshot> {
    Arc::new(MosaicSnapshot {
        frame_index,
        image: GrayImage::new(8, 8),
        corners: Quadrilateral::of_frame(4, 4),
        inliers: vec![DVec2::new(1.0, 1.0)],
        outliers: vec![],
    })
}

#[test]
fn empty_slot_has_no_snapshot() {
    let slot = SnapshotSlot::new();
    assert!(slot.latest().is_none());
}

#[test]
fn latest_published_wins() {
    let slot = SnapshotSlot::new();
    slot.publish(snapshot(0));
    slot.publish(snapshot(1));
    assert_eq!(slot.latest().unwrap().frame_index, 1);
}

#[test]
fn clear_drops_the_snapshot() {
    let slot = SnapshotSlot::new();
    slot.publish(snapshot(0));
    slot.clear();
    assert!(slot.latest().is_none());
}

#[test]
fn reader_always_sees_a_whole_snapshot() {
    let slot = Arc::new(SnapshotSlot::new());

    let writer = {
        let slot = slot.clone();
        thread::spawn(move || {
            for i in 0..200 {
                slot.publish(snapshot(i));
            }
        })
    };
    let reader = {
        let slot = slot.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                if let Some(s) = slot.latest() {
                    // Track sets and corners travel together with the image.
                    assert_eq!(s.inliers.len() + s.outliers.len(), 1);
                    assert_eq!(s.image.width(), 8);
                }
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(slot.latest().unwrap().frame_index, 199);
}
