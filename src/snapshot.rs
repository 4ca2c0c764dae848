use std::sync::{Arc, Mutex};

use glam::DVec2;
use image::GrayImage;

use crate::types::Quadrilateral;

/// Display state published after one successful stitch.
///
/// All fields originate from the same processed frame; the snapshot is
/// immutable once published, so a renderer never observes a boundary polygon
/// from one frame paired with track markers from another.
#[derive(Debug, Clone)]
pub struct MosaicSnapshot {
    pub frame_index: u64,
    /// Display copy of the stitched mosaic canvas.
    pub image: GrayImage,
    /// Footprint of the frame in mosaic coordinates.
    pub corners: Quadrilateral,
    /// Tracked points consistent with the motion fit, in mosaic-display
    /// coordinates. Empty unless feature display was enabled.
    pub inliers: Vec<DVec2>,
    /// Tracked points rejected by the motion fit.
    pub outliers: Vec<DVec2>,
}

impl MosaicSnapshot {
    pub fn track_count(&self) -> usize {
        self.inliers.len() + self.outliers.len()
    }
}

/// Latest-snapshot handoff between the frame processor and a renderer.
///
/// The mutex is held only to swap an `Arc`, so publishing never blocks on a
/// slow renderer and rendering never blocks on the stitcher.
#[derive(Debug, Default)]
pub struct SnapshotSlot {
    latest: Mutex<Option<Arc<MosaicSnapshot>>>,
}

impl SnapshotSlot {
    pub fn new() -> SnapshotSlot {
        SnapshotSlot::default()
    }

    pub fn publish(&self, snapshot: Arc<MosaicSnapshot>) {
        *self.latest.lock().unwrap() = Some(snapshot);
    }

    /// The most recently published snapshot, if any frame succeeded yet.
    pub fn latest(&self) -> Option<Arc<MosaicSnapshot>> {
        self.latest.lock().unwrap().clone()
    }

    /// Drops the published snapshot; used when the mosaic is reset.
    pub fn clear(&self) {
        *self.latest.lock().unwrap() = None;
    }
}
