use glam::DVec2;
use image::GrayImage;

use crate::types::{Quadrilateral, Transform2};

/// Contract of the external stitching engine: the tracker, robust 2D motion
/// fit and image compositing all live behind this seam.
///
/// A `false` return from [`process`](StitchingEngine::process) is a
/// recoverable tracking failure (for example too few inliers), not an error;
/// the caller is expected to [`reset`](StitchingEngine::reset) and continue.
pub trait StitchingEngine {
    /// Sizes the mosaic canvas and sets the mapping from mosaic space to the
    /// first frame. Called once, when frame dimensions become known.
    fn configure(&mut self, canvas_width: u32, canvas_height: u32, world_to_first: &Transform2);

    /// Stitches one grayscale frame into the mosaic. Returns false when no
    /// valid frame-to-mosaic estimate could be produced.
    fn process(&mut self, frame: &GrayImage) -> bool;

    /// The stitched mosaic canvas after the last successful `process`.
    fn stitched_image(&self) -> &GrayImage;

    /// Mapping from mosaic (world) space to the current frame.
    fn world_to_current(&self) -> Transform2;

    /// Footprint of a w x h frame projected into mosaic coordinates.
    fn image_corners(&self, frame_width: u32, frame_height: u32) -> Quadrilateral;

    /// Discards all accumulated mosaic state; the next frame starts fresh.
    fn reset(&mut self);

    /// Re-anchors the mosaic coordinate origin to the current frame,
    /// bounding numeric drift as the mosaic grows.
    fn set_origin_to_current(&mut self);

    /// Optional capability: per-point track introspection. Engines whose
    /// motion model does not expose tracks return `None`; callers probe this
    /// once at construction.
    fn point_tracks(&self) -> Option<&dyn PointTrackAccess> {
        None
    }
}

/// Per-point track introspection, in current-frame coordinates.
pub trait PointTrackAccess {
    /// Every tracked point for the last processed frame.
    fn all_tracks(&self) -> Vec<DVec2>;

    /// Whether track `index` was consistent with the fitted motion model.
    fn is_inlier(&self, index: usize) -> bool;
}
