use std::sync::Arc;

use image::GrayImage;
use log::{debug, trace};
use serde::Serialize;

use crate::config::StabilizationConfig;
use crate::controls::SharedControls;
use crate::engine::StitchingEngine;
use crate::snapshot::{MosaicSnapshot, SnapshotSlot};
use crate::types::{Quadrilateral, affine, transform_point};

/// Mosaic canvas geometry, fixed once the first frame arrives.
#[derive(Debug, Clone, Copy)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
}

impl CanvasLayout {
    /// Canvas is twice the frame width at full frame height, with the first
    /// frame placed at half scale, centered vertically in the left half.
    fn for_frame(frame_width: u32, frame_height: u32) -> CanvasLayout {
        CanvasLayout {
            width: frame_width * 2,
            height: frame_height,
        }
    }

    fn initial_world_to_frame(
        &self,
        frame_width: u32,
        frame_height: u32,
    ) -> Option<crate::types::Transform2> {
        let tx = (self.width / 2 - frame_width / 4) as f64;
        let ty = (self.height / 2 - frame_height / 4) as f64;
        affine(0.5, 0.5, tx, ty).try_inverse()
    }
}

/// What the processor did with one delivered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Paused; the frame was dropped without touching the engine.
    SkippedPaused,
    /// A pending user reset was consumed; stitching was skipped.
    Reset,
    /// The frame was stitched and a snapshot published.
    Stitched { reanchored: bool },
    /// The engine could not produce an estimate; state was discarded.
    FailedReset,
}

/// Counters accumulated over the life of one processor.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SessionStats {
    pub frames_seen: u64,
    pub frames_stitched: u64,
    pub paused_drops: u64,
    pub user_resets: u64,
    pub failure_resets: u64,
    pub reanchors: u64,
}

/// Per-frame orchestration around a [`StitchingEngine`].
///
/// Each delivered frame takes exactly one of the transitions in
/// [`FrameOutcome`]. The processor owns the engine; display state leaves it
/// only through immutable snapshots published to the [`SnapshotSlot`].
pub struct MosaicProcessor<E: StitchingEngine> {
    engine: E,
    config: StabilizationConfig,
    controls: Arc<SharedControls>,
    slot: Arc<SnapshotSlot>,
    canvas: Option<CanvasLayout>,
    // Capability probed once; the engine's answer must not change afterwards.
    has_track_access: bool,
    frame_index: u64,
    stats: SessionStats,
}

impl<E: StitchingEngine> MosaicProcessor<E> {
    pub fn new(
        engine: E,
        config: StabilizationConfig,
        controls: Arc<SharedControls>,
        slot: Arc<SnapshotSlot>,
    ) -> MosaicProcessor<E> {
        let has_track_access = engine.point_tracks().is_some();
        MosaicProcessor {
            engine,
            config,
            controls,
            slot,
            canvas: None,
            has_track_access,
            frame_index: 0,
            stats: SessionStats::default(),
        }
    }

    pub fn canvas(&self) -> Option<CanvasLayout> {
        self.canvas
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn snapshot_slot(&self) -> &Arc<SnapshotSlot> {
        &self.slot
    }

    /// Feeds one grayscale camera frame through the stitching state machine.
    pub fn process_frame(&mut self, frame: &GrayImage) -> FrameOutcome {
        self.stats.frames_seen += 1;

        if self.controls.paused() {
            self.stats.paused_drops += 1;
            return FrameOutcome::SkippedPaused;
        }

        let canvas = self.ensure_configured(frame.width(), frame.height());

        if self.controls.take_reset_request() {
            debug!("user reset at frame {}", self.frame_index);
            self.stats.user_resets += 1;
            self.engine.reset();
            return FrameOutcome::Reset;
        }

        if !self.engine.process(frame) {
            debug!("stitch failed at frame {}, discarding mosaic state", self.frame_index);
            self.stats.failure_resets += 1;
            // A failure consumes any reset request raised mid-frame as well.
            self.controls.take_reset_request();
            self.engine.reset();
            return FrameOutcome::FailedReset;
        }

        let corners = self.engine.image_corners(frame.width(), frame.height());
        let snapshot = self.build_snapshot(corners);
        self.slot.publish(Arc::new(snapshot));

        self.stats.frames_stitched += 1;
        self.frame_index += 1;

        let margin = self.config.stitch.reanchor_margin_px;
        let reanchored = !corners.inside(canvas.width, canvas.height, margin);
        if reanchored {
            trace!("boundary left safe margin, re-anchoring origin");
            self.stats.reanchors += 1;
            self.engine.set_origin_to_current();
        }
        FrameOutcome::Stitched { reanchored }
    }

    fn ensure_configured(&mut self, frame_width: u32, frame_height: u32) -> CanvasLayout {
        if let Some(canvas) = self.canvas {
            return canvas;
        }
        let canvas = CanvasLayout::for_frame(frame_width, frame_height);
        // Half-scale placement is always invertible.
        let init = canvas
            .initial_world_to_frame(frame_width, frame_height)
            .unwrap();
        debug!(
            "configuring {}x{} canvas for {}x{} frames",
            canvas.width, canvas.height, frame_width, frame_height
        );
        self.engine.configure(canvas.width, canvas.height, &init);
        self.canvas = Some(canvas);
        canvas
    }

    fn build_snapshot(&self, corners: Quadrilateral) -> MosaicSnapshot {
        let mut inliers = Vec::new();
        let mut outliers = Vec::new();

        if self.controls.show_features() && self.has_track_access {
            if let Some(tracks) = self.engine.point_tracks() {
                let world_to_current = self.engine.world_to_current();
                if let Some(current_to_world) = world_to_current.try_inverse() {
                    for (i, p) in tracks.all_tracks().iter().enumerate() {
                        let mosaic_pt = transform_point(&current_to_world, *p);
                        if tracks.is_inlier(i) {
                            inliers.push(mosaic_pt);
                        } else {
                            outliers.push(mosaic_pt);
                        }
                    }
                } else {
                    trace!("world-to-current not invertible, skipping track overlay");
                }
            }
        }

        MosaicSnapshot {
            frame_index: self.frame_index,
            image: self.engine.stitched_image().clone(),
            corners,
            inliers,
            outliers,
        }
    }
}
