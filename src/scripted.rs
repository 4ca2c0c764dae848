use std::collections::HashSet;

use glam::DVec2;
use image::{GrayImage, imageops};
use log::trace;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::StabilizationConfig;
use crate::engine::{PointTrackAccess, StitchingEngine};
use crate::types::{Quadrilateral, Transform2, affine};

/// Deterministic stand-in for a real stitching engine.
///
/// Motion is scripted (a fixed per-frame camera translation), frames are
/// pasted into the canvas at their scripted footprint, and the track list is
/// a seeded jittered grid with a fixed inlier ratio. Useful for replay demos
/// and end-to-end tests; it performs no feature tracking or motion
/// estimation.
pub struct ScriptedEngine {
    canvas: GrayImage,
    world_to_first: Transform2,
    world_to_current: Transform2,
    /// Camera translation per stitched frame, in frame pixels.
    drift: DVec2,
    /// Process-call indices (0-based, counted across resets) that fail.
    fail_frames: HashSet<u64>,
    process_calls: u64,
    stitched_since_reset: u64,
    track_count: usize,
    inlier_ratio: f64,
    seed: u64,
    tracks: Vec<DVec2>,
    inlier_mask: Vec<bool>,
    configured: bool,
}

impl ScriptedEngine {
    pub fn new(config: &StabilizationConfig, drift: DVec2, seed: u64) -> ScriptedEngine {
        ScriptedEngine {
            canvas: GrayImage::new(1, 1),
            world_to_first: Transform2::identity(),
            world_to_current: Transform2::identity(),
            drift,
            fail_frames: HashSet::new(),
            process_calls: 0,
            stitched_since_reset: 0,
            track_count: config.tracker.max_features,
            inlier_ratio: config.motion.inlier_fraction,
            seed,
            tracks: Vec::new(),
            inlier_mask: Vec::new(),
            configured: false,
        }
    }

    /// Scripts tracking failures at the given process-call indices.
    pub fn with_failures(mut self, frames: impl IntoIterator<Item = u64>) -> ScriptedEngine {
        self.fail_frames = frames.into_iter().collect();
        self
    }

    pub fn process_calls(&self) -> u64 {
        self.process_calls
    }

    fn current_to_world(&self) -> Transform2 {
        // Scripted transforms are pure scale + translation, always invertible.
        self.world_to_current.try_inverse().unwrap()
    }

    fn paste_frame(&mut self, frame: &GrayImage) {
        let footprint =
            Quadrilateral::of_frame(frame.width(), frame.height()).transformed(&self.current_to_world());
        let (w, h) = (
            (footprint.p1.x - footprint.p0.x).round().max(1.0) as u32,
            (footprint.p3.y - footprint.p0.y).round().max(1.0) as u32,
        );
        let scaled = imageops::resize(frame, w, h, imageops::FilterType::Triangle);
        imageops::overlay(
            &mut self.canvas,
            &scaled,
            footprint.p0.x.round() as i64,
            footprint.p0.y.round() as i64,
        );
    }

    fn regenerate_tracks(&mut self, frame_width: u32, frame_height: u32) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ self.process_calls);
        self.tracks = (0..self.track_count)
            .map(|_| {
                DVec2::new(
                    rng.random_range(0.0..frame_width as f64),
                    rng.random_range(0.0..frame_height as f64),
                )
            })
            .collect();
        let inlier_count = (self.track_count as f64 * self.inlier_ratio).round() as usize;
        self.inlier_mask = (0..self.track_count).map(|i| i < inlier_count).collect();
    }
}

impl StitchingEngine for ScriptedEngine {
    fn configure(&mut self, canvas_width: u32, canvas_height: u32, world_to_first: &Transform2) {
        self.canvas = GrayImage::new(canvas_width, canvas_height);
        self.world_to_first = *world_to_first;
        self.world_to_current = *world_to_first;
        self.stitched_since_reset = 0;
        self.configured = true;
    }

    fn process(&mut self, frame: &GrayImage) -> bool {
        assert!(self.configured, "process before configure");
        let call = self.process_calls;
        self.process_calls += 1;

        if self.fail_frames.contains(&call) {
            trace!("scripted failure at call {}", call);
            return false;
        }

        if self.stitched_since_reset > 0 {
            // Camera pans by `drift`, so world content shifts the other way
            // in the current frame.
            self.world_to_current =
                affine(1.0, 1.0, -self.drift.x, -self.drift.y) * self.world_to_current;
        }
        self.paste_frame(frame);
        self.regenerate_tracks(frame.width(), frame.height());
        self.stitched_since_reset += 1;
        true
    }

    fn stitched_image(&self) -> &GrayImage {
        &self.canvas
    }

    fn world_to_current(&self) -> Transform2 {
        self.world_to_current
    }

    fn image_corners(&self, frame_width: u32, frame_height: u32) -> Quadrilateral {
        Quadrilateral::of_frame(frame_width, frame_height).transformed(&self.current_to_world())
    }

    fn reset(&mut self) {
        self.world_to_current = self.world_to_first;
        self.stitched_since_reset = 0;
        self.tracks.clear();
        self.inlier_mask.clear();
        for p in self.canvas.pixels_mut() {
            p.0[0] = 0;
        }
    }

    fn set_origin_to_current(&mut self) {
        // Re-anchoring puts the current frame back at the configured initial
        // placement; accumulated drift is folded away.
        self.world_to_current = self.world_to_first;
    }

    fn point_tracks(&self) -> Option<&dyn PointTrackAccess> {
        Some(self)
    }
}

impl PointTrackAccess for ScriptedEngine {
    fn all_tracks(&self) -> Vec<DVec2> {
        self.tracks.clone()
    }

    fn is_inlier(&self, index: usize) -> bool {
        self.inlier_mask.get(index).copied().unwrap_or(false)
    }
}
