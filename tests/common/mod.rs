#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use glam::DVec2;
use image::GrayImage;
use video_mosaic::engine::{PointTrackAccess, StitchingEngine};
use video_mosaic::types::{Quadrilateral, Transform2};

/// Every engine call the processor made, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Configure {
        width: u32,
        height: u32,
        world_to_first: Transform2,
    },
    Process,
    Reset,
    SetOriginToCurrent,
}

#[derive(Debug)]
pub struct FakeState {
    pub calls: Vec<Call>,
    /// Scripted result per `process` call; empty means success.
    pub process_results: VecDeque<bool>,
    /// Corners returned from `image_corners`.
    pub corners: Quadrilateral,
    /// (point, is_inlier) pairs reported through `PointTrackAccess`.
    pub tracks: Vec<(DVec2, bool)>,
    pub world_to_current: Transform2,
}

/// Scriptable recording double for the external stitching engine.
///
/// The shared state stays accessible to the test while the processor owns
/// the engine, so outcomes can be scripted mid-run and calls asserted after.
pub struct FakeEngine {
    pub state: Arc<Mutex<FakeState>>,
    stitched: GrayImage,
    expose_tracks: bool,
}

impl FakeEngine {
    pub fn new() -> (FakeEngine, Arc<Mutex<FakeState>>) {
        let state = Arc::new(Mutex::new(FakeState {
            calls: Vec::new(),
            process_results: VecDeque::new(),
            corners: inside_corners(),
            tracks: Vec::new(),
            world_to_current: Transform2::identity(),
        }));
        let engine = FakeEngine {
            state: state.clone(),
            stitched: GrayImage::new(1, 1),
            expose_tracks: true,
        };
        (engine, state)
    }

    pub fn without_track_access(mut self) -> FakeEngine {
        self.expose_tracks = false;
        self
    }
}

impl StitchingEngine for FakeEngine {
    fn configure(&mut self, canvas_width: u32, canvas_height: u32, world_to_first: &Transform2) {
        self.stitched = GrayImage::new(canvas_width, canvas_height);
        self.state.lock().unwrap().calls.push(Call::Configure {
            width: canvas_width,
            height: canvas_height,
            world_to_first: *world_to_first,
        });
    }

    fn process(&mut self, _frame: &GrayImage) -> bool {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Process);
        state.process_results.pop_front().unwrap_or(true)
    }

    fn stitched_image(&self) -> &GrayImage {
        &self.stitched
    }

    fn world_to_current(&self) -> Transform2 {
        self.state.lock().unwrap().world_to_current
    }

    fn image_corners(&self, _frame_width: u32, _frame_height: u32) -> Quadrilateral {
        self.state.lock().unwrap().corners
    }

    fn reset(&mut self) {
        self.state.lock().unwrap().calls.push(Call::Reset);
    }

    fn set_origin_to_current(&mut self) {
        self.state.lock().unwrap().calls.push(Call::SetOriginToCurrent);
    }

    fn point_tracks(&self) -> Option<&dyn PointTrackAccess> {
        if self.expose_tracks { Some(self) } else { None }
    }
}

impl PointTrackAccess for FakeEngine {
    fn all_tracks(&self) -> Vec<DVec2> {
        self.state
            .lock()
            .unwrap()
            .tracks
            .iter()
            .map(|(p, _)| *p)
            .collect()
    }

    fn is_inlier(&self, index: usize) -> bool {
        self.state.lock().unwrap().tracks[index].1
    }
}

/// Corners comfortably inside a 640 x 240 canvas at the 5 px margin.
pub fn inside_corners() -> Quadrilateral {
    Quadrilateral::new(
        DVec2::new(100.0, 50.0),
        DVec2::new(260.0, 50.0),
        DVec2::new(260.0, 170.0),
        DVec2::new(100.0, 170.0),
    )
}

/// Corners with one point outside the 5 px margin of a 640 x 240 canvas.
pub fn drifted_corners() -> Quadrilateral {
    Quadrilateral::new(
        DVec2::new(2.0, 50.0),
        DVec2::new(160.0, 50.0),
        DVec2::new(160.0, 170.0),
        DVec2::new(2.0, 170.0),
    )
}

pub fn gray_frame(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, image::Luma([128]))
}
