use std::sync::Arc;
use std::time::Instant;

use glam::DVec2;
use image::{GrayImage, Luma};
use video_mosaic::config::StabilizationConfig;
use video_mosaic::controls::SharedControls;
use video_mosaic::processor::MosaicProcessor;
use video_mosaic::scripted::ScriptedEngine;
use video_mosaic::snapshot::SnapshotSlot;
use video_mosaic::visualization::log_snapshot;

fn synthetic_frame(width: u32, height: u32, index: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([((x / 8 + y / 8 + index) % 2 * 180 + 40) as u8])
    })
}

fn main() {
    env_logger::init();
    let config = StabilizationConfig::default();
    config.validate().unwrap();

    let controls = Arc::new(SharedControls::new());
    controls.set_show_features(true);
    let slot = Arc::new(SnapshotSlot::new());
    let engine = ScriptedEngine::new(&config, DVec2::new(6.0, 1.0), 42);
    let mut processor = MosaicProcessor::new(engine, config, controls, slot.clone());

    let recording = rerun::RecordingStreamBuilder::new("video-mosaic")
        .spawn()
        .unwrap();

    let now = Instant::now();
    let num_frames = 120;
    for i in 0..num_frames {
        processor.process_frame(&synthetic_frame(320, 240, i));
        if let Some(snapshot) = slot.latest() {
            log_snapshot(&recording, "/mosaic", &snapshot);
        }
    }
    let duration_sec = now.elapsed().as_secs_f64();
    println!("stitching took {:.6} sec", duration_sec);
    println!("avg: {} sec", duration_sec / num_frames as f64);
    println!("{:?}", processor.stats());
}
