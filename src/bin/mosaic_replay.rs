use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use glam::DVec2;
use image::{GrayImage, Luma};
use video_mosaic::config::StabilizationConfig;
use video_mosaic::controls::SharedControls;
use video_mosaic::data_loader::load_gray_frames;
use video_mosaic::io::{object_from_json, write_session_report};
use video_mosaic::processor::MosaicProcessor;
use video_mosaic::render::{OverlayStyle, render_overlay};
use video_mosaic::scripted::ScriptedEngine;
use video_mosaic::snapshot::SnapshotSlot;
use video_mosaic::visualization::log_snapshot;

#[derive(Parser)]
#[command(version, about, author)]
struct VMRSCli {
    /// path to a frame folder; synthetic frames are generated when omitted
    path: Option<String>,

    /// stabilization config json; defaults are used when omitted
    #[arg(long)]
    config: Option<String>,

    /// number of synthetic frames
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// synthetic frame width
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// synthetic frame height
    #[arg(long, default_value_t = 240)]
    height: u32,

    /// scripted camera drift per frame, frame pixels
    #[arg(long, default_value_t = 6.0)]
    drift: f64,

    /// skip the track overlay
    #[arg(long)]
    hide_features: bool,

    /// save the final overlay here
    #[arg(long, default_value = "mosaic.png")]
    output: String,

    /// save a session report here
    #[arg(long)]
    report: Option<String>,

    /// save a rerun recording here
    #[arg(long)]
    rerun_out: Option<String>,
}

fn synthetic_frame(width: u32, height: u32, index: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([((x / 8 + y / 8 + index) % 2 * 180 + 40) as u8])
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = VMRSCli::parse();

    let config: StabilizationConfig = match &cli.config {
        Some(path) => object_from_json(path)?,
        None => StabilizationConfig::default(),
    };
    config.validate()?;

    let frames: Vec<GrayImage> = match &cli.path {
        Some(path) => load_gray_frames(path, 0, 1)?
            .into_iter()
            .map(|(_, img)| img)
            .collect(),
        None => (0..cli.frames)
            .map(|i| synthetic_frame(cli.width, cli.height, i))
            .collect(),
    };

    let controls = Arc::new(SharedControls::new());
    controls.set_show_features(!cli.hide_features);
    let slot = Arc::new(SnapshotSlot::new());
    let engine = ScriptedEngine::new(&config, DVec2::new(cli.drift, cli.drift / 6.0), 42);
    let mut processor = MosaicProcessor::new(engine, config, controls, slot.clone());

    let recording = match &cli.rerun_out {
        Some(path) => Some(rerun::RecordingStreamBuilder::new("video-mosaic").save(path)?),
        None => None,
    };

    let now = Instant::now();
    for frame in &frames {
        processor.process_frame(frame);
        if let Some(recording) = &recording {
            if let Some(snapshot) = slot.latest() {
                log_snapshot(recording, "/mosaic", &snapshot);
            }
        }
    }
    let duration_sec = now.elapsed().as_secs_f64();
    println!("stitching took {:.6} sec", duration_sec);
    println!("avg: {} sec", duration_sec / frames.len().max(1) as f64);

    if let Some(snapshot) = slot.latest() {
        let overlay = render_overlay(&snapshot, &OverlayStyle::default());
        overlay.save(&cli.output)?;
        println!("saved {}", cli.output);
    }
    if let Some(report) = &cli.report {
        write_session_report(report, &processor.stats())?;
    }
    Ok(())
}
