use std::path::Path;

use anyhow::{Context, Result};
use glob::glob;
use image::{GrayImage, ImageReader};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

/// Parses the timestamp from a file path.
///
/// Assumes the filename (without extension) is a timestamp in nanoseconds;
/// falls back to 0 so unnamed frames sort stably by path order.
fn path_to_timestamp(path: &Path) -> i64 {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

fn img_filter(rp: glob::GlobResult) -> Option<std::path::PathBuf> {
    if let Ok(p) = rp {
        for ext in &[".png", ".jpg"] {
            if p.as_os_str().to_string_lossy().ends_with(ext) {
                return Some(p);
            }
        }
    }
    None
}

/// Loads a folder of video frames as grayscale, ordered by filename
/// timestamp.
///
/// # Arguments
/// * `root_folder` - Folder containing the frame images.
/// * `start_idx` - Starting frame index.
/// * `step` - Step size for sampling frames.
pub fn load_gray_frames(
    root_folder: &str,
    start_idx: usize,
    step: usize,
) -> Result<Vec<(i64, GrayImage)>> {
    log::trace!("loading frames from {}", root_folder);
    let img_paths = glob(format!("{}/*", root_folder).as_str())
        .with_context(|| format!("bad frame folder pattern for {}", root_folder))?;
    let mut sorted_path: Vec<std::path::PathBuf> =
        img_paths.into_iter().filter_map(img_filter).collect();
    sorted_path.sort();

    let new_paths: Vec<_> = sorted_path.iter().skip(start_idx).step_by(step.max(1)).collect();
    let mut time_frame: Vec<(i64, GrayImage)> = new_paths
        .par_iter()
        .progress_count(new_paths.len() as u64)
        .map(|path| {
            let time_ns = path_to_timestamp(path);
            let img = ImageReader::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?
                .decode()
                .with_context(|| format!("failed to decode {}", path.display()))?;
            Ok((time_ns, img.to_luma8()))
        })
        .collect::<Result<_>>()?;
    time_frame.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(time_frame)
}
