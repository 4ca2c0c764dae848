use image::DynamicImage;
use rerun::RecordingStream;
use std::io::Cursor;

use crate::snapshot::MosaicSnapshot;

const INLIER_COLOR: (u8, u8, u8, u8) = (255, 0, 0, 255);
const OUTLIER_COLOR: (u8, u8, u8, u8) = (0, 0, 255, 255);

pub fn log_image_as_compressed(
    recording: &RecordingStream,
    topic: &str,
    img: &DynamicImage,
    format: image::ImageFormat,
) {
    let mut bytes: Vec<u8> = Vec::new();

    img.to_luma8()
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();

    recording
        .log(
            format!("{}/image", topic),
            &rerun::Image::from_file_contents(bytes, None),
        )
        .unwrap();
}

/// rerun use top left corner as (0, 0)
pub fn rerun_shift(p2ds: &[(f32, f32)]) -> Vec<(f32, f32)> {
    p2ds.iter().map(|(x, y)| (*x + 0.5, *y + 0.5)).collect()
}

/// Logs one snapshot: the mosaic canvas, the boundary polygon as a closed
/// line strip, and the inlier/outlier track points.
pub fn log_snapshot(recording: &RecordingStream, topic: &str, snapshot: &MosaicSnapshot) {
    recording.set_time_sequence("frame", snapshot.frame_index as i64);

    log_image_as_compressed(
        recording,
        topic,
        &DynamicImage::ImageLuma8(snapshot.image.clone()),
        image::ImageFormat::Png,
    );

    let mut strip: Vec<(f32, f32)> = snapshot
        .corners
        .corners()
        .iter()
        .map(|p| (p.x as f32, p.y as f32))
        .collect();
    strip.push(strip[0]);
    recording
        .log(
            format!("{}/boundary", topic),
            &rerun::LineStrips2D::new([rerun_shift(&strip)])
                .with_colors([INLIER_COLOR]),
        )
        .unwrap();

    for (name, points, color) in [
        ("inliers", &snapshot.inliers, INLIER_COLOR),
        ("outliers", &snapshot.outliers, OUTLIER_COLOR),
    ] {
        let pts: Vec<(f32, f32)> = points.iter().map(|p| (p.x as f32, p.y as f32)).collect();
        recording
            .log(
                format!("{}/{}", topic, name),
                &rerun::Points2D::new(rerun_shift(&pts))
                    .with_colors([color])
                    .with_radii([rerun::Radius::new_ui_points(3.0)]),
            )
            .unwrap();
    }
}
