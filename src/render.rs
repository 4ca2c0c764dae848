use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::snapshot::MosaicSnapshot;

/// Colors and marker size of the mosaic overlay.
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    /// Boundary polygon and inlier markers.
    pub highlight: Rgb<u8>,
    /// Outlier markers.
    pub contrast: Rgb<u8>,
    pub marker_radius: i32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            highlight: Rgb([255, 0, 0]),
            contrast: Rgb([0, 0, 255]),
            marker_radius: 3,
        }
    }
}

/// Renders one snapshot: the mosaic canvas, the closed boundary
/// quadrilateral, and filled circles at the tracked points.
pub fn render_overlay(snapshot: &MosaicSnapshot, style: &OverlayStyle) -> RgbImage {
    let mut out = gray_to_rgb(snapshot);

    let c = snapshot.corners.corners();
    for i in 0..4 {
        let a = c[i];
        let b = c[(i + 1) % 4];
        draw_line_segment_mut(
            &mut out,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            style.highlight,
        );
    }

    for p in &snapshot.inliers {
        draw_filled_circle_mut(
            &mut out,
            (p.x as i32, p.y as i32),
            style.marker_radius,
            style.highlight,
        );
    }
    for p in &snapshot.outliers {
        draw_filled_circle_mut(
            &mut out,
            (p.x as i32, p.y as i32),
            style.marker_radius,
            style.contrast,
        );
    }
    out
}

fn gray_to_rgb(snapshot: &MosaicSnapshot) -> RgbImage {
    let gray = &snapshot.image;
    let mut rgb = RgbImage::new(gray.width(), gray.height());
    for (x, y, p) in gray.enumerate_pixels() {
        let v = p.0[0];
        rgb.put_pixel(x, y, Rgb([v, v, v]));
    }
    rgb
}
