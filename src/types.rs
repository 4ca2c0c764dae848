use glam::DVec2;
use nalgebra as na;

/// Homogeneous 2D transform. Affine models leave the bottom row at (0, 0, 1)
/// but points are always applied with the full w-divide so projective
/// engines plug in unchanged.
pub type Transform2 = na::Matrix3<f64>;

/// Applies a homogeneous 2D transform to a point.
pub fn transform_point(t: &Transform2, p: DVec2) -> DVec2 {
    let w = t[(2, 0)] * p.x + t[(2, 1)] * p.y + t[(2, 2)];
    DVec2::new(
        (t[(0, 0)] * p.x + t[(0, 1)] * p.y + t[(0, 2)]) / w,
        (t[(1, 0)] * p.x + t[(1, 1)] * p.y + t[(1, 2)]) / w,
    )
}

/// Builds the affine transform (scale sx, sy then translate tx, ty).
pub fn affine(sx: f64, sy: f64, tx: f64, ty: f64) -> Transform2 {
    na::Matrix3::new(sx, 0.0, tx, 0.0, sy, ty, 0.0, 0.0, 1.0)
}

/// Footprint of the current frame projected into mosaic coordinates.
///
/// Corners are ordered: top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrilateral {
    pub p0: DVec2,
    pub p1: DVec2,
    pub p2: DVec2,
    pub p3: DVec2,
}

impl Quadrilateral {
    pub fn new(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2) -> Quadrilateral {
        Quadrilateral { p0, p1, p2, p3 }
    }

    /// Axis-aligned footprint of a w x h frame at the origin.
    pub fn of_frame(width: u32, height: u32) -> Quadrilateral {
        let (w, h) = (width as f64, height as f64);
        Quadrilateral {
            p0: DVec2::ZERO,
            p1: DVec2::new(w, 0.0),
            p2: DVec2::new(w, h),
            p3: DVec2::new(0.0, h),
        }
    }

    pub fn corners(&self) -> [DVec2; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Projects all four corners through a transform.
    pub fn transformed(&self, t: &Transform2) -> Quadrilateral {
        Quadrilateral {
            p0: transform_point(t, self.p0),
            p1: transform_point(t, self.p1),
            p2: transform_point(t, self.p2),
            p3: transform_point(t, self.p3),
        }
    }

    /// True when every corner lies at least `margin` pixels inside the
    /// w x h canvas.
    pub fn inside(&self, width: u32, height: u32, margin: f64) -> bool {
        let lo_x = margin;
        let lo_y = margin;
        let hi_x = width as f64 - margin;
        let hi_y = height as f64 - margin;
        self.corners()
            .iter()
            .all(|p| p.x >= lo_x && p.x < hi_x && p.y >= lo_y && p.y < hi_y)
    }
}
