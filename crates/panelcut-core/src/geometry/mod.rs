//! Plane geometry for panel selection and rectification.
//!
//! - [`mapper`]: display-surface pointer to source-image pixel
//! - [`corners`]: ordering four clicked corners and quad sanity checks
//! - [`homography`]: four-point projective transforms

pub mod corners;
pub mod homography;
pub mod mapper;

pub use corners::{is_self_intersecting, normalize_corners, quad_area};
pub use homography::{homography_from_4pt, Homography};
pub use mapper::{map_pointer, DisplaySurface};

use serde::{Deserialize, Serialize};

/// A point in image (or display) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Clamp into the pixel grid of a `width x height` image.
    ///
    /// Non-finite coordinates become 0. A zero-sized image maps to the origin.
    pub fn clamped_to(self, width: u32, height: u32) -> Point {
        Point::new(clamp_axis(self.x, width), clamp_axis(self.y, height))
    }
}

#[inline]
fn clamp_axis(v: f64, extent: u32) -> f64 {
    if !v.is_finite() || extent == 0 {
        return 0.0;
    }
    v.clamp(0.0, (extent - 1) as f64)
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
        }
    }
}
