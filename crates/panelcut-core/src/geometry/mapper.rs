//! Display-surface to image coordinate mapping.
//!
//! The display surface shows the image scaled to fit and centred
//! (letterboxed). A pointer position in surface pixels is mapped back to the
//! source pixel under it.

use super::Point;
use serde::{Deserialize, Serialize};

/// Rendered size of the surface an image is displayed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySurface {
    pub width: u32,
    pub height: u32,
}

impl DisplaySurface {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Map a pointer position on this surface to a source-image pixel.
    ///
    /// See [`map_pointer`].
    pub fn to_image(&self, pointer: Point, image_width: u32, image_height: u32) -> Point {
        map_pointer(pointer, *self, image_width, image_height)
    }
}

/// Map a pointer position on `surface` to a pixel of an
/// `image_width x image_height` image.
///
/// The image is rendered at scale `min(surface_w / image_w, surface_h / image_h)`
/// with the rendered size truncated to whole pixels and centred with integer
/// offsets. The result is truncated to a whole pixel and clamped into the
/// image, so clicks in the letterbox land on the nearest edge. A zero-sized
/// surface or image maps every pointer to the origin.
pub fn map_pointer(
    pointer: Point,
    surface: DisplaySurface,
    image_width: u32,
    image_height: u32,
) -> Point {
    if surface.width == 0 || surface.height == 0 || image_width == 0 || image_height == 0 {
        return Point::default();
    }

    let scale = f64::min(
        surface.width as f64 / image_width as f64,
        surface.height as f64 / image_height as f64,
    );
    let rendered_w = (image_width as f64 * scale).floor() as i64;
    let rendered_h = (image_height as f64 * scale).floor() as i64;
    let offset_x = (surface.width as i64 - rendered_w).div_euclid(2);
    let offset_y = (surface.height as i64 - rendered_h).div_euclid(2);

    let x = to_pixel((pointer.x - offset_x as f64) / scale, image_width);
    let y = to_pixel((pointer.y - offset_y as f64) / scale, image_height);
    Point::new(x, y)
}

/// Truncate toward zero and clamp into `[0, extent - 1]`.
#[inline]
fn to_pixel(v: f64, extent: u32) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    v.trunc().clamp(0.0, (extent - 1) as f64)
}
