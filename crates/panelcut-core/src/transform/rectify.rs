//! Rectification of a marked panel into an upright rectangle.
//!
//! The output size comes from the quad's measured edges: width is the mean of
//! the top and bottom edge lengths, height the mean of the left and right edge
//! lengths rounded up to a multiple of [`HEIGHT_STEP`]. The corners are then
//! mapped onto `(0, 0), (w-1, 0), (w-1, h-1), (0, h-1)`.

use std::fmt;

use thiserror::Error;

use super::perspective::{warp_perspective, InterpolationFilter};
use crate::decode::{panel_thumbnail, DecodeError, DecodedImage};
use crate::geometry::{homography_from_4pt, is_self_intersecting, quad_area, Point};
use crate::selection::Panel;

/// Rectified heights are rounded up to a multiple of this.
pub const HEIGHT_STEP: u32 = 100;

/// Largest rectified width or height accepted.
pub const MAX_PANEL_SIDE: u32 = 32_768;

const EPSILON: f64 = 1e-9;

/// Why a quad cannot be rectified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    ZeroLengthEdge,
    ZeroArea,
    SelfIntersecting,
    ZeroDimension,
    TooLarge,
    SingularTransform,
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DegenerateReason::ZeroLengthEdge => "two corners coincide",
            DegenerateReason::ZeroArea => "corners enclose no area",
            DegenerateReason::SelfIntersecting => "edges cross each other",
            DegenerateReason::ZeroDimension => "measured size is zero",
            DegenerateReason::TooLarge => "measured size exceeds the panel limit",
            DegenerateReason::SingularTransform => "no perspective transform exists",
        })
    }
}

/// Errors from rectifying and rescaling a panel. `panel` is the one-based
/// number shown to the operator.
#[derive(Debug, Error)]
pub enum RectifyError {
    #[error("Panel {panel}: degenerate panel geometry ({reason})")]
    DegenerateGeometry {
        panel: usize,
        reason: DegenerateReason,
    },

    #[error("Panel {panel}: invalid sheet: {source}")]
    InvalidImage {
        panel: usize,
        #[source]
        source: DecodeError,
    },

    #[error("Panel {panel}: resize failed: {source}")]
    Resize {
        panel: usize,
        #[source]
        source: DecodeError,
    },
}

impl RectifyError {
    /// One-based number of the panel that failed.
    pub fn panel(&self) -> usize {
        match self {
            RectifyError::DegenerateGeometry { panel, .. }
            | RectifyError::InvalidImage { panel, .. }
            | RectifyError::Resize { panel, .. } => *panel,
        }
    }
}

/// A panel warped into an upright rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RectifiedPanel {
    /// Id of the [`Panel`] this was cut from.
    pub source_panel_id: usize,
    pub image: DecodedImage,
}

impl RectifiedPanel {
    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }
}

/// Output size for normalised corners `[tl, tr, br, bl]`.
///
/// Width is the rounded mean of the top and bottom edges. Height is the
/// rounded mean of the right and left edges, then rounded up to the next
/// multiple of [`HEIGHT_STEP`].
pub fn measure_quad(corners: &[Point; 4]) -> (u32, u32) {
    let [tl, tr, br, bl] = *corners;
    let width = ((tr.distance(tl) + br.distance(bl)) / 2.0).round();
    let height = ((br.distance(tr) + tl.distance(bl)) / 2.0).round();

    let width = width.min(u32::MAX as f64) as u32;
    let height = round_up_to_step(height.min(u32::MAX as f64) as u32);
    (width, height)
}

#[inline]
fn round_up_to_step(height: u32) -> u32 {
    height.div_ceil(HEIGHT_STEP).saturating_mul(HEIGHT_STEP)
}

/// Warp the quad `corners` (any order) of `image` into an upright rectangle.
///
/// # Errors
///
/// Returns the [`DegenerateReason`] when the quad has coincident corners, no
/// area, crossing edges, a zero or oversized measured size, or no
/// projective transform.
pub fn rectify_quad(
    image: &DecodedImage,
    corners: &[Point; 4],
    filter: InterpolationFilter,
) -> Result<DecodedImage, DegenerateReason> {
    let quad = crate::geometry::normalize_corners(corners);
    check_quad(&quad)?;

    let (width, height) = measure_quad(&quad);
    if width == 0 || height == 0 {
        return Err(DegenerateReason::ZeroDimension);
    }
    if width > MAX_PANEL_SIDE || height > MAX_PANEL_SIDE {
        return Err(DegenerateReason::TooLarge);
    }

    let (w, h) = ((width - 1) as f64, (height - 1) as f64);
    let target = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];

    // Map output pixels back onto the source quad
    let src_from_dst =
        homography_from_4pt(&target, &quad).ok_or(DegenerateReason::SingularTransform)?;

    log::debug!("Rectifying quad {:?} into {}x{}", quad, width, height);
    Ok(warp_perspective(image, &src_from_dst, width, height, filter))
}

/// Rectify a committed panel with the export filter.
pub fn rectify_panel(image: &DecodedImage, panel: &Panel) -> Result<RectifiedPanel, RectifyError> {
    let rectified = rectify_checked(image, panel, InterpolationFilter::Bicubic)?;
    Ok(RectifiedPanel {
        source_panel_id: panel.id,
        image: rectified,
    })
}

/// Quick `height`-pixel-tall preview of a panel, for the panel list.
///
/// Rectifies with the bilinear filter and scales the result down.
pub fn preview_panel(
    image: &DecodedImage,
    panel: &Panel,
    height: u32,
) -> Result<DecodedImage, RectifyError> {
    let rectified = rectify_checked(image, panel, InterpolationFilter::Bilinear)?;
    panel_thumbnail(&rectified, height).map_err(|source| RectifyError::Resize {
        panel: panel.number(),
        source,
    })
}

fn rectify_checked(
    image: &DecodedImage,
    panel: &Panel,
    filter: InterpolationFilter,
) -> Result<DecodedImage, RectifyError> {
    image.validate().map_err(|source| RectifyError::InvalidImage {
        panel: panel.number(),
        source,
    })?;
    rectify_quad(image, &panel.corners, filter).map_err(|reason| {
        RectifyError::DegenerateGeometry {
            panel: panel.number(),
            reason,
        }
    })
}

fn check_quad(quad: &[Point; 4]) -> Result<(), DegenerateReason> {
    for i in 0..4 {
        if quad[i].distance(quad[(i + 1) % 4]) < EPSILON {
            return Err(DegenerateReason::ZeroLengthEdge);
        }
    }
    if quad_area(quad).abs() < EPSILON {
        return Err(DegenerateReason::ZeroArea);
    }
    if is_self_intersecting(quad) {
        return Err(DegenerateReason::SelfIntersecting);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn panel(id: usize, corners: [Point; 4]) -> Panel {
        Panel { id, corners }
    }

    /// Rows differ, columns are uniform.
    fn row_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for _ in 0..width {
                pixels.extend_from_slice(&[(y % 256) as u8, (255 - y % 256) as u8, 40]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_measure_rounds_height_up_to_step() {
        let quad = [p(0.0, 0.0), p(300.0, 0.0), p(300.0, 150.0), p(0.0, 150.0)];
        assert_eq!(measure_quad(&quad), (300, 200));

        let quad = [p(0.0, 0.0), p(300.0, 0.0), p(300.0, 200.0), p(0.0, 200.0)];
        assert_eq!(measure_quad(&quad), (300, 200));

        let quad = [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.4), p(0.0, 0.4)];
        assert_eq!(measure_quad(&quad), (10, 0));
    }

    #[test]
    fn test_measure_uses_mean_of_opposite_edges() {
        // Side edges average about 56, which steps up to 100
        let quad = [p(0.0, 0.0), p(100.0, 0.0), p(110.0, 60.0), p(-11.0, 50.0)];
        let (w, h) = measure_quad(&quad);
        assert_eq!(h, 100);
        let expected = ((100.0 + p(110.0, 60.0).distance(p(-11.0, 50.0))) / 2.0f64).round();
        assert_eq!(w, expected as u32);
    }

    #[test]
    fn test_axis_aligned_rect_matches_crop() {
        // 99 rows between top and bottom edge: height 99 rounds up to 100,
        // so rows map one to one.
        let img = row_image(60, 140);
        let corners = [p(10.0, 20.0), p(50.0, 20.0), p(50.0, 119.0), p(10.0, 119.0)];
        let out = rectify_panel(&img, &panel(0, corners)).unwrap();

        assert_eq!((out.width(), out.height()), (40, 100));
        assert_eq!(out.source_panel_id, 0);
        for y in 0..100 {
            for x in [0, 17, 39] {
                assert_eq!(out.image.pixel(x, y), img.pixel(10, y + 20), "row {y}");
            }
        }
    }

    #[test]
    fn test_click_order_does_not_matter() {
        let img = row_image(60, 140);
        let a = [p(10.0, 20.0), p(50.0, 20.0), p(50.0, 119.0), p(10.0, 119.0)];
        let b = [a[2], a[0], a[3], a[1]];

        let out_a = rectify_panel(&img, &panel(0, a)).unwrap();
        let out_b = rectify_panel(&img, &panel(0, b)).unwrap();
        assert_eq!(out_a.image, out_b.image);
    }

    #[test]
    fn test_skewed_quad_has_step_height() {
        let img = row_image(400, 400);
        let corners = [p(40.0, 30.0), p(330.0, 55.0), p(350.0, 260.0), p(25.0, 240.0)];
        let out = rectify_panel(&img, &panel(2, corners)).unwrap();

        assert_eq!(out.height() % HEIGHT_STEP, 0);
        assert_eq!(out.image.pixels.len(), (out.width() * out.height() * 3) as usize);
        assert_eq!(out.source_panel_id, 2);
    }

    #[test]
    fn test_short_buffer_is_rejected_without_panicking() {
        let img = DecodedImage {
            width: 50,
            height: 50,
            pixels: vec![0; 30],
        };
        let corners = [p(5.0, 5.0), p(45.0, 5.0), p(45.0, 45.0), p(5.0, 45.0)];

        let out = rectify_quad(&img, &corners, InterpolationFilter::Bicubic).unwrap();
        assert_eq!((out.width, out.height), (40, 100));
        assert!(out.pixels.iter().all(|&v| v == 0));

        let err = rectify_panel(&img, &panel(1, corners)).unwrap_err();
        assert!(matches!(err, RectifyError::InvalidImage { panel: 2, .. }));
        assert!(err.to_string().starts_with("Panel 2: invalid sheet:"));

        assert!(matches!(
            preview_panel(&img, &panel(1, corners), 20),
            Err(RectifyError::InvalidImage { panel: 2, .. })
        ));
    }

    #[test]
    fn test_preview_panel_height() {
        let img = row_image(60, 140);
        let corners = [p(10.0, 20.0), p(50.0, 20.0), p(50.0, 119.0), p(10.0, 119.0)];
        let preview = preview_panel(&img, &panel(0, corners), 50).unwrap();
        assert_eq!((preview.width, preview.height), (20, 50));
    }

    #[test]
    fn test_forced_panel_with_duplicate_corner_is_degenerate() {
        let img = row_image(50, 50);
        let corners = [p(0.0, 0.0), p(40.0, 0.0), p(40.0, 40.0), p(40.0, 40.0)];
        let err = rectify_panel(&img, &panel(4, corners)).unwrap_err();

        assert!(matches!(
            err,
            RectifyError::DegenerateGeometry {
                panel: 5,
                reason: DegenerateReason::ZeroLengthEdge
            }
        ));
        assert_eq!(err.panel(), 5);
        assert_eq!(
            err.to_string(),
            "Panel 5: degenerate panel geometry (two corners coincide)"
        );
    }

    #[test]
    fn test_collinear_corners_are_degenerate() {
        let img = row_image(50, 50);
        let corners = [p(0.0, 0.0), p(10.0, 10.0), p(20.0, 20.0), p(30.0, 30.0)];
        assert_eq!(
            rectify_quad(&img, &corners, InterpolationFilter::Bicubic),
            Err(DegenerateReason::ZeroArea)
        );
    }

    #[test]
    fn test_sliver_with_zero_height_is_degenerate() {
        let img = row_image(50, 50);
        let corners = [p(0.0, 0.0), p(30.0, 0.0), p(30.0, 0.3), p(0.0, 0.3)];
        assert_eq!(
            rectify_quad(&img, &corners, InterpolationFilter::Bicubic),
            Err(DegenerateReason::ZeroDimension)
        );
    }

    #[test]
    fn test_quad_far_outside_sheet_is_too_large() {
        let img = row_image(50, 50);
        let corners = [p(0.0, 0.0), p(1e12, 0.0), p(1e12, 1e12), p(0.0, 1e12)];
        assert_eq!(
            rectify_quad(&img, &corners, InterpolationFilter::Bicubic),
            Err(DegenerateReason::TooLarge)
        );
    }
}
