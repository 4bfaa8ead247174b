//! Sheet adjustment algorithms
//!
//! Applies the operator's tone adjustments to RGB pixel data before panels
//! are rectified.
//!
//! ## Adjustment Order
//! 1. Saturation (HSV saturation scale, hue and value kept)
//! 2. Contrast and brightness (`|in * contrast + brightness|`, saturated to 0..255)

use crate::decode::DecodedImage;
use crate::ImageAdjustments;

/// Produce a new adjusted image from `original`.
///
/// Adjustments are always applied to the untouched original, so applying a
/// new set replaces the previous one instead of stacking on it.
pub fn adjust_image(original: &DecodedImage, adjustments: &ImageAdjustments) -> DecodedImage {
    let mut adjusted = original.clone();
    apply_all_adjustments(&mut adjusted.pixels, adjustments);
    log::debug!(
        "Adjusted {}x{} image: brightness={} contrast={} saturation={}",
        adjusted.width,
        adjusted.height,
        adjustments.brightness,
        adjustments.contrast,
        adjustments.saturation
    );
    adjusted
}

/// Apply all adjustments to an image's pixel data in place.
///
/// Values outside the supported ranges are clamped first.
///
/// # Example
/// ```ignore
/// use panelcut_core::{adjustments::apply_all_adjustments, ImageAdjustments};
///
/// let mut pixels = vec![100, 100, 100];
/// let adj = ImageAdjustments { brightness: 10.0, ..Default::default() };
///
/// apply_all_adjustments(&mut pixels, &adj);
/// assert_eq!(pixels, vec![110, 110, 110]);
/// ```
pub fn apply_all_adjustments(pixels: &mut [u8], adjustments: &ImageAdjustments) {
    let adj = adjustments.clamped();
    if adj.is_identity() {
        return;
    }

    for chunk in pixels.chunks_exact_mut(3) {
        let mut r = chunk[0] as f32;
        let mut g = chunk[1] as f32;
        let mut b = chunk[2] as f32;

        (r, g, b) = apply_saturation(r, g, b, adj.saturation);
        (r, g, b) = apply_contrast_brightness(r, g, b, adj.contrast, adj.brightness);

        chunk[0] = to_u8(r);
        chunk[1] = to_u8(g);
        chunk[2] = to_u8(b);
    }
}

/// Scale HSV saturation by `factor`, capping it at 1.0.
///
/// In HSV each channel is `V * (1 - S * f(H))`, so `V - c` is proportional to
/// `S` for a fixed hue. Scaling that distance scales saturation while keeping
/// hue and value.
#[inline]
fn apply_saturation(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    if factor == 1.0 {
        return (r, g, b);
    }
    let value = r.max(g).max(b);
    let min = r.min(g).min(b);
    if value <= 0.0 || value == min {
        // Achromatic pixel, saturation is zero
        return (r, g, b);
    }

    let sat = (value - min) / value;
    let new_sat = (sat * factor).min(1.0);
    let ratio = new_sat / sat;

    (
        value - (value - r) * ratio,
        value - (value - g) * ratio,
        value - (value - b) * ratio,
    )
}

/// Linear contrast and brightness, folded through an absolute value.
///
/// Formula: `output = |input * contrast + brightness|`
#[inline]
fn apply_contrast_brightness(
    r: f32,
    g: f32,
    b: f32,
    contrast: f32,
    brightness: f32,
) -> (f32, f32, f32) {
    if contrast == 1.0 && brightness == 0.0 {
        return (r, g, b);
    }
    (
        (r * contrast + brightness).abs(),
        (g * contrast + brightness).abs(),
        (b * contrast + brightness).abs(),
    )
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
