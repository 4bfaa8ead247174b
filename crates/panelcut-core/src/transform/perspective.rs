//! Perspective warping with bilinear and bicubic interpolation.
//!
//! # Algorithm
//!
//! The warp uses inverse mapping: for each pixel in the output image, the
//! transform gives the source position it came from and the source is
//! interpolated there. Pixel centres sit on integer coordinates, so output
//! `(0, 0)` samples exactly at the image position the transform assigns it.
//!
//! Positions outside `[-0.5, size - 0.5]` on either axis produce black.
//! Inside that range, kernel taps that fall off the image reuse the nearest
//! edge pixel.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::geometry::{Homography, Point};

/// Interpolation filter for warping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// 2x2 neighbourhood, for previews.
    Bilinear,
    /// 4x4 cubic convolution, for export.
    #[default]
    Bicubic,
}

/// Cubic convolution coefficient. Matches the common INTER_CUBIC kernel.
const CUBIC_A: f64 = -0.75;

/// Warp `image` into a `width x height` output.
///
/// `src_from_dst` maps output pixel coordinates to source pixel coordinates.
/// An empty source, or one whose buffer does not match its dimensions, gives
/// an all-black output.
///
/// # Example
///
/// ```ignore
/// use panelcut_core::geometry::Homography;
/// use panelcut_core::transform::{warp_perspective, InterpolationFilter};
///
/// let copy = warp_perspective(&image, &Homography::identity(), image.width, image.height,
///     InterpolationFilter::Bicubic);
/// ```
pub fn warp_perspective(
    image: &DecodedImage,
    src_from_dst: &Homography,
    width: u32,
    height: u32,
    filter: InterpolationFilter,
) -> DecodedImage {
    let mut output = vec![0u8; (width as usize) * (height as usize) * 3];
    if image.is_empty() || image.validate().is_err() {
        return DecodedImage::new(width, height, output);
    }

    for dst_y in 0..height {
        for dst_x in 0..width {
            let src = src_from_dst.apply(Point::new(dst_x as f64, dst_y as f64));

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src.x, src.y),
                InterpolationFilter::Bicubic => sample_bicubic(image, src.x, src.y),
            };

            let dst_idx = ((dst_y as usize) * (width as usize) + dst_x as usize) * 3;
            output[dst_idx..dst_idx + 3].copy_from_slice(&pixel);
        }
    }

    DecodedImage::new(width, height, output)
}

/// Whether `(x, y)` lies on the image, counting the outer half pixel.
#[inline]
fn in_bounds(image: &DecodedImage, x: f64, y: f64) -> bool {
    x.is_finite()
        && y.is_finite()
        && x >= -0.5
        && x <= image.width as f64 - 0.5
        && y >= -0.5
        && y <= image.height as f64 - 0.5
}

/// Get a pixel as [f64; 3], clamping the coordinates to the image.
#[inline]
fn get_pixel_clamped(image: &DecodedImage, px: i64, py: i64) -> [f64; 3] {
    let px = px.clamp(0, image.width as i64 - 1) as usize;
    let py = py.clamp(0, image.height as i64 - 1) as usize;
    let idx = (py * image.width as usize + px) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    if !in_bounds(image, x, y) {
        return [0, 0, 0];
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_clamped(image, x0, y0);
    let p10 = get_pixel_clamped(image, x0 + 1, y0);
    let p01 = get_pixel_clamped(image, x0, y0 + 1);
    let p11 = get_pixel_clamped(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}

fn sample_bicubic(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    if !in_bounds(image, x, y) {
        return [0, 0, 0];
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let wx = cubic_weights(x - x0 as f64);
    let wy = cubic_weights(y - y0 as f64);

    let mut sum = [0.0f64; 3];
    for (j, weight_y) in wy.iter().enumerate() {
        let py = y0 - 1 + j as i64;
        for (i, weight_x) in wx.iter().enumerate() {
            let px = x0 - 1 + i as i64;
            let weight = weight_x * weight_y;
            let pixel = get_pixel_clamped(image, px, py);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
        }
    }

    [
        sum[0].clamp(0.0, 255.0).round() as u8,
        sum[1].clamp(0.0, 255.0).round() as u8,
        sum[2].clamp(0.0, 255.0).round() as u8,
    ]
}

/// Weights for taps at offsets -1, 0, 1, 2 given fractional position `t`.
#[inline]
fn cubic_weights(t: f64) -> [f64; 4] {
    [
        cubic_kernel(t + 1.0),
        cubic_kernel(t),
        cubic_kernel(1.0 - t),
        cubic_kernel(2.0 - t),
    ]
}

/// Cubic convolution kernel:
/// ```text
/// W(x) = (a+2)|x|^3 - (a+3)|x|^2 + 1      for |x| <= 1
/// W(x) = a|x|^3 - 5a|x|^2 + 8a|x| - 4a    for 1 < |x| < 2
/// W(x) = 0                                otherwise
/// ```
#[inline]
fn cubic_kernel(x: f64) -> f64 {
    let x = x.abs();
    if x <= 1.0 {
        ((CUBIC_A + 2.0) * x - (CUBIC_A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((CUBIC_A * x - 5.0 * CUBIC_A) * x + 8.0 * CUBIC_A) * x - 4.0 * CUBIC_A
    } else {
        0.0
    }
}
