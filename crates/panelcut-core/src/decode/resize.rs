//! Image resizing for sheet upscaling, panel normalisation and thumbnails.
//!
//! Provides resize operations using the `image` crate's algorithms.
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` for a zero-sized target and
/// `DecodeError::CorruptedFile` if the source buffer does not match its
/// declared dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Resize an image to an exact height, scaling the width proportionally.
///
/// The new width is `round(width * target_height / height)`, never below 1.
pub fn resize_to_height(
    image: &DecodedImage,
    target_height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    let (width, height) = scale_to_height(image.width, image.height, target_height)?;
    resize(image, width, height, filter)
}

/// Resize an image to an exact width, scaling the height proportionally.
///
/// The new height is `round(height * target_width / width)`, never below 1.
pub fn resize_to_width(
    image: &DecodedImage,
    target_width: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    let (width, height) = scale_to_width(image.width, image.height, target_width)?;
    resize(image, width, height, filter)
}

/// Upscale a freshly decoded sheet to the working width.
///
/// Uses the bicubic filter so that small sheets stay smooth when enlarged.
pub fn upscale_to_width(image: &DecodedImage, width: u32) -> Result<DecodedImage, DecodeError> {
    resize_to_width(image, width, FilterType::Bicubic)
}

/// Generate a fixed-height preview of a panel.
///
/// Previews use bilinear interpolation for speed.
pub fn panel_thumbnail(image: &DecodedImage, height: u32) -> Result<DecodedImage, DecodeError> {
    resize_to_height(image, height, FilterType::Bilinear)
}

/// Dimensions of `width x height` scaled to `target_height`, preserving aspect ratio.
pub(crate) fn scale_to_height(
    width: u32,
    height: u32,
    target_height: u32,
) -> Result<(u32, u32), DecodeError> {
    if width == 0 || height == 0 || target_height == 0 {
        return Err(DecodeError::InvalidDimensions {
            width,
            height: target_height,
        });
    }
    let factor = target_height as f64 / height as f64;
    let new_width = (width as f64 * factor).round() as u32;
    Ok((new_width.max(1), target_height))
}

/// Dimensions of `width x height` scaled to `target_width`, preserving aspect ratio.
pub(crate) fn scale_to_width(
    width: u32,
    height: u32,
    target_width: u32,
) -> Result<(u32, u32), DecodeError> {
    if width == 0 || height == 0 || target_width == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: target_width,
            height,
        });
    }
    let factor = target_width as f64 / width as f64;
    let new_height = (height as f64 * factor).round() as u32;
    Ok((target_width, new_height.max(1)))
}
