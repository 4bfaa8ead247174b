//! Storyboard sheet decoding with EXIF orientation handling.
//!
//! Sheets arrive as JPEG, PNG or BMP bytes. Orientation recorded in EXIF is
//! applied before anything else so that clicked coordinates line up with what
//! the operator sees.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::resize::upscale_to_width;
use super::{DecodeError, DecodedImage, LoadOptions, Orientation};

/// Decode a sheet from bytes, applying EXIF orientation correction.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognised and
/// `DecodeError::CorruptedFile` if the data cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let rgb_img = apply_orientation(img, orientation).into_rgb8();
    log::debug!(
        "decoded {}x{} sheet (orientation {:?})",
        rgb_img.width(),
        rgb_img.height(),
        orientation
    );
    Ok(DecodedImage::from_rgb_image(rgb_img))
}

/// Decode a sheet and upscale it to the configured working width.
///
/// This is the entry point used when a new sheet is opened: panels are always
/// marked on the upscaled copy.
pub fn load_sheet(bytes: &[u8], options: &LoadOptions) -> Result<DecodedImage, DecodeError> {
    options.validate()?;
    let decoded = decode_image(bytes)?;
    upscale_to_width(&decoded, options.upscale_width)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
