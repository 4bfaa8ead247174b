//! Image encoding WASM bindings.
//!
//! Panels are written by the browser, so encoding happens here and the
//! resulting bytes are handed back for saving.
//!
//! ```typescript
//! const jpeg = encode_jpeg_from_image(panel, 95);
//! const writable = await fileHandle.createWritable();
//! await writable.write(new Blob([jpeg], { type: 'image/jpeg' }));
//! await writable.close();
//! ```

use crate::types::{to_js_error, JsDecodedImage};
use panelcut_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGB pixel data (3 bytes per pixel, row-major) to JPEG bytes.
///
/// `quality` is clamped to 1-100; exported panels use 95.
///
/// # Errors
///
/// Returns an error if the pixel data length doesn't match
/// `width * height * 3` or either dimension is zero.
#[wasm_bindgen]
pub fn encode_jpeg(pixels: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality).map_err(to_js_error)
}

/// Encode a JsDecodedImage to JPEG bytes.
#[wasm_bindgen]
pub fn encode_jpeg_from_image(image: &JsDecodedImage, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_image(&image.to_decoded(), quality).map_err(to_js_error)
}

/// Quality used for exported panels.
#[wasm_bindgen]
pub fn export_jpeg_quality() -> u8 {
    encode::EXPORT_JPEG_QUALITY
}
