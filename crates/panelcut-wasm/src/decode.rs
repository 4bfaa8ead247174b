//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode a sheet (JPEG, PNG or BMP) from bytes
//! - [`load_sheet`] - Decode a sheet and rescale it to the working width
//! - [`upscale_to_width`] - Upscale a decoded sheet to a working width
//! - [`resize`] - Resize an image to exact dimensions
//! - [`panel_thumbnail`] - Small preview of a rectified panel
//!
//! # Example
//!
//! ```typescript
//! import { load_sheet } from '@panelcut/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const sheet = load_sheet(bytes, 7000);
//! console.log(`Sheet: ${sheet.width}x${sheet.height}`);
//! ```

use crate::types::{filter_from_u8, to_js_error, JsDecodedImage};
use panelcut_core::decode::{self, LoadOptions};
use wasm_bindgen::prelude::*;

/// Decode an image from bytes, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image format or the
/// file is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Decode a sheet and rescale it to `upscale_width` pixels wide.
///
/// Panels are marked on this working copy. `upscale_width` must be at
/// least 100.
#[wasm_bindgen]
pub fn load_sheet(bytes: &[u8], upscale_width: u32) -> Result<JsDecodedImage, JsValue> {
    let options = LoadOptions { upscale_width };
    decode::load_sheet(bytes, &options)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Upscale a sheet to `width` pixels wide with bicubic filtering.
#[wasm_bindgen]
pub fn upscale_to_width(image: &JsDecodedImage, width: u32) -> Result<JsDecodedImage, JsValue> {
    decode::upscale_to_width(&image.to_decoded(), width)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Resize an image to exact dimensions.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Bicubic
#[wasm_bindgen]
pub fn resize(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    decode::resize(&image.to_decoded(), width, height, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Scale a panel to `height` pixels tall for the panel list.
#[wasm_bindgen]
pub fn panel_thumbnail(image: &JsDecodedImage, height: u32) -> Result<JsDecodedImage, JsValue> {
    decode::panel_thumbnail(&image.to_decoded(), height)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}
