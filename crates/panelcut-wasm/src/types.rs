//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Panelcut
//! types, handling the conversion between Rust and JavaScript data.

use std::fmt::Display;

use panelcut_core::decode::{DecodedImage, FilterType};
use panelcut_core::ResolutionMode;
use wasm_bindgen::prelude::*;

/// A decoded RGB image held in WASM memory.
///
/// Calling `pixels()` copies the buffer into a JavaScript `Uint8Array`. Keep
/// sheets in WASM memory between calls and only extract pixels for display.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create an image from dimensions and RGB pixel data (3 bytes per pixel).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Release WASM memory now instead of waiting for the finalizer.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core DecodedImage. Clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Convert a u8 filter value to the core FilterType.
///
/// 0 = Nearest, 1 = Bilinear, 2 = Bicubic. Anything else is Bicubic.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        1 => FilterType::Bilinear,
        _ => FilterType::Bicubic,
    }
}

/// Parse a resolution label ("1080 tall", "1920 wide", "auto").
pub(crate) fn resolution_from_str(label: &str) -> Result<ResolutionMode, JsValue> {
    label.parse().map_err(to_js_error)
}

/// Turn any displayable error into a JavaScript string error.
pub(crate) fn to_js_error<E: Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}
