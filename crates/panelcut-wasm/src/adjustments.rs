//! Sheet adjustment WASM bindings.
//!
//! Exposes the brightness, contrast and saturation controls so the sheet can
//! be previewed before panels are marked.

use crate::types::{to_js_error, JsDecodedImage};
use panelcut_core::ImageAdjustments;
use wasm_bindgen::prelude::*;

/// Sheet adjustments wrapper for JavaScript
#[wasm_bindgen]
pub struct JsImageAdjustments {
    inner: ImageAdjustments,
}

#[wasm_bindgen]
impl JsImageAdjustments {
    /// Create adjustments that leave the sheet unchanged
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: ImageAdjustments::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> f32 {
        self.inner.brightness
    }

    /// Set brightness offset (-100 to 100)
    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: f32) {
        self.inner.brightness = value;
    }

    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> f32 {
        self.inner.contrast
    }

    /// Set contrast multiplier (0.5 to 2.0)
    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: f32) {
        self.inner.contrast = value;
    }

    #[wasm_bindgen(getter)]
    pub fn saturation(&self) -> f32 {
        self.inner.saturation
    }

    /// Set saturation multiplier (0.0 to 2.0)
    #[wasm_bindgen(setter)]
    pub fn set_saturation(&mut self, value: f32) {
        self.inner.saturation = value;
    }

    /// Check if applying these adjustments leaves pixels unchanged
    pub fn is_identity(&self) -> bool {
        self.inner.clamped().is_identity()
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(to_js_error)
    }

    /// Deserialize from JSON. Missing fields take their identity value.
    pub fn from_json(value: JsValue) -> Result<JsImageAdjustments, JsValue> {
        let inner: ImageAdjustments = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        Ok(Self { inner })
    }
}

impl Default for JsImageAdjustments {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply adjustments to a sheet, returning a new image.
///
/// Out-of-range values are clamped. The source image is left untouched so
/// the next call can start again from the original.
///
/// # Example (TypeScript)
/// ```typescript
/// const adj = new JsImageAdjustments();
/// adj.brightness = 20;
/// adj.contrast = 1.2;
/// const preview = apply_adjustments(sheet, adj);
/// ```
#[wasm_bindgen]
pub fn apply_adjustments(image: &JsDecodedImage, adjustments: &JsImageAdjustments) -> JsDecodedImage {
    let adjusted = panelcut_core::adjust_image(&image.to_decoded(), &adjustments.inner);
    JsDecodedImage::from_decoded(adjusted)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_json_round_trip() {
        let mut adj = JsImageAdjustments::new();
        adj.set_contrast(1.25);

        let json = adj.to_json().unwrap();
        let restored = JsImageAdjustments::from_json(json).unwrap();
        assert_eq!(restored.contrast(), 1.25);
        assert_eq!(restored.saturation(), 1.0);
    }
}
