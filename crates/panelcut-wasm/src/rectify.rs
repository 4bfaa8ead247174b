//! Panel rectification WASM bindings.

use crate::session::JsPanelSession;
use crate::types::{resolution_from_str, to_js_error, JsDecodedImage};
use panelcut_core::transform::preview_panel;
use panelcut_core::{DecodedImage, PanelSession, ResolutionMode};
use wasm_bindgen::prelude::*;

/// Rectify every panel marked in `session` and rescale it.
///
/// `resolution` is one of "1080 tall", "1920 wide" or "auto". Panels whose
/// corners are degenerate are left out and reported on the console, so the
/// returned array can be shorter than `session.panel_count`.
///
/// # Errors
///
/// Returns an error for an unknown resolution label or a sheet whose pixel
/// buffer does not match its dimensions.
///
/// # Example (TypeScript)
/// ```typescript
/// session.finish();
/// const panels = rectify_panels(sheet, session, "1080 tall");
/// panels.forEach((p, i) => showThumbnail(panel_thumbnail(p, 120), i));
/// ```
#[wasm_bindgen]
pub fn rectify_panels(
    image: &JsDecodedImage,
    session: &JsPanelSession,
    resolution: &str,
) -> Result<js_sys::Array, JsValue> {
    let mode = resolution_from_str(resolution)?;
    let sheet = image.to_decoded();
    sheet.validate().map_err(to_js_error)?;

    let array = js_sys::Array::new();
    for panel in rectified_images(&sheet, session.inner(), mode) {
        array.push(&JsValue::from(JsDecodedImage::from_decoded(panel)));
    }
    Ok(array)
}

/// Small preview of panel `id`, `height` pixels tall.
///
/// Uses bilinear rectification, so it is cheap enough to refresh after every
/// committed panel.
#[wasm_bindgen]
pub fn panel_preview(
    image: &JsDecodedImage,
    session: &JsPanelSession,
    id: usize,
    height: u32,
) -> Result<JsDecodedImage, JsValue> {
    let panel = session
        .inner()
        .panels()
        .get(id)
        .ok_or_else(|| JsValue::from_str(&format!("No panel with id {id}")))?;
    preview_panel(&image.to_decoded(), panel, height)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Labels accepted by [`rectify_panels`], default first.
#[wasm_bindgen]
pub fn resolution_modes() -> Vec<String> {
    ResolutionMode::ALL
        .iter()
        .map(|mode| mode.label().to_string())
        .collect()
}

fn rectified_images(
    image: &DecodedImage,
    session: &PanelSession,
    mode: ResolutionMode,
) -> Vec<DecodedImage> {
    panelcut_core::rectify_panels(image, session.panels(), mode)
        .panels
        .into_iter()
        .map(|panel| panel.image)
        .collect()
}
