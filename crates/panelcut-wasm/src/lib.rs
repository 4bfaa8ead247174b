//! Panelcut WASM - WebAssembly bindings for Panelcut
//!
//! Exposes sheet loading, panel selection, rectification and export
//! numbering to a browser front end. Files are read and written by the
//! browser; this crate only sees bytes and names.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Sheet decoding and resizing
//! - `adjustments` - Brightness, contrast and saturation
//! - `session` - Corner clicks and committed panels
//! - `rectify` - Perspective rectification and output resolution
//! - `export` - Sequence filenames
//! - `encode` - JPEG encoding
//!
//! # Usage
//!
//! ```typescript
//! import init, { load_sheet, JsPanelSession, rectify_panels } from '@panelcut/wasm';
//!
//! await init();
//! const sheet = load_sheet(new Uint8Array(await file.arrayBuffer()), 7000);
//! const session = new JsPanelSession();
//! session.begin();
//! // ... forward canvas clicks with session.add_click(...)
//! session.finish();
//! const panels = rectify_panels(sheet, session, "1080 tall");
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod decode;
mod encode;
mod export;
mod logger;
mod rectify;
mod session;
mod types;

pub use adjustments::{apply_adjustments, JsImageAdjustments};
pub use decode::{decode_image, load_sheet, panel_thumbnail, resize, upscale_to_width};
pub use encode::{encode_jpeg, encode_jpeg_from_image, export_jpeg_quality};
pub use export::{next_sequence_number, plan_filenames};
pub use rectify::{panel_preview, rectify_panels, resolution_modes};
pub use session::JsPanelSession;
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    if let Err(err) = logger::init_with_level(log::LevelFilter::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
