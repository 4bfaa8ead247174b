//! Storyboard sheet loading for Panelcut.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and BMP sheets with EXIF orientation applied
//! - Upscaling a freshly decoded sheet to the working width
//! - Resizing panels and generating fixed-height thumbnails
//!
//! All operations are synchronous and work on in-memory buffers, so the same
//! code runs natively and inside WASM.
//!
//! # Examples
//!
//! ```ignore
//! use panelcut_core::decode::{load_sheet, LoadOptions};
//!
//! let bytes = std::fs::read("sheet.jpg").unwrap();
//! let sheet = load_sheet(&bytes, &LoadOptions::default()).unwrap();
//! println!("Working sheet is {}x{}", sheet.width, sheet.height);
//! ```

mod load;
mod resize;
mod types;

pub use load::{decode_image, get_orientation, load_sheet};
pub use resize::{
    panel_thumbnail, resize, resize_to_height, resize_to_width, upscale_to_width,
};
pub(crate) use resize::{scale_to_height, scale_to_width};
pub use types::{
    DecodeError, DecodedImage, FilterType, LoadOptions, Orientation, DEFAULT_UPSCALE_WIDTH,
    MIN_UPSCALE_WIDTH,
};
