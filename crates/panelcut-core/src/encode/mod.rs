//! Image encoding for panel export.
//!
//! Panels are written as baseline JPEG at `ExportPlan::jpeg_quality`
//! (default [`EXPORT_JPEG_QUALITY`]), clamped to 1-100.
//!
//! # Examples
//!
//! ```ignore
//! use panelcut_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 95).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_image, encode_jpeg, EncodeError, EXPORT_JPEG_QUALITY};
