//! Panelcut Core - storyboard panel extraction library
//!
//! This crate provides the core functionality for Panelcut: loading a
//! storyboard sheet, marking panels by their four corners, rectifying each
//! panel into an upright rectangle, rescaling it and exporting a numbered
//! JPEG sequence.

pub mod adjustments;
pub mod decode;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod pipeline;
pub mod resolution;
pub mod selection;
pub mod transform;

pub use adjustments::adjust_image;
pub use decode::{DecodedImage, LoadOptions};
pub use export::{ExportPlan, ExportReport, NumberingMode};
pub use geometry::{DisplaySurface, Point};
pub use pipeline::{rectify_panels, Extractor, RectifyOutcome};
pub use resolution::{normalize_resolution, ResolutionMode};
pub use selection::{Panel, PanelSession, PointOutcome, SelectionError};
pub use transform::{rectify_panel, RectifiedPanel, RectifyError};

/// Brightness offset range.
pub const BRIGHTNESS_RANGE: (f32, f32) = (-100.0, 100.0);
/// Contrast multiplier range.
pub const CONTRAST_RANGE: (f32, f32) = (0.5, 2.0);
/// Saturation multiplier range.
pub const SATURATION_RANGE: (f32, f32) = (0.0, 2.0);

/// Tone adjustments applied to the whole sheet before panels are cut
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageAdjustments {
    /// Brightness offset added to every channel (-100 to 100)
    pub brightness: f32,
    /// Contrast multiplier (0.5 to 2.0)
    pub contrast: f32,
    /// Saturation multiplier (0.0 to 2.0)
    pub saturation: f32,
}

impl Default for ImageAdjustments {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

impl ImageAdjustments {
    /// Create a new ImageAdjustments with identity values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if applying these values leaves pixels unchanged
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Copy with every value clamped into its supported range
    pub fn clamped(&self) -> Self {
        Self {
            brightness: clamp_or(self.brightness, BRIGHTNESS_RANGE, 0.0),
            contrast: clamp_or(self.contrast, CONTRAST_RANGE, 1.0),
            saturation: clamp_or(self.saturation, SATURATION_RANGE, 1.0),
        }
    }
}

/// NaN falls back to the identity value.
fn clamp_or(value: f32, (min, max): (f32, f32), identity: f32) -> f32 {
    if value.is_nan() {
        identity
    } else {
        value.clamp(min, max)
    }
}
