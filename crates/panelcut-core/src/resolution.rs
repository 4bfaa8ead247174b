//! Output resolution policy for exported panels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::{resize_to_height, resize_to_width, DecodeError, DecodedImage, FilterType};

/// Height of panels in [`ResolutionMode::FixedHeight1080`].
pub const FIXED_HEIGHT: u32 = 1080;

/// Width of panels in [`ResolutionMode::FixedWidth1920`].
pub const FIXED_WIDTH: u32 = 1920;

/// How rectified panels are rescaled before export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResolutionMode {
    /// Scale to exactly 1080 pixels tall.
    #[default]
    #[serde(rename = "1080 tall")]
    FixedHeight1080,
    /// Scale to exactly 1920 pixels wide.
    #[serde(rename = "1920 wide")]
    FixedWidth1920,
    /// Keep the rectified size.
    #[serde(rename = "auto")]
    Native,
}

impl ResolutionMode {
    pub const ALL: [ResolutionMode; 3] = [
        ResolutionMode::FixedHeight1080,
        ResolutionMode::FixedWidth1920,
        ResolutionMode::Native,
    ];

    /// Label shown to the operator and used in export summaries.
    pub fn label(self) -> &'static str {
        match self {
            ResolutionMode::FixedHeight1080 => "1080 tall",
            ResolutionMode::FixedWidth1920 => "1920 wide",
            ResolutionMode::Native => "auto",
        }
    }

    /// Output size for a `width x height` panel under this mode.
    pub fn target_size(self, width: u32, height: u32) -> Result<(u32, u32), DecodeError> {
        match self {
            ResolutionMode::FixedHeight1080 => {
                crate::decode::scale_to_height(width, height, FIXED_HEIGHT)
            }
            ResolutionMode::FixedWidth1920 => {
                crate::decode::scale_to_width(width, height, FIXED_WIDTH)
            }
            ResolutionMode::Native => Ok((width, height)),
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown resolution label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown resolution mode: {0:?}")]
pub struct UnknownResolutionMode(pub String);

impl FromStr for ResolutionMode {
    type Err = UnknownResolutionMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResolutionMode::ALL
            .into_iter()
            .find(|mode| mode.label() == s)
            .ok_or_else(|| UnknownResolutionMode(s.to_string()))
    }
}

/// Rescale a rectified panel according to `mode`.
///
/// Aspect ratio is preserved with bicubic interpolation; the scaled side is
/// never below one pixel. `Native` returns an unchanged copy.
pub fn normalize_resolution(
    image: &DecodedImage,
    mode: ResolutionMode,
) -> Result<DecodedImage, DecodeError> {
    match mode {
        ResolutionMode::FixedHeight1080 => {
            resize_to_height(image, FIXED_HEIGHT, FilterType::Bicubic)
        }
        ResolutionMode::FixedWidth1920 => resize_to_width(image, FIXED_WIDTH, FilterType::Bicubic),
        ResolutionMode::Native => Ok(image.clone()),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_fixed_height_preserves_aspect(w in 1u32..5000, h in 1u32..5000) {
            let (nw, nh) = ResolutionMode::FixedHeight1080.target_size(w, h).unwrap();
            prop_assert_eq!(nh, FIXED_HEIGHT);
            let exact = w as f64 * FIXED_HEIGHT as f64 / h as f64;
            prop_assert!((nw as f64 - exact).abs() <= 0.5 + 1e-9 || nw == 1);
        }

        #[test]
        fn prop_fixed_width_preserves_aspect(w in 1u32..5000, h in 1u32..5000) {
            let (nw, nh) = ResolutionMode::FixedWidth1920.target_size(w, h).unwrap();
            prop_assert_eq!(nw, FIXED_WIDTH);
            let exact = h as f64 * FIXED_WIDTH as f64 / w as f64;
            prop_assert!((nh as f64 - exact).abs() <= 0.5 + 1e-9 || nh == 1);
        }
    }
}
