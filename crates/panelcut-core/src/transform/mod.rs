//! Panel rectification: perspective warping of marked quads.
//!
//! # Coordinate System
//!
//! - Coordinates are in source-image pixels, origin at the top-left corner
//! - Pixel centres sit on integer coordinates
//! - Rectified panels are upright rectangles whose height is a multiple of
//!   [`HEIGHT_STEP`]

mod perspective;
mod rectify;

pub use perspective::{warp_perspective, InterpolationFilter};
pub use rectify::{
    measure_quad, preview_panel, rectify_panel, rectify_quad, DegenerateReason, RectifiedPanel,
    RectifyError, HEIGHT_STEP, MAX_PANEL_SIDE,
};
