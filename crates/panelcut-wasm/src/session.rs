//! Panel selection WASM bindings.
//!
//! The browser forwards canvas clicks in display coordinates; they are mapped
//! onto the sheet before being recorded.
//!
//! ```typescript
//! const session = new JsPanelSession();
//! session.begin();
//! canvas.onclick = (e) => {
//!   const committed = session.add_click(e.offsetX, e.offsetY,
//!     canvas.width, canvas.height, sheet.width, sheet.height);
//!   if (committed !== undefined) redrawPanel(session.panel_corners(committed));
//! };
//! ```

use crate::types::to_js_error;
use panelcut_core::{DisplaySurface, PanelSession, Point, PointOutcome};
use wasm_bindgen::prelude::*;

/// Panel selection session for JavaScript
#[wasm_bindgen]
#[derive(Default)]
pub struct JsPanelSession {
    inner: PanelSession,
}

#[wasm_bindgen]
impl JsPanelSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh selection pass, dropping existing panels.
    pub fn begin(&mut self) {
        self.inner.begin();
    }

    #[wasm_bindgen(getter)]
    pub fn is_collecting(&self) -> bool {
        self.inner.is_collecting()
    }

    /// Record a click made on a canvas showing the sheet letterboxed.
    ///
    /// Returns the id of the panel this click completed, if any.
    pub fn add_click(
        &mut self,
        x: f64,
        y: f64,
        surface_width: u32,
        surface_height: u32,
        image_width: u32,
        image_height: u32,
    ) -> Option<u32> {
        let surface = DisplaySurface::new(surface_width, surface_height);
        self.record(surface.to_image(Point::new(x, y), image_width, image_height))
    }

    /// Record a point already in sheet pixel coordinates. Points off the
    /// `image_width x image_height` sheet are clamped onto its edge.
    pub fn add_point(
        &mut self,
        x: f64,
        y: f64,
        image_width: u32,
        image_height: u32,
    ) -> Option<u32> {
        self.record(Point::new(x, y).clamped_to(image_width, image_height))
    }

    /// Commit the pending points early. Needs at least three.
    pub fn force_complete(&mut self) -> Result<u32, JsValue> {
        self.inner
            .force_complete()
            .map(|id| id as u32)
            .map_err(to_js_error)
    }

    /// Discard pending points, keeping committed panels.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Remove the most recent panel. Returns false when there was none.
    pub fn delete_last(&mut self) -> bool {
        self.inner.delete_last().is_some()
    }

    pub fn clear_all(&mut self) {
        self.inner.clear_all();
    }

    /// End the selection pass.
    ///
    /// Returns the id of a panel committed from pending points. Too few
    /// pending points are dropped with a console warning.
    pub fn finish(&mut self) -> Option<u32> {
        self.inner.finish().ok().flatten().map(|id| id as u32)
    }

    #[wasm_bindgen(getter)]
    pub fn panel_count(&self) -> usize {
        self.inner.panel_count()
    }

    #[wasm_bindgen(getter)]
    pub fn pending_count(&self) -> usize {
        self.inner.pending_count()
    }

    /// Corners of panel `id` as `[x0, y0, ... x3, y3]`, starting top-left
    /// and going clockwise.
    pub fn panel_corners(&self, id: usize) -> Option<Vec<f64>> {
        let panel = self.inner.panels().get(id)?;
        Some(flatten(&panel.normalized_corners()))
    }

    /// Pending points as `[x0, y0, ...]` in click order.
    pub fn pending_points(&self) -> Vec<f64> {
        flatten(self.inner.pending())
    }

    /// Label of the corner expected next ("top-left", ...), or undefined
    /// while idle.
    pub fn next_corner_hint(&self) -> Option<String> {
        self.inner.next_corner_hint().map(|c| c.label().to_string())
    }

    /// Committed panels with their raw corners, for storage.
    pub fn panels_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.panels()).map_err(to_js_error)
    }
}

impl JsPanelSession {
    pub(crate) fn inner(&self) -> &PanelSession {
        &self.inner
    }

    fn record(&mut self, point: Point) -> Option<u32> {
        match self.inner.add_point(point) {
            PointOutcome::Committed(id) => Some(id as u32),
            PointOutcome::Ignored | PointOutcome::Pending(_) => None,
        }
    }
}

fn flatten(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}
