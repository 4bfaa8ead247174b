//! Extraction session tying the stages together.
//!
//! An [`Extractor`] owns the loaded sheet, the current adjustments and the
//! adjusted copy panels are cut from, the panel selection session and the
//! preview resolution mode.
//!
//! ```text
//! load -> adjust -> begin selection -> click x4 per panel -> finish
//!      -> rectify + rescale -> number -> write -> ExportReport
//! ```

use crate::adjustments::adjust_image;
use crate::decode::{load_sheet, DecodeError, DecodedImage, LoadOptions};
use crate::export::{
    list_file_names, plan_batch, resolve_start_number, write_batch, ExportError, ExportPlan,
    ExportReport, FsPanelWriter, NumberingMode, PanelWriter, SkippedPanel,
};
use crate::geometry::{DisplaySurface, Point};
use crate::resolution::{normalize_resolution, ResolutionMode};
use crate::selection::{Panel, PanelSession, PointOutcome, SelectionError};
use crate::transform::{rectify_panel, RectifiedPanel, RectifyError};
use crate::ImageAdjustments;

/// Panels produced by [`rectify_panels`].
#[derive(Debug, Default)]
pub struct RectifyOutcome {
    /// Rectified and rescaled panels, in panel order.
    pub panels: Vec<RectifiedPanel>,
    /// Panels that could not be rectified.
    pub skipped: Vec<SkippedPanel>,
}

/// State of one extraction session.
#[derive(Debug, Default)]
pub struct Extractor {
    load_options: LoadOptions,
    original: Option<DecodedImage>,
    adjustments: ImageAdjustments,
    adjusted: Option<DecodedImage>,
    session: PanelSession,
    resolution_mode: ResolutionMode,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_load_options(load_options: LoadOptions) -> Self {
        Self {
            load_options,
            ..Self::default()
        }
    }

    /// Decode and upscale a sheet, replacing any previous one.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let sheet = load_sheet(bytes, &self.load_options)?;
        self.set_image(sheet);
        Ok(())
    }

    /// Use an already decoded sheet as is. Panels and adjustments are reset.
    pub fn set_image(&mut self, image: DecodedImage) {
        log::info!("Loaded sheet {}x{}", image.width, image.height);
        self.adjusted = Some(image.clone());
        self.original = Some(image);
        self.adjustments = ImageAdjustments::default();
        self.session = PanelSession::new();
    }

    /// The unadjusted sheet.
    pub fn original(&self) -> Option<&DecodedImage> {
        self.original.as_ref()
    }

    /// The sheet panels are cut from.
    pub fn image(&self) -> Option<&DecodedImage> {
        self.adjusted.as_ref()
    }

    pub fn adjustments(&self) -> ImageAdjustments {
        self.adjustments
    }

    /// Replace the current adjustments and recompute the adjusted sheet.
    pub fn adjust(&mut self, adjustments: ImageAdjustments) {
        self.adjustments = adjustments.clamped();
        if let Some(original) = &self.original {
            self.adjusted = Some(adjust_image(original, &self.adjustments));
        }
    }

    pub fn resolution_mode(&self) -> ResolutionMode {
        self.resolution_mode
    }

    pub fn set_resolution_mode(&mut self, mode: ResolutionMode) {
        self.resolution_mode = mode;
    }

    pub fn session(&self) -> &PanelSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PanelSession {
        &mut self.session
    }

    pub fn begin_selection(&mut self) {
        self.session.begin();
    }

    pub fn finish_selection(&mut self) -> Result<Option<usize>, SelectionError> {
        self.session.finish()
    }

    /// Feed a pointer click on `surface` to the selection session.
    pub fn click(&mut self, pointer: Point, surface: DisplaySurface) -> PointOutcome {
        let Some(image) = &self.adjusted else {
            return PointOutcome::Ignored;
        };
        let point = surface.to_image(pointer, image.width, image.height);
        self.session.add_point(point)
    }

    /// Rectify every panel at the session's resolution mode.
    pub fn rectify_all(&self) -> RectifyOutcome {
        self.rectify_all_with(self.resolution_mode)
    }

    /// Rectify every panel and rescale it to `mode`, skipping failures.
    pub fn rectify_all_with(&self, mode: ResolutionMode) -> RectifyOutcome {
        match &self.adjusted {
            Some(image) => rectify_panels(image, self.session.panels(), mode),
            None => RectifyOutcome::default(),
        }
    }

    /// Validate `plan`, then rectify, number and write every panel as JPEG
    /// into the plan's directory.
    pub fn export(&self, plan: &ExportPlan) -> Result<ExportReport, ExportError> {
        plan.validate()?;

        let existing = match plan.numbering_mode {
            NumberingMode::Overwrite => Vec::new(),
            NumberingMode::Continue => {
                list_file_names(&plan.directory).map_err(|source| ExportError::Scan {
                    directory: plan.directory.clone(),
                    source,
                })?
            }
        };

        let mut writer = FsPanelWriter::new(&plan.directory, plan.jpeg_quality);
        self.export_to(plan, &existing, &mut writer)
    }

    /// Rectify, number and hand every panel to `writer`.
    ///
    /// `existing` lists the names already at the destination, consulted in
    /// continue mode. The directory itself is not checked.
    pub fn export_to(
        &self,
        plan: &ExportPlan,
        existing: &[String],
        writer: &mut dyn PanelWriter,
    ) -> Result<ExportReport, ExportError> {
        plan.validate_fields()?;

        let RectifyOutcome { panels, skipped } = self.rectify_all_with(plan.resolution_mode);
        let start = resolve_start_number(plan, existing);
        let batch = plan_batch(&plan.base_name, start, panels);
        let outcome = write_batch(&batch, writer);

        let report = ExportReport {
            directory: plan.directory.clone(),
            resolution_mode: plan.resolution_mode,
            range: batch.range(),
            written: outcome.written,
            failed: outcome.failed,
            skipped,
        };
        log::info!("{}", report.summary());
        Ok(report)
    }
}

/// Rectify and rescale `panels` cut from `image`, in panel order.
///
/// Panels that cannot be rectified are logged and reported as skipped.
pub fn rectify_panels(
    image: &DecodedImage,
    panels: &[Panel],
    mode: ResolutionMode,
) -> RectifyOutcome {
    let mut outcome = RectifyOutcome::default();
    for panel in panels {
        let result = rectify_panel(image, panel).and_then(|rectified| {
            let scaled = normalize_resolution(&rectified.image, mode).map_err(|source| {
                RectifyError::Resize {
                    panel: panel.number(),
                    source,
                }
            })?;
            Ok(RectifiedPanel {
                image: scaled,
                ..rectified
            })
        });

        match result {
            Ok(rectified) => outcome.panels.push(rectified),
            Err(err) => {
                log::warn!("Skipping panel: {err}");
                outcome.skipped.push(SkippedPanel {
                    panel: err.panel(),
                    reason: skip_reason(&err),
                });
            }
        }
    }
    outcome
}

fn skip_reason(err: &RectifyError) -> String {
    match err {
        RectifyError::DegenerateGeometry { reason, .. } => {
            format!("degenerate panel geometry ({reason})")
        }
        RectifyError::InvalidImage { source, .. } => format!("invalid sheet: {source}"),
        RectifyError::Resize { source, .. } => format!("resize failed: {source}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::NumberRange;

    /// 400x300 sheet whose pixel value depends on the row.
    fn sheet() -> DecodedImage {
        let (w, h) = (400u32, 300u32);
        let mut pixels = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for _ in 0..w {
                let v = (y % 200) as u8 + 20;
                pixels.extend_from_slice(&[v, v / 2, 255 - v]);
            }
        }
        DecodedImage::new(w, h, pixels)
    }

    fn surface() -> DisplaySurface {
        DisplaySurface::new(400, 300)
    }

    fn click_rect(ex: &mut Extractor, x0: f64, y0: f64, x1: f64, y1: f64) -> PointOutcome {
        ex.click(Point::new(x0, y0), surface());
        ex.click(Point::new(x1, y0), surface());
        ex.click(Point::new(x1, y1), surface());
        ex.click(Point::new(x0, y1), surface())
    }

    fn extractor_with_panels() -> Extractor {
        let mut ex = Extractor::new();
        ex.set_image(sheet());
        ex.begin_selection();
        assert_eq!(click_rect(&mut ex, 10.0, 10.0, 110.0, 109.0), PointOutcome::Committed(0));
        assert_eq!(click_rect(&mut ex, 150.0, 20.0, 350.0, 219.0), PointOutcome::Committed(1));
        ex.finish_selection().unwrap();
        ex
    }

    struct RecordingWriter(Vec<(String, u32, u32)>);

    impl PanelWriter for RecordingWriter {
        fn write_panel(&mut self, filename: &str, image: &DecodedImage) -> Result<(), ExportError> {
            self.0.push((filename.to_string(), image.width, image.height));
            Ok(())
        }
    }

    #[test]
    fn test_clicks_without_image_are_ignored() {
        let mut ex = Extractor::new();
        ex.begin_selection();
        assert_eq!(ex.click(Point::new(1.0, 1.0), surface()), PointOutcome::Ignored);
    }

    #[test]
    fn test_set_image_resets_session_and_adjustments() {
        let mut ex = extractor_with_panels();
        ex.adjust(ImageAdjustments {
            brightness: 10.0,
            ..Default::default()
        });

        ex.set_image(sheet());
        assert_eq!(ex.session().panel_count(), 0);
        assert!(ex.adjustments().is_identity());
        assert_eq!(ex.image(), ex.original());
    }

    #[test]
    fn test_adjust_replaces_previous_adjustment() {
        let mut ex = Extractor::new();
        ex.set_image(DecodedImage::new(1, 1, vec![100, 100, 100]));

        let brighter = ImageAdjustments {
            brightness: 20.0,
            ..Default::default()
        };
        ex.adjust(brighter);
        ex.adjust(brighter);
        assert_eq!(ex.image().unwrap().pixels, vec![120, 120, 120]);
        assert_eq!(ex.original().unwrap().pixels, vec![100, 100, 100]);
    }

    #[test]
    fn test_rectify_all_native_sizes() {
        let mut ex = extractor_with_panels();
        ex.set_resolution_mode(ResolutionMode::Native);
        let outcome = ex.rectify_all();

        assert!(outcome.skipped.is_empty());
        let sizes: Vec<(u32, u32)> = outcome
            .panels
            .iter()
            .map(|p| (p.width(), p.height()))
            .collect();
        assert_eq!(sizes, vec![(100, 100), (200, 200)]);
    }

    #[test]
    fn test_rectify_all_fixed_height() {
        let ex = extractor_with_panels();
        let outcome = ex.rectify_all();
        for panel in &outcome.panels {
            assert_eq!(panel.height(), 1080);
        }
        assert_eq!(outcome.panels[0].width(), 1080);
    }

    #[test]
    fn test_degenerate_panel_is_skipped() {
        let mut ex = extractor_with_panels();
        ex.begin_selection();
        click_rect(&mut ex, 10.0, 10.0, 110.0, 109.0);
        ex.click(Point::new(200.0, 50.0), surface());
        ex.click(Point::new(250.0, 50.0), surface());
        ex.click(Point::new(250.0, 90.0), surface());
        ex.finish_selection().unwrap();
        assert_eq!(ex.session().panel_count(), 2);

        let outcome = ex.rectify_all_with(ResolutionMode::Native);
        assert_eq!(outcome.panels.len(), 1);
        assert_eq!(
            outcome.skipped,
            vec![SkippedPanel {
                panel: 2,
                reason: "degenerate panel geometry (two corners coincide)".to_string(),
            }]
        );
    }

    #[test]
    fn test_mismatched_sheet_buffer_skips_panels() {
        let ex = extractor_with_panels();
        let mut broken = sheet();
        broken.pixels.truncate(99);

        let outcome = rectify_panels(&broken, ex.session().panels(), ResolutionMode::Native);
        assert!(outcome.panels.is_empty());
        assert_eq!(outcome.skipped.len(), 2);
        assert_eq!(outcome.skipped[0].panel, 1);
        assert!(outcome.skipped[0].reason.starts_with("invalid sheet:"));
    }

    #[test]
    fn test_export_to_writer() {
        let ex = extractor_with_panels();
        let plan = ExportPlan {
            numbering_mode: NumberingMode::Continue,
            resolution_mode: ResolutionMode::FixedWidth1920,
            ..ExportPlan::default()
        };
        let existing: Vec<String> = vec!["panel_004.jpg".into(), "panel_002.jpg".into()];
        let mut writer = RecordingWriter(Vec::new());

        let report = ex.export_to(&plan, &existing, &mut writer).unwrap();
        assert_eq!(
            writer.0,
            vec![
                ("panel_005.jpg".to_string(), 1920, 1920),
                ("panel_006.jpg".to_string(), 1920, 1920),
            ]
        );
        assert_eq!(report.range, Some(NumberRange { first: 5, last: 6 }));
        assert!(report.is_complete());
    }

    #[test]
    fn test_export_to_rejects_invalid_plan() {
        let ex = extractor_with_panels();
        let plan = ExportPlan {
            base_name: String::new(),
            ..ExportPlan::default()
        };
        let mut writer = RecordingWriter(Vec::new());
        assert!(matches!(
            ex.export_to(&plan, &[], &mut writer),
            Err(ExportError::Plan(_))
        ));
        assert!(writer.0.is_empty());
    }

    #[test]
    fn test_export_continues_numbering_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let ex = extractor_with_panels();
        let plan = ExportPlan {
            numbering_mode: NumberingMode::Continue,
            resolution_mode: ResolutionMode::Native,
            ..ExportPlan::new(dir.path())
        };

        let first = ex.export(&plan).unwrap();
        assert_eq!(first.written, vec!["panel_001.jpg", "panel_002.jpg"]);

        let second = ex.export(&plan).unwrap();
        assert_eq!(second.written, vec!["panel_003.jpg", "panel_004.jpg"]);
        assert_eq!(
            second.summary(),
            format!(
                "Exported 2 panels to {} with auto resolution (panels 003-004)",
                dir.path().display()
            )
        );

        let written = crate::decode::decode_image(
            &std::fs::read(dir.path().join("panel_004.jpg")).unwrap(),
        )
        .unwrap();
        assert_eq!((written.width, written.height), (200, 200));
    }

    #[test]
    fn test_export_overwrite_replaces_files() {
        let dir = tempfile::tempdir().unwrap();
        let ex = extractor_with_panels();
        let plan = ExportPlan {
            resolution_mode: ResolutionMode::Native,
            start_number: 7,
            ..ExportPlan::new(dir.path())
        };

        ex.export(&plan).unwrap();
        let report = ex.export(&plan).unwrap();
        assert_eq!(report.written, vec!["panel_007.jpg", "panel_008.jpg"]);
        assert_eq!(list_file_names(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_export_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ex = extractor_with_panels();
        let plan = ExportPlan::new(dir.path().join("missing"));
        assert!(matches!(ex.export(&plan), Err(ExportError::Plan(_))));
    }

    #[test]
    fn test_load_from_bytes() {
        let mut bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image::RgbImage::new(50, 20))
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();

        let mut ex = Extractor::with_load_options(LoadOptions { upscale_width: 500 });
        ex.load(bytes.get_ref()).unwrap();
        let image = ex.image().unwrap();
        assert_eq!((image.width, image.height), (500, 200));

        assert!(ex.load(b"not an image").is_err());
        // A failed load keeps the previous sheet
        assert_eq!(ex.original().unwrap().width, 500);
    }
}
