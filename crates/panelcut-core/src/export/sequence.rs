//! Sequence numbering and filenames for exported panels.
//!
//! Files are named `<base><NNN>.jpg` with at least three digits. In continue
//! mode the directory is scanned for files of that shape and numbering
//! resumes after the highest one.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::plan::{ExportPlan, NumberingMode};
use crate::decode::DecodedImage;
use crate::transform::RectifiedPanel;

/// Extension of every exported panel.
pub const PANEL_EXTENSION: &str = ".jpg";

/// Inclusive range of numbers assigned to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRange {
    pub first: u32,
    pub last: u32,
}

impl NumberRange {
    /// Range covering `count` numbers from `first`, or `None` for an empty batch.
    pub fn new(first: u32, count: usize) -> Option<Self> {
        let count = u32::try_from(count).ok()?.checked_sub(1)?;
        Some(Self {
            first,
            last: first.saturating_add(count),
        })
    }
}

/// A panel with its assigned number and filename.
#[derive(Debug, Clone)]
pub struct ExportItem {
    pub source_panel_id: usize,
    pub number: u32,
    pub filename: String,
    pub image: DecodedImage,
}

/// Panels ready to be written, numbered contiguously in panel order.
#[derive(Debug, Clone, Default)]
pub struct ExportBatch {
    pub items: Vec<ExportItem>,
}

impl ExportBatch {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn range(&self) -> Option<NumberRange> {
        let first = self.items.first()?.number;
        NumberRange::new(first, self.items.len())
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.filename.as_str())
    }
}

/// `<base><number>.jpg`, zero padded to three digits.
pub fn format_filename(base_name: &str, number: u32) -> String {
    format!("{base_name}{number:03}{PANEL_EXTENSION}")
}

/// The sequence number encoded in `filename`, if it has the export shape.
///
/// Surrounding whitespace in the number is tolerated; signs and other
/// characters are not.
pub fn parse_sequence_number(base_name: &str, filename: &str) -> Option<u32> {
    let digits = filename
        .strip_prefix(base_name)?
        .strip_suffix(PANEL_EXTENSION)?
        .trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// One past the highest sequence number among `names`, if any match.
pub fn next_number_from_names<I, S>(base_name: &str, names: I) -> Option<u32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| parse_sequence_number(base_name, name.as_ref()))
        .max()
        .map(|max| max.saturating_add(1))
}

/// First number for a batch, given the names already in the target directory.
///
/// Overwrite mode ignores `existing` and uses the plan's start number.
pub fn resolve_start_number<I, S>(plan: &ExportPlan, existing: I) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match plan.numbering_mode {
        NumberingMode::Overwrite => plan.start_number,
        NumberingMode::Continue => {
            next_number_from_names(&plan.base_name, existing).unwrap_or(plan.start_number)
        }
    }
}

/// File names directly inside `directory`. Non-UTF-8 names are skipped.
pub fn list_file_names(directory: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(names)
}

/// Filenames for `count` panels numbered from `start`.
pub fn sequence_filenames(base_name: &str, start: u32, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format_filename(base_name, start.saturating_add(i as u32)))
        .collect()
}

/// Number and name `panels` in order from `start`.
pub fn plan_batch(base_name: &str, start: u32, panels: Vec<RectifiedPanel>) -> ExportBatch {
    let items = panels
        .into_iter()
        .enumerate()
        .map(|(i, panel)| {
            let number = start.saturating_add(i as u32);
            ExportItem {
                source_panel_id: panel.source_panel_id,
                number,
                filename: format_filename(base_name, number),
                image: panel.image,
            }
        })
        .collect();

    let batch = ExportBatch { items };
    if let Some(range) = batch.range() {
        log::debug!(
            "Numbered {} panels {:03}-{:03}",
            batch.len(),
            range.first,
            range.last
        );
    }
    batch
}
