//! Export settings and their validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::EXPORT_JPEG_QUALITY;
use crate::resolution::ResolutionMode;

/// Base name offered when the operator has not chosen one.
pub const DEFAULT_BASE_NAME: &str = "panel_";

/// Errors found while validating an [`ExportPlan`].
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Base name must not be empty")]
    EmptyBaseName,

    #[error("Export directory does not exist: {}", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("Export path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Export directory is read-only: {}", .0.display())]
    ReadOnly(PathBuf),

    #[error("Start number must be at least 1")]
    ZeroStartNumber,
}

/// How sequence numbers are chosen for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingMode {
    /// Number from the plan's start number, replacing files with the same name.
    #[default]
    Overwrite,
    /// Number after the highest matching file already in the directory.
    Continue,
}

/// Everything needed to name and write one batch of panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPlan {
    pub base_name: String,
    pub directory: PathBuf,
    pub numbering_mode: NumberingMode,
    /// First number in overwrite mode, and the fallback in continue mode.
    pub start_number: u32,
    pub resolution_mode: ResolutionMode,
    /// JPEG quality, clamped to 1-100 when encoding.
    pub jpeg_quality: u8,
}

impl Default for ExportPlan {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_string(),
            directory: PathBuf::from("."),
            numbering_mode: NumberingMode::Overwrite,
            start_number: 1,
            resolution_mode: ResolutionMode::default(),
            jpeg_quality: EXPORT_JPEG_QUALITY,
        }
    }
}

impl ExportPlan {
    /// A default plan writing into `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Check the fields that do not touch the filesystem.
    pub fn validate_fields(&self) -> Result<(), PlanError> {
        if self.base_name.trim().is_empty() {
            return Err(PlanError::EmptyBaseName);
        }
        if self.start_number == 0 {
            return Err(PlanError::ZeroStartNumber);
        }
        Ok(())
    }

    /// Check the plan, including that the directory exists and is writable.
    pub fn validate(&self) -> Result<(), PlanError> {
        self.validate_fields()?;
        check_directory(&self.directory)
    }
}

fn check_directory(directory: &Path) -> Result<(), PlanError> {
    let metadata = std::fs::metadata(directory)
        .map_err(|_| PlanError::DirectoryMissing(directory.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(PlanError::NotADirectory(directory.to_path_buf()));
    }
    // Permission bits do not tell whether this process may create files
    tempfile::Builder::new()
        .prefix(".panelcut-")
        .tempfile_in(directory)
        .map_err(|_| PlanError::ReadOnly(directory.to_path_buf()))?;
    Ok(())
}
