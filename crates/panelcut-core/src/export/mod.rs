//! Panel export: plan validation, sequence numbering and writing.
//!
//! 1. [`ExportPlan::validate`] checks the operator's settings
//! 2. [`resolve_start_number`] picks the first number (overwrite or continue)
//! 3. [`plan_batch`] assigns contiguous numbers and `<base><NNN>.jpg` names
//! 4. [`write_batch`] hands each file to a [`PanelWriter`], continuing past
//!    failures

mod plan;
mod report;
mod sequence;
mod writer;

use std::path::PathBuf;

use thiserror::Error;

use crate::encode::EncodeError;

pub use plan::{ExportPlan, NumberingMode, PlanError, DEFAULT_BASE_NAME};
pub use report::{ExportReport, SkippedPanel};
pub use sequence::{
    format_filename, list_file_names, next_number_from_names, parse_sequence_number, plan_batch,
    resolve_start_number, sequence_filenames, ExportBatch, ExportItem, NumberRange,
    PANEL_EXTENSION,
};
pub use writer::{write_batch, FailedWrite, FsPanelWriter, PanelWriter, WriteOutcome};

/// Errors raised while exporting panels.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid export settings: {0}")]
    Plan(#[from] PlanError),

    #[error("Failed to read export directory {}: {source}", .directory.display())]
    Scan {
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {filename}: {source}")]
    Encode {
        filename: String,
        #[source]
        source: EncodeError,
    },

    #[error("Failed to write {filename}: {source}")]
    Write {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}
