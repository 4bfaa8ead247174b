//! Writing numbered panels to their destination.

use std::path::{Path, PathBuf};

use super::sequence::ExportBatch;
use super::ExportError;
use crate::decode::DecodedImage;
use crate::encode::encode_image;

/// Destination for exported panels.
///
/// Each call is independent: a failed write must not affect panels already
/// written.
pub trait PanelWriter {
    fn write_panel(&mut self, filename: &str, image: &DecodedImage) -> Result<(), ExportError>;
}

/// Encodes panels as JPEG into a directory.
#[derive(Debug, Clone)]
pub struct FsPanelWriter {
    directory: PathBuf,
    quality: u8,
}

impl FsPanelWriter {
    pub fn new(directory: impl Into<PathBuf>, quality: u8) -> Self {
        Self {
            directory: directory.into(),
            quality,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl PanelWriter for FsPanelWriter {
    fn write_panel(&mut self, filename: &str, image: &DecodedImage) -> Result<(), ExportError> {
        let bytes = encode_image(image, self.quality).map_err(|source| ExportError::Encode {
            filename: filename.to_string(),
            source,
        })?;

        let path = self.directory.join(filename);
        std::fs::write(&path, bytes).map_err(|source| ExportError::Write {
            filename: filename.to_string(),
            source,
        })?;

        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// A file that could not be written.
#[derive(Debug)]
pub struct FailedWrite {
    pub filename: String,
    pub error: ExportError,
}

/// Outcome of writing a batch.
#[derive(Debug, Default)]
pub struct WriteOutcome {
    pub written: Vec<String>,
    pub failed: Vec<FailedWrite>,
}

/// Write every item of `batch`, carrying on past failures.
pub fn write_batch(batch: &ExportBatch, writer: &mut dyn PanelWriter) -> WriteOutcome {
    let mut outcome = WriteOutcome::default();
    for item in &batch.items {
        match writer.write_panel(&item.filename, &item.image) {
            Ok(()) => outcome.written.push(item.filename.clone()),
            Err(error) => {
                log::warn!("Failed to write {}: {}", item.filename, error);
                outcome.failed.push(FailedWrite {
                    filename: item.filename.clone(),
                    error,
                });
            }
        }
    }
    outcome
}
