//! Summary of one export run.

use std::fmt::Write as _;
use std::path::PathBuf;

use super::sequence::NumberRange;
use super::writer::FailedWrite;
use crate::resolution::ResolutionMode;

/// A panel left out of the batch, with the reason shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPanel {
    /// One-based panel number.
    pub panel: usize,
    pub reason: String,
}

/// What an export run did.
#[derive(Debug)]
pub struct ExportReport {
    pub directory: PathBuf,
    pub resolution_mode: ResolutionMode,
    /// Numbers assigned to the batch, `None` when nothing was numbered.
    pub range: Option<NumberRange>,
    /// Files written, in panel order.
    pub written: Vec<String>,
    pub failed: Vec<FailedWrite>,
    pub skipped: Vec<SkippedPanel>,
}

impl ExportReport {
    pub fn first_number(&self) -> Option<u32> {
        self.range.map(|r| r.first)
    }

    pub fn last_number(&self) -> Option<u32> {
        self.range.map(|r| r.last)
    }

    /// True when every marked panel was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    /// Human-readable status, one line per problem after the headline.
    ///
    /// `Exported 3 panels to /out with 1080 tall resolution (panels 008-010)`
    pub fn summary(&self) -> String {
        let mut out = match self.range {
            Some(range) => format!(
                "Exported {} panels to {} with {} resolution (panels {:03}-{:03})",
                self.written.len(),
                self.directory.display(),
                self.resolution_mode,
                range.first,
                range.last
            ),
            None => format!("No panels exported to {}", self.directory.display()),
        };

        for skipped in &self.skipped {
            let _ = write!(out, "\nSkipped panel {}: {}", skipped.panel, skipped.reason);
        }
        for failed in &self.failed {
            let _ = write!(out, "\n{}", failed.error);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportError;

    fn report() -> ExportReport {
        ExportReport {
            directory: PathBuf::from("/out"),
            resolution_mode: ResolutionMode::FixedHeight1080,
            range: Some(NumberRange { first: 8, last: 10 }),
            written: vec![
                "panel_008.jpg".to_string(),
                "panel_009.jpg".to_string(),
                "panel_010.jpg".to_string(),
            ],
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_summary_headline() {
        let report = report();
        assert_eq!(
            report.summary(),
            "Exported 3 panels to /out with 1080 tall resolution (panels 008-010)"
        );
        assert!(report.is_complete());
        assert_eq!(report.first_number(), Some(8));
        assert_eq!(report.last_number(), Some(10));
    }

    #[test]
    fn test_summary_lists_problems() {
        let mut report = report();
        report.written.pop();
        report.failed.push(FailedWrite {
            filename: "panel_010.jpg".to_string(),
            error: ExportError::Write {
                filename: "panel_010.jpg".to_string(),
                source: std::io::Error::other("disk full"),
            },
        });
        report.skipped.push(SkippedPanel {
            panel: 2,
            reason: "degenerate panel geometry (two corners coincide)".to_string(),
        });

        let summary = report.summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Exported 2 panels"));
        assert_eq!(
            lines[1],
            "Skipped panel 2: degenerate panel geometry (two corners coincide)"
        );
        assert_eq!(lines[2], "Failed to write panel_010.jpg: disk full");
        assert!(!report.is_complete());
    }

    #[test]
    fn test_summary_without_panels() {
        let report = ExportReport {
            range: None,
            written: Vec::new(),
            ..report()
        };
        assert_eq!(report.summary(), "No panels exported to /out");
    }
}
