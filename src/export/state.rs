//! Export state tracking.

use std::path::PathBuf;

/// Lifecycle of the exporter.
///
/// `Idle -> Loading -> {Success | Error}`; a finished export may start
/// `Loading` again. `Error` is only entered from `Loading`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExportStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl ExportStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ExportStatus::Loading)
    }

    pub fn begin(&mut self) {
        *self = ExportStatus::Loading;
    }

    pub fn succeed(&mut self) {
        if self.is_loading() {
            *self = ExportStatus::Success;
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        if self.is_loading() {
            *self = ExportStatus::Error(message.into());
        }
    }
}

/// Counters of a finished export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub character_id: i64,
    pub archive_path: PathBuf,
    pub archive_bytes: usize,
    pub notes: usize,
    pub markdown_notes: usize,
    pub attachments_saved: usize,
    pub attachments_failed: usize,
}

impl ExportSummary {
    pub fn new(character_id: i64) -> Self {
        Self {
            character_id,
            ..Default::default()
        }
    }

    /// Total media links seen across Markdown notes.
    pub fn attachments_total(&self) -> usize {
        self.attachments_saved + self.attachments_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        let mut status = ExportStatus::default();
        assert_eq!(status, ExportStatus::Idle);

        status.fail("ignored");
        assert_eq!(status, ExportStatus::Idle);

        status.begin();
        assert!(status.is_loading());
        status.fail("boom");
        assert_eq!(status, ExportStatus::Error("boom".into()));

        status.begin();
        status.succeed();
        assert_eq!(status, ExportStatus::Success);
    }

    #[test]
    fn test_summary_totals() {
        let summary = ExportSummary {
            attachments_saved: 3,
            attachments_failed: 2,
            ..ExportSummary::new(1)
        };
        assert_eq!(summary.attachments_total(), 5);
    }
}
