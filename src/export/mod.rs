//! Export module.
//!
//! Provides:
//! - The orchestrator sequencing snapshot load, note listing, Markdown
//!   rendering, attachment fetching and archive assembly
//! - The progress reporting port and its phase ranges
//! - Export status and summary counters

pub mod orchestrator;
pub mod progress;
pub mod state;

pub use orchestrator::{ExportOptions, Exporter};
pub use progress::{NoProgress, PhaseProgress, ProgressReporter};
pub use state::{ExportStatus, ExportSummary};
