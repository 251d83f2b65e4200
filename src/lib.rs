//! xLog Export - archive the notes of an xLog character
//!
//! This library exports every note of a character from the published xLog
//! snapshot database (a gzip-compressed SQLite file, optionally split into
//! numbered parts) into a single zip archive.
//!
//! # Features
//!
//! - Single or multi-part snapshot download with progress reporting
//! - One snapshot load per process, shared by concurrent callers
//! - JSON export of every note record
//! - Optional Markdown rendering with YAML front matter
//! - Attachment download over HTTP(S) and IPFS gateways with a failure manifest
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use xlog_export::{Config, ExportOptions, Exporter, NoProgress};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let exporter = Exporter::from_config(&config)?;
//!
//!     let options = ExportOptions::from(&config.export);
//!     let summary = exporter.export_character("52055", &options, &NoProgress).await?;
//!     println!("Saved {}", summary.archive_path.display());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod export;
pub mod fs;
pub mod media;
pub mod note;
pub mod output;
pub mod snapshot;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use export::{
    ExportOptions, ExportStatus, ExportSummary, Exporter, NoProgress, ProgressReporter,
};
pub use note::{NoteRecord, TransformedNote};
pub use snapshot::{SnapshotDb, SnapshotLoader};
