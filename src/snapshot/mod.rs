//! Snapshot module.
//!
//! This module provides:
//! - Download of the compressed snapshot (single file or numbered parts)
//! - Gzip inflation
//! - Typed read queries over the embedded SQLite store
//! - The memoized, load-once snapshot handle

pub mod decompress;
pub mod fetch;
pub mod loader;
pub mod store;

pub use decompress::decompress;
pub use fetch::{fetch_snapshot, is_split_snapshot, part_url, probe_parts, PartsInfo};
pub use loader::SnapshotLoader;
pub use store::SnapshotDb;
