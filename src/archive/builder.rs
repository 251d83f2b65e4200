//! In-memory zip archive assembly.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use serde::Serialize;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// Accumulates entries into a deflated zip held in memory.
///
/// Entry names are unique; adding the same path twice is an error rather
/// than a silent overwrite.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entries: HashSet<String>,
    options: FileOptions,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entries: HashSet::new(),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Add an empty directory entry. `path` must end with `/`.
    pub fn add_directory(&mut self, path: &str) -> Result<()> {
        self.claim(path)?;
        self.writer.add_directory(path, self.options)?;
        Ok(())
    }

    pub fn add_file(&mut self, path: &str, bytes: &[u8]) -> Result<()> {
        self.claim(path)?;
        self.writer.start_file(path, self.options)?;
        self.writer.write_all(bytes)?;
        Ok(())
    }

    /// Add `value` as pretty-printed JSON.
    pub fn add_json<T: Serialize>(&mut self, path: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.add_file(path, json.as_bytes())
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(path)
    }

    /// Finalize the central directory and return the archive bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }

    fn claim(&mut self, path: &str) -> Result<()> {
        if !self.entries.insert(path.to_string()) {
            return Err(Error::Archive(format!("duplicate entry {}", path)));
        }
        Ok(())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ArchiveBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveBuilder")
            .field("entries", &self.entries.len())
            .finish()
    }
}
