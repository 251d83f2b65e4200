//! Process-wide snapshot handle.
//!
//! The snapshot is downloaded, inflated and opened at most once. Callers
//! racing on [`SnapshotLoader::acquire`] all attach to the same in-flight
//! load and receive the same [`SnapshotDb`]. A failed load leaves the
//! loader unloaded so a later call starts over.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::export::progress::{
    PhaseProgress, ProgressReporter, DECOMPRESS_MARK, DOWNLOAD_RANGE, LOAD_MARK,
};
use crate::snapshot::decompress::decompress;
use crate::snapshot::fetch::fetch_snapshot;
use crate::snapshot::store::SnapshotDb;

/// Lazily loads and caches the snapshot.
#[derive(Debug)]
pub struct SnapshotLoader {
    client: HttpClient,
    url: String,
    cell: OnceCell<Arc<SnapshotDb>>,
    loads: AtomicUsize,
}

impl SnapshotLoader {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            cell: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Return the loaded snapshot, loading it on first use.
    pub async fn acquire(&self, progress: &dyn ProgressReporter) -> Result<Arc<SnapshotDb>> {
        self.cell
            .get_or_try_init(|| self.load(progress))
            .await
            .cloned()
    }

    /// The snapshot if it has already been loaded.
    pub fn get(&self) -> Option<Arc<SnapshotDb>> {
        self.cell.get().cloned()
    }

    /// Number of load attempts started so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    async fn load(&self, progress: &dyn ProgressReporter) -> Result<Arc<SnapshotDb>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tracing::info!("Loading snapshot from {}", self.url);

        progress.report(DOWNLOAD_RANGE.0, "Downloading database...");
        let download = PhaseProgress::new(progress, DOWNLOAD_RANGE);
        let compressed = fetch_snapshot(&self.client, &self.url, &download).await?;

        progress.report(DECOMPRESS_MARK, "Decompressing database...");
        let image = tokio::task::spawn_blocking(move || decompress(&compressed))
            .await
            .map_err(|e| Error::Decompress(e.to_string()))??;

        progress.report(LOAD_MARK, "Loading database into memory...");
        let db = tokio::task::spawn_blocking(move || SnapshotDb::open(&image))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;

        tracing::info!("Snapshot loaded");
        Ok(Arc::new(db))
    }
}
