//! Export orchestration for one character.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::archive::{
    write_character, write_markdown_note, write_markdown_root, write_note_records,
    ArchiveBuilder, CharacterManifest,
};
use crate::client::{HttpClient, MediaRouter, MediaSource};
use crate::config::{parse_character_id, Config, ExportConfig};
use crate::download::fetch_attachments;
use crate::error::{Error, Result};
use crate::export::progress::{
    PhaseProgress, ProgressReporter, DONE_MARK, FINALIZE_MARK, NOTES_LISTED_MARK, NOTES_RANGE,
    QUERY_MARK,
};
use crate::export::state::{ExportStatus, ExportSummary};
use crate::fs::save_archive;
use crate::note::{transform_note, NoteRecord};
use crate::snapshot::{SnapshotDb, SnapshotLoader};

/// Rows between debug log lines while listing notes.
const LISTING_LOG_INTERVAL: usize = 500;

/// Per-export switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Also render every note as Markdown with its attachments.
    pub markdown: bool,
    /// Do not fetch attachments; list them all as failed instead.
    pub skip_attachments: bool,
    /// Concurrent attachment requests per note.
    pub attachment_concurrency: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&ExportConfig::default())
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            markdown: config.markdown,
            skip_attachments: config.skip_attachments,
            attachment_concurrency: config.attachment_concurrency,
        }
    }
}

/// Drives exports against one shared snapshot.
pub struct Exporter {
    loader: SnapshotLoader,
    media: Arc<dyn MediaSource>,
    output_dir: PathBuf,
    status: Mutex<ExportStatus>,
}

impl Exporter {
    pub fn new(
        loader: SnapshotLoader,
        media: Arc<dyn MediaSource>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            loader,
            media,
            output_dir: output_dir.into(),
            status: Mutex::new(ExportStatus::Idle),
        }
    }

    /// Build an exporter with HTTP and IPFS transports from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = HttpClient::new(&config.http.user_agent)?;
        let loader = SnapshotLoader::new(client.clone(), config.snapshot_url());
        let media = MediaRouter::new(client, config.ipfs.gateways.clone());

        Ok(Self::new(loader, Arc::new(media), config.output_directory()))
    }

    pub fn loader(&self) -> &SnapshotLoader {
        &self.loader
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn status(&self) -> ExportStatus {
        self.status_lock().clone()
    }

    fn status_lock(&self) -> std::sync::MutexGuard<'_, ExportStatus> {
        self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Export every note of `character_id` into `character-<id>.zip`.
    ///
    /// The identifier is validated before anything is downloaded.
    pub async fn export_character(
        &self,
        character_id: &str,
        options: &ExportOptions,
        progress: &dyn ProgressReporter,
    ) -> Result<ExportSummary> {
        self.status_lock().begin();

        let result = self.run(character_id, options, progress).await;

        match &result {
            Ok(summary) => {
                tracing::info!(
                    "Exported {} notes of character {}",
                    summary.notes,
                    summary.character_id
                );
                self.status_lock().succeed();
            }
            Err(e) => {
                tracing::error!("Export of character {} failed: {}", character_id, e);
                self.status_lock().fail(e.to_string());
            }
        }

        result
    }

    /// Distinct character IDs present in the snapshot.
    pub async fn list_character_ids(&self, progress: &dyn ProgressReporter) -> Result<Vec<i64>> {
        let db = self.loader.acquire(progress).await?;
        blocking(move || db.list_character_ids()).await
    }

    async fn run(
        &self,
        input: &str,
        options: &ExportOptions,
        progress: &dyn ProgressReporter,
    ) -> Result<ExportSummary> {
        let character_id = parse_character_id(input)?;
        let db = self.loader.acquire(progress).await?;

        progress.report(QUERY_MARK, "Fetching character's notes...");
        let notes = blocking(move || query_notes(&db, character_id)).await?;

        progress.report(NOTES_LISTED_MARK, "Compressing data...");
        let mut archive = ArchiveBuilder::new();
        write_character(&mut archive, &CharacterManifest::new(character_id, notes.len()))?;
        write_note_records(&mut archive, &notes)?;

        let mut summary = ExportSummary::new(character_id);
        summary.notes = notes.len();

        if options.markdown {
            write_markdown_root(&mut archive)?;
            let phase = PhaseProgress::new(progress, NOTES_RANGE);

            for (i, note) in notes.iter().enumerate() {
                phase.report(
                    i as f64 / notes.len() as f64,
                    &format!(
                        "Exporting notes & attachments to markdown... ({}/{})",
                        i + 1,
                        notes.len()
                    ),
                );

                let transformed = transform_note(note)?;
                let outcome = fetch_attachments(
                    self.media.as_ref(),
                    &transformed,
                    options.skip_attachments,
                    options.attachment_concurrency,
                )
                .await;
                write_markdown_note(
                    &mut archive,
                    note,
                    &transformed,
                    &outcome,
                    options.skip_attachments,
                )?;

                summary.markdown_notes += 1;
                summary.attachments_saved += outcome.saved.len();
                summary.attachments_failed += outcome.failed.len();
            }
        }

        progress.report(FINALIZE_MARK, "Generating ZIP file...");
        let bytes = archive.finish()?;
        summary.archive_bytes = bytes.len();
        summary.archive_path = save_archive(&self.output_dir, character_id, &bytes).await?;

        progress.report(DONE_MARK, "Done");
        Ok(summary)
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("loader", &self.loader)
            .field("output_dir", &self.output_dir)
            .field("status", &self.status())
            .finish()
    }
}

/// Notes of a character, or [`Error::CharacterNotFound`] when it has none.
fn query_notes(db: &SnapshotDb, character_id: i64) -> Result<Vec<NoteRecord>> {
    if db.count_notes(character_id)? == 0 {
        return Err(Error::CharacterNotFound(character_id));
    }

    db.list_notes_with_progress(character_id, |current, total| {
        if current == total || current % LISTING_LOG_INTERVAL == 0 {
            tracing::debug!("Decoded {}/{} notes", current, total);
        }
    })
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}
