//! Fixed layout of an export archive.
//!
//! ```text
//! character/character.json
//! notes/<cid>-<nid>.json
//! notes-markdown/<cid>-<nid> - <title>/<title>.md
//! notes-markdown/<cid>-<nid> - <title>/attachments/<file>
//! notes-markdown/<cid>-<nid> - <title>/attach_download_failed.txt
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::archive::builder::ArchiveBuilder;
use crate::download::AttachmentOutcome;
use crate::error::Result;
use crate::media::ATTACHMENTS_DIR;
use crate::note::{NoteRecord, TransformedNote};

pub const CHARACTER_DIR: &str = "character";
pub const NOTES_DIR: &str = "notes";
pub const MARKDOWN_DIR: &str = "notes-markdown";
pub const CHARACTER_FILE: &str = "character.json";
pub const FAILED_MANIFEST: &str = "attach_download_failed.txt";

/// Contents of `character/character.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterManifest {
    pub character_id: i64,
    pub note_count: usize,
    pub exported_at: DateTime<Utc>,
}

impl CharacterManifest {
    pub fn new(character_id: i64, note_count: usize) -> Self {
        Self {
            character_id,
            note_count,
            exported_at: Utc::now(),
        }
    }
}

/// Archive path of a note's JSON record.
pub fn note_json_path(note: &NoteRecord) -> String {
    format!("{}/{}.json", NOTES_DIR, note.file_stem())
}

/// Folder holding a note's Markdown rendering, with trailing slash.
pub fn note_folder(note: &NoteRecord, title: &str) -> String {
    format!("{}/{} - {}/", MARKDOWN_DIR, note.file_stem(), title)
}

/// Newline-terminated list of failed URLs.
pub fn failure_manifest(urls: &[String]) -> String {
    let mut manifest = urls.join("\n");
    manifest.push('\n');
    manifest
}

/// Write `character/character.json`.
pub fn write_character(archive: &mut ArchiveBuilder, manifest: &CharacterManifest) -> Result<()> {
    archive.add_directory(&format!("{}/", CHARACTER_DIR))?;
    archive.add_json(&format!("{}/{}", CHARACTER_DIR, CHARACTER_FILE), manifest)
}

/// Write every note record under `notes/`.
pub fn write_note_records(archive: &mut ArchiveBuilder, notes: &[NoteRecord]) -> Result<()> {
    archive.add_directory(&format!("{}/", NOTES_DIR))?;
    for note in notes {
        archive.add_json(&note_json_path(note), note)?;
    }
    Ok(())
}

/// Create the `notes-markdown/` root.
pub fn write_markdown_root(archive: &mut ArchiveBuilder) -> Result<()> {
    archive.add_directory(&format!("{}/", MARKDOWN_DIR))
}

/// Write one note folder from its rendering and fetch outcome.
///
/// The `attachments/` folder exists only when links were fetched; the
/// failure manifest only when some link failed.
pub fn write_markdown_note(
    archive: &mut ArchiveBuilder,
    note: &NoteRecord,
    transformed: &TransformedNote,
    outcome: &AttachmentOutcome,
    skip_attachments: bool,
) -> Result<()> {
    let folder = note_folder(note, &transformed.title);
    archive.add_directory(&folder)?;

    if !skip_attachments && !transformed.references().is_empty() {
        let attachments = format!("{}{}/", folder, ATTACHMENTS_DIR);
        archive.add_directory(&attachments)?;
        for saved in &outcome.saved {
            archive.add_file(&format!("{}{}", attachments, saved.file_name), &saved.bytes)?;
        }
    }

    if !outcome.failed.is_empty() {
        archive.add_file(
            &format!("{}{}", folder, FAILED_MANIFEST),
            failure_manifest(&outcome.failed).as_bytes(),
        )?;
    }

    archive.add_file(
        &format!("{}{}", folder, transformed.file_name()),
        outcome.markdown.as_bytes(),
    )
}
