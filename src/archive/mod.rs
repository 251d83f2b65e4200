//! Archive module.
//!
//! Provides:
//! - An in-memory zip builder that rejects duplicate entries
//! - The fixed export layout (character, notes, Markdown folders)

pub mod builder;
pub mod layout;

pub use builder::ArchiveBuilder;
pub use layout::{
    failure_manifest, note_folder, note_json_path, write_character, write_markdown_note,
    write_markdown_root, write_note_records, CharacterManifest, FAILED_MANIFEST,
};
