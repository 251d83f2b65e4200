//! Note module for record types and Markdown transformation.

pub mod markdown;
pub mod types;

pub use markdown::{compose_body, derive_title, front_matter, transform_note, TransformedNote};
pub use types::{Attachment, NoteContent, NoteMetadata, NoteRecord};
