//! Media module for link extraction, rewriting and naming.

pub mod item;
pub mod links;
pub mod parser;

pub use item::{LinkSyntax, MediaReference, MediaType};
pub use links::{attachment_path, LinkedText, ATTACHMENTS_DIR};
pub use parser::{corrected_file_name, derive_file_name, file_name_from_url, mime_to_extension};
