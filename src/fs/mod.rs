//! Filesystem module.
//!
//! Provides:
//! - Filename sanitizing and de-duplication
//! - Output paths and archive saving

pub mod naming;
pub mod paths;

pub use naming::{
    collapse_whitespace, sanitize_file_name, sanitize_path_component, split_extension,
    unique_name,
};
pub use paths::{archive_file_name, archive_path, save_archive};
