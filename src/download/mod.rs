//! Download module for note attachments.
//!
//! Fetches the media links of one note with bounded concurrency, isolating
//! per-link failures.

pub mod attachments;

pub use attachments::{fetch_attachments, AttachmentOutcome, SavedAttachment};
