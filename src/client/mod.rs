//! Network clients.
//!
//! This module provides:
//! - HTTP client used for the snapshot and attachments
//! - IPFS address recognition and gateway resolution
//! - Per-link media transports

pub mod http;
pub mod ipfs;
pub mod source;

pub use http::HttpClient;
pub use ipfs::{gateway_url, is_ipfs_url};
pub use source::{FetchedMedia, HttpSource, IpfsSource, MediaRouter, MediaSource};
