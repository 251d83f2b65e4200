//! Configuration module for xlog-export.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Configuration and input validation

pub mod loader;
pub mod validation;

pub use loader::{Config, ExportConfig, HttpConfig, IpfsConfig, SourceConfig, SNAPSHOT_FILE_NAME};
pub use validation::{parse_character_id, validate_config};
