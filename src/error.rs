//! Error types for the xlog-export application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Input errors
    #[error("Invalid character ID")]
    InvalidCharacterId(String),

    #[error("Character not found or has no notes")]
    CharacterNotFound(i64),

    // Snapshot errors
    #[error("Failed to fetch {url}: HTTP {status}")]
    Transport { url: String, status: u16 },

    #[error("No database parts found at {0}")]
    NoSnapshotParts(String),

    #[error("Failed to decompress database: {0}")]
    Decompress(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // Attachment errors (recovered per link)
    #[error("Failed to fetch attachment {url}: {message}")]
    Attachment { url: String, message: String },

    // Archive errors
    #[error("Failed to compress data ({0})")]
    Archive(String),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an attachment error from any displayable cause.
    pub fn attachment(url: &str, message: impl std::fmt::Display) -> Self {
        Error::Attachment {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    pub const INPUT_ERROR: i32 = 3;
    pub const TRANSPORT_ERROR: i32 = 4;
    pub const ARCHIVE_ERROR: i32 = 5;
    pub const UNEXPECTED_ERROR: i32 = 6;
}
