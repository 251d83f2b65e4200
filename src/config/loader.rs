//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Canonical snapshot file name; requests for it are served as split parts.
pub const SNAPSHOT_FILE_NAME: &str = "xlog.db.gz";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub ipfs: IpfsConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Where the snapshot is served from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the static site hosting the snapshot.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the snapshot resource relative to `base_url`.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

/// Export options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the archive is saved into.
    #[serde(default)]
    pub output_directory: Option<PathBuf>,

    /// Whether to also export notes as Markdown with attachments.
    #[serde(default)]
    pub markdown: bool,

    /// Whether to skip downloading attachments entirely.
    #[serde(default)]
    pub skip_attachments: bool,

    /// Maximum number of concurrent attachment downloads per note.
    #[serde(default = "default_attachment_concurrency")]
    pub attachment_concurrency: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_directory: None,
            markdown: false,
            skip_attachments: false,
            attachment_concurrency: default_attachment_concurrency(),
        }
    }
}

/// IPFS gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpfsConfig {
    /// Gateways tried in order for `ipfs://` links.
    #[serde(default = "default_gateways")]
    pub gateways: Vec<String>,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            gateways: default_gateways(),
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://xlog-export.pages.dev".to_string()
}

fn default_snapshot_path() -> String {
    format!("/{}", SNAPSHOT_FILE_NAME)
}

fn default_attachment_concurrency() -> usize {
    8
}

fn default_gateways() -> Vec<String> {
    vec![
        "https://ipfs.io/ipfs/".to_string(),
        "https://cloudflare-ipfs.com/ipfs/".to_string(),
        "https://w3s.link/ipfs/".to_string(),
    ]
}

fn default_user_agent() -> String {
    format!("xlog-export/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Full URL of the snapshot resource.
    pub fn snapshot_url(&self) -> String {
        format!(
            "{}/{}",
            self.source.base_url.trim_end_matches('/'),
            self.source.snapshot_path.trim_start_matches('/')
        )
    }

    /// Get the effective output directory.
    pub fn output_directory(&self) -> PathBuf {
        self.export.output_directory.clone().unwrap_or_else(|| {
            UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.source.snapshot_path, "/xlog.db.gz");
        assert_eq!(config.export.attachment_concurrency, 8);
        assert!(!config.export.markdown);
        assert_eq!(config.ipfs.gateways.len(), 3);
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [source]
            base_url = "http://localhost:8080/"

            [export]
            markdown = true
            attachment_concurrency = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.snapshot_url(), "http://localhost:8080/xlog.db.gz");
        assert!(config.export.markdown);
        assert!(!config.export.skip_attachments);
        assert_eq!(config.export.attachment_concurrency, 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.export.skip_attachments = true;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert!(loaded.export.skip_attachments);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
