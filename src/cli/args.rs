//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// xLog character export CLI.
#[derive(Parser, Debug)]
#[command(
    name = "xlog-export",
    version,
    about = "Export all notes of an xLog character into a zip archive",
    long_about = "A CLI tool to export the notes of an xLog character from the published \
                  snapshot database.\n\n\
                  Produces character-<id>.zip with JSON records and, optionally, Markdown \
                  renderings with their attachments."
)]
pub struct Args {
    /// Character ID to export.
    #[arg(required_unless_present = "list_characters")]
    pub character_id: Option<String>,

    /// Base URL the snapshot is served from.
    #[arg(long, env = "XLOG_EXPORT_BASE_URL")]
    pub base_url: Option<String>,

    /// Path of the snapshot below the base URL.
    #[arg(long, env = "XLOG_EXPORT_SNAPSHOT_PATH")]
    pub snapshot_path: Option<String>,

    /// Directory the archive is written to.
    #[arg(short, long = "output")]
    pub output_directory: Option<PathBuf>,

    /// Also export every note as Markdown with its attachments.
    #[arg(short, long)]
    pub markdown: bool,

    /// Don't download attachments; list them in attach_download_failed.txt.
    #[arg(long)]
    pub skip_attachments: bool,

    /// Maximum concurrent attachment downloads per note.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// IPFS gateway to use, in order of preference. Repeatable.
    #[arg(long = "ipfs-gateway", env = "XLOG_EXPORT_IPFS_GATEWAYS", value_delimiter = ',')]
    pub ipfs_gateways: Option<Vec<String>>,

    /// List the character IDs present in the snapshot and exit.
    #[arg(long)]
    pub list_characters: bool,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide the progress bar.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.source.base_url = base_url.clone();
        }

        if let Some(snapshot_path) = &self.snapshot_path {
            config.source.snapshot_path = snapshot_path.clone();
        }

        if let Some(dir) = &self.output_directory {
            config.export.output_directory = Some(dir.clone());
        }

        // Boolean flags (only override if set to non-default)
        if self.markdown {
            config.export.markdown = true;
        }

        if self.skip_attachments {
            config.export.skip_attachments = true;
        }

        if let Some(concurrency) = self.concurrency {
            config.export.attachment_concurrency = concurrency;
        }

        if let Some(gateways) = &self.ipfs_gateways {
            config.ipfs.gateways = gateways.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_args() {
        let args = Args::try_parse_from([
            "xlog-export",
            "52055",
            "--markdown",
            "--concurrency",
            "2",
            "--ipfs-gateway",
            "https://a/ipfs/",
            "--ipfs-gateway",
            "https://b/ipfs/",
        ])
        .unwrap();

        assert_eq!(args.character_id.as_deref(), Some("52055"));
        assert!(args.markdown);
        assert_eq!(args.concurrency, Some(2));

        let mut config = Config::default();
        args.merge_into_config(&mut config);
        assert!(config.export.markdown);
        assert!(!config.export.skip_attachments);
        assert_eq!(config.export.attachment_concurrency, 2);
        assert_eq!(config.ipfs.gateways, vec!["https://a/ipfs/", "https://b/ipfs/"]);
    }

    #[test]
    fn test_character_id_required_unless_listing() {
        assert!(Args::try_parse_from(["xlog-export"]).is_err());

        let args = Args::try_parse_from(["xlog-export", "--list-characters"]).unwrap();
        assert!(args.list_characters);
        assert!(args.character_id.is_none());
    }

    #[test]
    fn test_merge_keeps_config_when_unset() {
        let args = Args::try_parse_from(["xlog-export", "1"]).unwrap();
        let mut config = Config::default();
        config.export.markdown = true;
        config.source.base_url = "http://mirror".into();

        args.merge_into_config(&mut config);

        assert!(config.export.markdown);
        assert_eq!(config.source.base_url, "http://mirror");
    }
}
