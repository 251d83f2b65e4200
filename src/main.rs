//! xLog Export - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use xlog_export::{
    cli::Args,
    config::{validate_config, Config},
    error::{exit_codes, Error, Result},
    export::{ExportOptions, Exporter},
    output::{
        create_export_bar, print_banner, print_character_ids, print_config_summary, print_error,
        print_export_stats, print_info, print_success, print_warning, ProgressBarReporter,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}

fn exit_code(error: &Error) -> i32 {
    match error {
        Error::Config(_)
        | Error::ConfigValidation { .. }
        | Error::MissingConfig(_)
        | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
        Error::InvalidCharacterId(_) | Error::CharacterNotFound(_) => exit_codes::INPUT_ERROR,
        Error::Transport { .. }
        | Error::NoSnapshotParts(_)
        | Error::Decompress(_)
        | Error::Database(_)
        | Error::Http(_) => exit_codes::TRANSPORT_ERROR,
        Error::Archive(_) | Error::Zip(_) => exit_codes::ARCHIVE_ERROR,
        _ => exit_codes::UNEXPECTED_ERROR,
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let exporter = Exporter::from_config(&config)?;
    let reporter = if args.quiet {
        ProgressBarReporter::hidden()
    } else {
        ProgressBarReporter::new(create_export_bar())
    };

    if args.list_characters {
        print_info(&format!("Reading snapshot from {}", config.snapshot_url()));
        let ids = exporter.list_character_ids(&reporter).await;
        reporter.finish();
        print_character_ids(&ids?);
        return Ok(());
    }

    let character_id = args
        .character_id
        .as_deref()
        .ok_or_else(|| Error::MissingConfig("character ID".into()))?;

    print_config_summary(character_id, &config);

    let options = ExportOptions::from(&config.export);
    let summary = exporter
        .export_character(character_id, &options, &reporter)
        .await;
    reporter.finish();
    let summary = summary?;

    print_export_stats(&summary);
    if summary.attachments_failed > 0 {
        print_warning(&format!(
            "{} attachment(s) could not be downloaded; see attach_download_failed.txt",
            summary.attachments_failed
        ));
    }
    print_success(&format!("Saved {}", summary.archive_path.display()));

    Ok(())
}
