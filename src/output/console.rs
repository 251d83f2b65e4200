//! Console output utilities.

use console::style;

use crate::config::Config;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     xLog Export                                       ║
║     Archive a character's notes from the snapshot     ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(character_id: &str, config: &Config) {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Character: {}", character_id);
    println!("  Snapshot: {}", config.snapshot_url());
    println!("  Markdown: {}", yes_no(config.export.markdown));
    if config.export.markdown {
        println!(
            "  Attachments: {}",
            if config.export.skip_attachments {
                "skipped".to_string()
            } else {
                format!("up to {} at once", config.export.attachment_concurrency)
            }
        );
    }
    println!("  Directory: {}", config.output_directory().display());
    println!();
}
